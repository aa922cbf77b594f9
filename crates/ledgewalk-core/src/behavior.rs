//! Capability traits and the per-tick context.
//!
//! Actor behavior is split into small traits selected per concrete actor:
//!
//! - [`Movable`]: owns a [`Body`] and runs the movement lifecycle hooks
//! - [`Collidable`]: receives tile collision callbacks from the resolver
//! - [`Damageable`]: can be hurt by another actor
//! - [`Drawable`]: exposes read-only render state (implemented for every
//!   `Movable`)
//!
//! Hooks receive a [`TickContext`] carrying the step, the progress store, the
//! event log and the spawn queue. Nothing is reached through globals.
//!
//! # Lifecycle
//!
//! [`update`] drives one actor through one tick:
//!
//! 1. Skip entirely unless the body exists and is in camera.
//! 2. If dying, run [`Movable::die`] instead of movement; when it reports
//!    completion the body stops existing.
//! 3. Otherwise save the previous position, run
//!    [`Movable::pre_movement`], integrate, then run
//!    [`Movable::post_movement`].
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use ledgewalk_core::behavior::{self, Movable, TickContext, TickState, UpdateOutcome};
//! use ledgewalk_core::entity::{ActorTag, Body, BodyFlags};
//!
//! struct Drifter {
//!     body: Body,
//! }
//!
//! impl Movable for Drifter {
//!     fn tag(&self) -> ActorTag {
//!         ActorTag::Particle
//!     }
//!     fn body(&self) -> &Body {
//!         &self.body
//!     }
//!     fn body_mut(&mut self) -> &mut Body {
//!         &mut self.body
//!     }
//!     fn pre_movement(&mut self, _ctx: &mut TickContext<'_>) {
//!         self.body.target.x = 1.0;
//!     }
//! }
//!
//! let mut drifter = Drifter { body: Body::new(Vec2::ZERO) };
//! drifter.body.flags.insert(BodyFlags::IN_CAMERA);
//!
//! let mut state = TickState::default();
//! let mut ctx = state.context(1.0, 0);
//! assert_eq!(behavior::update(&mut drifter, &mut ctx), UpdateOutcome::Moved);
//! assert!((drifter.body.pos.x - 1.0).abs() < 0.0001);
//! ```

use glam::Vec2;

use crate::actors::ProjectileSpawn;
use crate::entity::{ActorTag, Body, BodyFlags};
use crate::events::EventLog;
use crate::geometry::Rect;
use crate::progress::Progress;
use crate::sprite::Sprite;

// =============================================================================
// Tick Context
// =============================================================================

/// Spawn requests raised by hooks, applied by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnQueue {
    /// Projectiles to place in the projectile pool.
    pub projectiles: Vec<ProjectileSpawn>,
    /// Origins of cosmetic particle bursts.
    pub bursts: Vec<Vec2>,
}

impl SpawnQueue {
    /// Requests a projectile.
    pub fn projectile(&mut self, spawn: ProjectileSpawn) {
        self.projectiles.push(spawn);
    }

    /// Requests a particle burst at `origin`.
    pub fn burst(&mut self, origin: Vec2) {
        self.bursts.push(origin);
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty() && self.bursts.is_empty()
    }
}

/// State shared with hooks during a tick.
#[derive(Debug)]
pub struct TickContext<'a> {
    /// Logical step of this tick.
    pub step: f32,
    /// Index of this tick, starting at 0.
    pub tick: u64,
    /// Game progress.
    pub progress: &'a mut Progress,
    /// Event log for this tick.
    pub events: &'a mut EventLog,
    /// Spawn requests.
    pub spawns: &'a mut SpawnQueue,
}

/// Owned backing storage for a [`TickContext`].
///
/// The world keeps these fields itself; this bundle exists for tests and
/// for driving single actors outside a world.
#[derive(Debug, Default)]
pub struct TickState {
    /// Progress store.
    pub progress: Progress,
    /// Event log.
    pub events: EventLog,
    /// Spawn queue.
    pub spawns: SpawnQueue,
}

impl TickState {
    /// Borrows the state as a context.
    pub fn context(&mut self, step: f32, tick: u64) -> TickContext<'_> {
        TickContext {
            step,
            tick,
            progress: &mut self.progress,
            events: &mut self.events,
            spawns: &mut self.spawns,
        }
    }
}

// =============================================================================
// Capability Traits
// =============================================================================

/// An actor with a body and movement hooks.
pub trait Movable {
    /// Collection the actor belongs to.
    fn tag(&self) -> ActorTag;

    /// Kinematic state.
    fn body(&self) -> &Body;

    /// Kinematic state, mutably.
    fn body_mut(&mut self) -> &mut Body;

    /// Sets target velocity and other intent before integration.
    fn pre_movement(&mut self, _ctx: &mut TickContext<'_>) {}

    /// Reacts to the integrated position.
    fn post_movement(&mut self, _ctx: &mut TickContext<'_>) {}

    /// Runs one tick of the death effect. Returns `true` once finished.
    fn die(&mut self, _ctx: &mut TickContext<'_>) -> bool {
        true
    }

    /// Called once when the actor leaves the viewport.
    fn outside_camera_event(&mut self) {}

    /// Whether [`update`] integrates velocity. Static props return `false`.
    fn integrates(&self) -> bool {
        true
    }
}

/// Tile collision callbacks.
///
/// The resolver decides when and with which geometry these run; the actor
/// decides what they mean. Any of them may run more than once per tick, for
/// example when two hazard tiles overlap the body.
pub trait Collidable: Movable {
    /// The body was stopped by a floor (`dir > 0`) or ceiling (`dir < 0`).
    fn vertical_collision_event(&mut self, _dir: f32, _ctx: &mut TickContext<'_>) {}

    /// The body was stopped by a wall on its right (`dir > 0`) or left.
    fn wall_collision_event(&mut self, _dir: f32, _ctx: &mut TickContext<'_>) {}

    /// The collision box touches a hazard area.
    fn hurt_collision(&mut self, _area: Rect, _dir: f32, _ctx: &mut TickContext<'_>) -> bool {
        false
    }

    /// The collision box touches a ladder segment.
    fn ladder_collision(&mut self, _area: Rect, _is_top: bool, _ctx: &mut TickContext<'_>) -> bool {
        false
    }

    /// The collision box touches a breakable block. Returning `true` breaks
    /// it; returning `false` makes it behave as a solid block.
    fn break_collision(&mut self, _area: Rect, _level: u8, _ctx: &mut TickContext<'_>) -> bool {
        false
    }

    /// The collision box is inside an active wind column. Returning `true`
    /// suppresses the default push.
    fn wind_collision(&mut self, _area: Rect, _ctx: &mut TickContext<'_>) -> bool {
        false
    }

    /// The collision box touches the water surface band (`is_top`) or body.
    /// Returning `true` for the body suppresses the default buoyancy.
    fn water_collision(&mut self, _area: Rect, _is_top: bool, _ctx: &mut TickContext<'_>) -> bool {
        false
    }
}

/// An actor that can take hits from other actors.
pub trait Damageable {
    /// Applies a hit from `source` with horizontal push `dir`.
    ///
    /// Returns `true` if the hit landed.
    fn hurt(&mut self, source: Rect, dir: f32, ctx: &mut TickContext<'_>) -> bool;
}

/// Render snapshot of one actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawInfo {
    /// Collection of the actor.
    pub tag: ActorTag,
    /// Resolved position.
    pub position: Vec2,
    /// Sprite frame state.
    pub sprite: Sprite,
}

/// Read-only render access.
pub trait Drawable {
    /// Render state, or `None` when the actor should not be drawn.
    fn draw_info(&self) -> Option<DrawInfo>;
}

impl<T: Movable + ?Sized> Drawable for T {
    fn draw_info(&self) -> Option<DrawInfo> {
        let body = self.body();
        if !body.exists() || !body.in_camera() {
            return None;
        }
        Some(DrawInfo {
            tag: self.tag(),
            position: body.pos,
            sprite: body.sprite,
        })
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// What [`update`] did for one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Not existing or not in camera; nothing ran.
    Skipped,
    /// The death effect ran and is still going.
    Dying,
    /// The death effect finished; the actor no longer exists.
    Died,
    /// Normal movement ran.
    Moved,
}

/// Runs one tick of the movement lifecycle for `actor`.
pub fn update<A: Movable + ?Sized>(actor: &mut A, ctx: &mut TickContext<'_>) -> UpdateOutcome {
    let body = actor.body();
    if !body.exists() || !body.in_camera() {
        return UpdateOutcome::Skipped;
    }

    if body.is_dying() {
        if actor.die(ctx) {
            actor
                .body_mut()
                .flags
                .remove(BodyFlags::EXISTS | BodyFlags::DYING | BodyFlags::KEEP_IN_CAMERA);
            return UpdateOutcome::Died;
        }
        return UpdateOutcome::Dying;
    }

    let body = actor.body_mut();
    body.old_pos = body.pos;

    actor.pre_movement(ctx);
    if actor.integrates() {
        actor.body_mut().integrate(ctx.step);
    }
    actor.post_movement(ctx);

    UpdateOutcome::Moved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        body: Body,
        pre: u32,
        post: u32,
        die_calls: u32,
        die_after: u32,
        still: bool,
    }

    impl Probe {
        fn visible() -> Self {
            let mut body = Body::new(Vec2::ZERO);
            body.flags.insert(BodyFlags::IN_CAMERA);
            body.friction = Vec2::ONE;
            Self {
                body,
                ..Self::default()
            }
        }
    }

    impl Movable for Probe {
        fn tag(&self) -> ActorTag {
            ActorTag::Enemy
        }
        fn body(&self) -> &Body {
            &self.body
        }
        fn body_mut(&mut self) -> &mut Body {
            &mut self.body
        }
        fn pre_movement(&mut self, _ctx: &mut TickContext<'_>) {
            self.pre += 1;
            self.body.target = Vec2::new(1.0, 0.0);
        }
        fn post_movement(&mut self, _ctx: &mut TickContext<'_>) {
            self.post += 1;
        }
        fn die(&mut self, _ctx: &mut TickContext<'_>) -> bool {
            self.die_calls += 1;
            self.die_calls > self.die_after
        }
        fn integrates(&self) -> bool {
            !self.still
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn skips_out_of_camera() {
            let mut probe = Probe::visible();
            probe.body.flags.remove(BodyFlags::IN_CAMERA);
            let mut state = TickState::default();
            let outcome = update(&mut probe, &mut state.context(1.0, 0));
            assert_eq!(outcome, UpdateOutcome::Skipped);
            assert_eq!(probe.pre, 0);
        }

        #[test]
        fn skips_non_existing() {
            let mut probe = Probe::visible();
            probe.body.kill();
            let mut state = TickState::default();
            assert_eq!(
                update(&mut probe, &mut state.context(1.0, 0)),
                UpdateOutcome::Skipped
            );
        }

        #[test]
        fn runs_hooks_in_order_and_saves_old_pos() {
            let mut probe = Probe::visible();
            probe.body.pos = Vec2::new(5.0, 5.0);
            let mut state = TickState::default();
            let outcome = update(&mut probe, &mut state.context(1.0, 0));
            assert_eq!(outcome, UpdateOutcome::Moved);
            assert_eq!((probe.pre, probe.post), (1, 1));
            assert_eq!(probe.body.old_pos, Vec2::new(5.0, 5.0));
            assert!((probe.body.pos.x - 6.0).abs() < 0.0001);
        }

        #[test]
        fn static_actor_does_not_integrate() {
            let mut probe = Probe::visible();
            probe.still = true;
            let mut state = TickState::default();
            update(&mut probe, &mut state.context(1.0, 0));
            assert_eq!(probe.body.pos, Vec2::ZERO);
            assert_eq!(probe.post, 1);
        }

        #[test]
        fn dying_runs_only_die_until_done() {
            let mut probe = Probe::visible();
            probe.die_after = 2;
            probe.body.speed = Vec2::new(3.0, 0.0);
            probe.body.start_dying();
            let mut state = TickState::default();

            assert_eq!(update(&mut probe, &mut state.context(1.0, 0)), UpdateOutcome::Dying);
            assert_eq!(update(&mut probe, &mut state.context(1.0, 1)), UpdateOutcome::Dying);
            assert_eq!(update(&mut probe, &mut state.context(1.0, 2)), UpdateOutcome::Died);

            assert_eq!(probe.pre, 0);
            assert_eq!(probe.post, 0);
            assert_eq!(probe.body.pos, Vec2::ZERO);
            assert!(!probe.body.exists());
            assert!(!probe.body.is_dying());

            assert_eq!(update(&mut probe, &mut state.context(1.0, 3)), UpdateOutcome::Skipped);
            assert_eq!(probe.die_calls, 3);
        }
    }

    mod draw_tests {
        use super::*;

        #[test]
        fn hidden_when_out_of_camera() {
            let mut probe = Probe::visible();
            assert!(probe.draw_info().is_some());
            probe.body.flags.remove(BodyFlags::IN_CAMERA);
            assert!(probe.draw_info().is_none());
        }

        #[test]
        fn reports_position_and_tag() {
            let mut probe = Probe::visible();
            probe.body.pos = Vec2::new(3.0, 4.0);
            let info = probe.draw_info().unwrap();
            assert_eq!(info.tag, ActorTag::Enemy);
            assert_eq!(info.position, Vec2::new(3.0, 4.0));
        }
    }

    #[test]
    fn spawn_queue_collects_requests() {
        let mut queue = SpawnQueue::default();
        assert!(queue.is_empty());
        queue.burst(Vec2::ONE);
        assert!(!queue.is_empty());
        assert_eq!(queue.bursts, vec![Vec2::ONE]);
    }
}
