//! Enemy contract and spawn bookkeeping.
//!
//! Concrete enemies come from the embedding game. The core owns when they
//! are tested against the player and projectiles, and when an enemy that
//! wandered off-screen is put back at its spawn point.

use glam::Vec2;

use crate::actors::{PlayerActor, Projectile};
use crate::behavior::{Collidable, Damageable, Movable, TickContext};
use crate::camera::Camera;
use crate::entity::Body;
use crate::events::SimEvent;
use crate::geometry::sign;

/// Fall speed of enemies that use gravity.
pub const ENEMY_GRAVITY: f32 = 2.0;

/// Body with the default enemy boxes and friction.
#[must_use]
pub fn enemy_body(pos: Vec2, gravity: bool) -> Body {
    let mut body = Body::new(pos);
    body.hitbox = Vec2::splat(8.0);
    body.collision_box = Vec2::splat(8.0);
    body.friction = Vec2::new(0.1, 0.15);
    if gravity {
        body.target.y = ENEMY_GRAVITY;
    }
    body
}

/// Spawn position plus the deferred-reset request.
///
/// Leaving the viewport requests a reset; the reset runs on a later
/// [`SpawnPoint::take_reset`] once the enemy is still out of camera and the
/// camera has come to rest, so an enemy never snaps back while the player
/// can see its spawn point scrolling into view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    start: Vec2,
    reset_pending: bool,
}

impl SpawnPoint {
    /// Creates a spawn point at `start`.
    #[must_use]
    pub fn new(start: Vec2) -> Self {
        Self {
            start,
            reset_pending: false,
        }
    }

    /// Spawn position.
    #[must_use]
    pub fn start(&self) -> Vec2 {
        self.start
    }

    /// Requests a reset once conditions allow.
    pub fn schedule_reset(&mut self) {
        self.reset_pending = true;
    }

    /// Whether a scheduled reset should run now. Clears the request if so.
    pub fn take_reset(&mut self, in_camera: bool, camera: &Camera) -> bool {
        if self.reset_pending && !in_camera && !camera.is_moving() {
            self.reset_pending = false;
            return true;
        }
        false
    }

    /// Whether a reset is scheduled.
    #[must_use]
    pub fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }
}

/// An enemy.
pub trait EnemyActor: Collidable + Damageable {
    /// Spawn bookkeeping.
    fn spawn_point(&self) -> &SpawnPoint;

    /// Spawn bookkeeping, mutably.
    fn spawn_point_mut(&mut self) -> &mut SpawnPoint;

    /// Spawn position.
    fn start_pos(&self) -> Vec2 {
        self.spawn_point().start()
    }

    /// Puts a living enemy back at its spawn point.
    fn reset(&mut self) {
        let start = self.start_pos();
        let body = self.body_mut();
        if !body.exists() || body.is_dying() {
            return;
        }
        body.stop_movement();
        body.pos = start;
        body.old_pos = start;
    }

    /// Brings the enemy back, alive, at its spawn point.
    fn respawn(&mut self) {
        let start = self.start_pos();
        self.body_mut().revive(start);
        self.reset();
    }

    /// Runs a pending deferred reset.
    fn camera_event(&mut self, camera: &Camera) {
        let in_camera = self.body().in_camera();
        if self.spawn_point_mut().take_reset(in_camera, camera) {
            self.reset();
        }
    }

    /// Tests the enemy against the player.
    ///
    /// The default hurts the player on hitbox overlap, pushing it away from
    /// the enemy. Returns whether anything happened.
    fn player_collision(&mut self, player: &mut dyn PlayerActor, ctx: &mut TickContext<'_>) -> bool {
        let body = self.body();
        if !body.is_active() || !player.body().is_active() {
            return false;
        }
        let source = body.hitbox_rect();
        if !player.body().overlaps_rect(source) {
            return false;
        }
        let dir = sign(player.body().pos.x - body.pos.x);
        let origin = body.pos;
        if player.hurt(source, dir, ctx) {
            ctx.events.push(SimEvent::PlayerHurt { source: origin });
            return true;
        }
        false
    }

    /// Tests the enemy against one projectile.
    ///
    /// The default lets a friendly projectile kill the enemy and destroys
    /// the projectile. Returns whether they hit.
    fn projectile_collision(
        &mut self,
        projectile: &mut Projectile,
        _ctx: &mut TickContext<'_>,
    ) -> bool {
        let p = projectile.body();
        if !self.body().is_active() || !p.exists() || p.is_dying() || !projectile.is_friendly() {
            return false;
        }
        if !self.body().overlaps(p) {
            return false;
        }
        projectile.destroy();
        self.body_mut().start_dying();
        true
    }
}

/// Default `outside_camera_event` for enemies.
///
/// A dying enemy that leaves the viewport is removed; a living one
/// schedules a reset.
pub fn enemy_exit_camera<E: EnemyActor + ?Sized>(enemy: &mut E) {
    if enemy.body().is_dying() {
        enemy.body_mut().kill();
    } else {
        enemy.spawn_point_mut().schedule_reset();
    }
}
