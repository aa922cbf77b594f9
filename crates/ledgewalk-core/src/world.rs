//! The world and its fixed per-tick order.
//!
//! A [`World`] owns the stage, the camera, every actor collection and the
//! shared tick state, and advances all of them once per [`World::step`].
//! Each tick runs in one of two modes:
//!
//! **Transition** (the camera is moving between rooms): every actor's
//! visibility is rechecked against the interpolated viewport, the player is
//! carried rigidly with the camera and the camera advances. Nothing moves on
//! its own and tile collision is suspended.
//!
//! **Play** (the camera is resting):
//!
//! 1. **Player**: movement, room-exit check, tile collision
//! 2. **Spawns**: projectiles and particle bursts requested so far
//! 3. **Projectiles**: visibility, movement, tile collision, player hits
//! 4. **Triggers**: visibility, lifecycle, player overlap and switches
//! 5. **Enemies**: visibility, deferred reset, movement, player hits, tile
//!    collision, projectile hits, kill accounting
//! 6. **Particles**: visibility and movement
//!
//! Triggers see the player's post-collision position, and enemies are tested
//! against projectiles only after both have moved.
//!
//! # Determinism
//!
//! Actors are processed in a fixed order (collection order, then slot
//! order), and the only randomness is a `ChaCha8Rng` seeded from
//! [`SimConfig::seed`] that drives cosmetic particle jitter. The same stage,
//! config and actor behavior always produce the same state.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use ledgewalk_core::actors::{player_body, ActorFactory, EnemyActor, PlayerActor};
//! use ledgewalk_core::behavior::{Collidable, Damageable, Movable, TickContext};
//! use ledgewalk_core::config::SimConfig;
//! use ledgewalk_core::entity::{ActorTag, Body};
//! use ledgewalk_core::geometry::Rect;
//! use ledgewalk_core::stage::{Stage, StageDesc};
//! use ledgewalk_core::world::World;
//!
//! struct Idle(Body);
//!
//! impl Movable for Idle {
//!     fn tag(&self) -> ActorTag { ActorTag::Player }
//!     fn body(&self) -> &Body { &self.0 }
//!     fn body_mut(&mut self) -> &mut Body { &mut self.0 }
//! }
//! impl Collidable for Idle {}
//! impl Damageable for Idle {
//!     fn hurt(&mut self, _: Rect, _: f32, _: &mut TickContext<'_>) -> bool { false }
//! }
//! impl PlayerActor for Idle {
//!     fn is_grounded(&self) -> bool { false }
//! }
//!
//! struct Factory;
//!
//! impl ActorFactory for Factory {
//!     fn player(&mut self, pos: Vec2) -> Box<dyn PlayerActor> {
//!         Box::new(Idle(player_body(pos)))
//!     }
//!     fn enemy(&mut self, _: u16, _: Vec2, _: usize) -> Option<Box<dyn EnemyActor>> {
//!         None
//!     }
//! }
//!
//! // 10x9 stage, solid floor on the bottom row, player start at (2, 2).
//! let mut cells = vec![0u16; 90];
//! cells[80..].fill(1);
//! let mut objects = vec![0u16; 90];
//! objects[22] = 1;
//! let desc = StageDesc {
//!     width: 10,
//!     height: 9,
//!     layers: vec![cells],
//!     collision_map: vec![0, 15],
//!     collision_layers: None,
//!     objects: Some(objects),
//!     markers: Default::default(),
//!     water_level: None,
//!     inside: false,
//!     loop_x: false,
//!     toggle_pair: None,
//!     fence_tiles: Vec::new(),
//! };
//!
//! let stage = Stage::from_desc(desc).unwrap();
//! let mut world = World::new(stage, SimConfig::default(), &mut Factory).unwrap();
//! for _ in 0..120 {
//!     world.step();
//! }
//!
//! assert_eq!(world.tick(), 120);
//! // Resting on the floor whose top edge is y = 128.
//! assert!((world.player().body().collision_rect().bottom() - 128.0).abs() < 0.0001);
//! ```

use std::fmt;

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::actors::{
    ActorFactory, EnemyActor, Particle, ParticleSpawn, PlayerActor, Projectile, ProjectileSpawn,
    Switch, Trigger, TriggerResponse,
};
use crate::arena::{SlotArena, SlotId};
use crate::behavior::{self, Damageable, DrawInfo, Drawable, Movable, SpawnQueue, TickContext};
use crate::camera::Camera;
use crate::config::SimConfig;
use crate::entity::BodyFlags;
use crate::error::{LedgewalkError, Result};
use crate::events::{EventLog, SimEvent};
use crate::geometry::sign;
use crate::progress::{Counter, Flag, Progress, SetKey};
use crate::resolver::{wall_collision, TileResolver};
use crate::stage::{MarkerKind, Stage};
use crate::visibility::camera_check;

// =============================================================================
// World
// =============================================================================

/// The simulation world.
///
/// `World` owns:
/// - The stage grid, mutated in place by breakable tiles and switches
/// - The camera and its room transitions
/// - The player, enemies and triggers supplied by an [`ActorFactory`]
/// - Pools of projectiles and particles
/// - Progress, the event log and the spawn queue shared with actor hooks
pub struct World {
    stage: Stage,
    camera: Camera,
    config: SimConfig,
    resolver: TileResolver,
    progress: Progress,
    events: EventLog,
    spawns: SpawnQueue,
    rng: ChaCha8Rng,
    player: Box<dyn PlayerActor>,
    projectiles: SlotArena<Projectile>,
    particles: SlotArena<Particle>,
    triggers: Vec<Box<dyn Trigger>>,
    enemies: Vec<Box<dyn EnemyActor>>,
    tick: u64,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.tick)
            .field("camera", &self.camera)
            .field("player", &self.player.body())
            .field("enemies", &format!("[{} enemies]", self.enemies.len()))
            .field("triggers", &format!("[{} triggers]", self.triggers.len()))
            .field("projectiles", &self.projectiles.live_count())
            .field("particles", &self.particles.live_count())
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Builds a world from a loaded stage.
    ///
    /// The player is created at the first player start marker. Switch
    /// markers become core [`Switch`]es; enemy, item and interactable
    /// markers are handed to `factory` in row-major order. The camera starts
    /// resting in the room that contains the player.
    ///
    /// # Errors
    ///
    /// Returns [`LedgewalkError::InvalidConfig`] if `config` fails
    /// validation and [`LedgewalkError::MissingPlayerStart`] if the stage
    /// has no player start marker.
    pub fn new(stage: Stage, config: SimConfig, factory: &mut dyn ActorFactory) -> Result<Self> {
        config.validate()?;
        let start = stage
            .player_start()
            .ok_or(LedgewalkError::MissingPlayerStart)?
            .spawn_pos();

        let player = factory.player(start);
        let mut triggers: Vec<Box<dyn Trigger>> = Vec::new();
        let mut enemies: Vec<Box<dyn EnemyActor>> = Vec::new();
        for marker in stage.markers() {
            match marker.kind {
                MarkerKind::PlayerStart => {}
                MarkerKind::Switch => triggers.push(Box::new(Switch::from_marker(marker))),
                MarkerKind::Item(_) | MarkerKind::Interactable(_) => {
                    triggers.extend(factory.trigger(marker));
                }
                MarkerKind::Enemy(variant) => {
                    let index = enemies.len();
                    enemies.extend(factory.enemy(variant, marker.spawn_pos(), index));
                }
            }
        }

        let mut camera = Camera::new(0, 0, config.viewport);
        camera.focus_on(start);

        info!(
            width = stage.width(),
            height = stage.height(),
            enemies = enemies.len(),
            triggers = triggers.len(),
            seed = config.seed,
            "world_created"
        );

        let mut world = Self {
            resolver: TileResolver::from_config(&config),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            stage,
            camera,
            config,
            progress: Progress::new(),
            events: EventLog::new(),
            spawns: SpawnQueue::default(),
            player,
            projectiles: SlotArena::new(),
            particles: SlotArena::new(),
            triggers,
            enemies,
            tick: 0,
        };
        world.refresh_visibility();
        world.record_room();
        Ok(world)
    }

    /// Advances the world by one tick.
    ///
    /// While the camera is moving between rooms only the transition runs;
    /// otherwise every actor collection is processed in the order described
    /// in the [module documentation](self). Events raised during the tick
    /// accumulate until [`World::take_events`] drains them.
    pub fn step(&mut self) {
        if self.camera.is_moving() {
            self.transition_phase();
        } else {
            self.player_phase();
            self.spawn_phase();
            self.projectile_phase();
            self.trigger_phase();
            self.enemy_phase();
            self.particle_phase();
        }
        self.tick += 1;
    }

    // =========================================================================
    // Phases
    // =========================================================================

    fn transition_phase(&mut self) {
        let step = self.config.step;
        let shift = self.config.transition.player_shift;
        let Self {
            camera,
            player,
            projectiles,
            particles,
            triggers,
            enemies,
            ..
        } = self;

        for trigger in triggers.iter_mut() {
            camera_check(trigger.as_mut(), camera);
        }
        for enemy in enemies.iter_mut() {
            camera_check(enemy.as_mut(), camera);
            enemy.camera_event(camera);
        }
        for projectile in projectiles.iter_mut() {
            camera_check(projectile, camera);
        }
        for particle in particles.iter_mut() {
            camera_check(particle, camera);
        }
        player.camera_movement(camera, shift, step);

        if camera.update(step) {
            debug!(x = camera.room().x, y = camera.room().y, "room_entered");
            self.record_room();
        }
    }

    fn player_phase(&mut self) {
        let Self {
            stage,
            camera,
            config,
            resolver,
            progress,
            events,
            spawns,
            player,
            tick,
            ..
        } = self;
        let mut ctx = TickContext {
            step: config.step,
            tick: *tick,
            progress,
            events,
            spawns,
        };

        let player = player.as_mut();
        player.body_mut().flags.insert(BodyFlags::IN_CAMERA);
        behavior::update(player, &mut ctx);
        room_exit(stage, camera, config, player, &mut ctx);
        resolver.resolve(stage, player, camera, &mut ctx);
    }

    fn spawn_phase(&mut self) {
        for spawn in std::mem::take(&mut self.spawns.projectiles) {
            self.spawn_projectile(spawn);
        }
        for origin in std::mem::take(&mut self.spawns.bursts) {
            self.burst(origin);
        }
    }

    fn projectile_phase(&mut self) {
        let Self {
            stage,
            camera,
            config,
            resolver,
            progress,
            events,
            spawns,
            player,
            projectiles,
            tick,
            ..
        } = self;
        let mut ctx = TickContext {
            step: config.step,
            tick: *tick,
            progress,
            events,
            spawns,
        };

        for (slot, projectile) in projectiles.live_mut() {
            camera_check(projectile, camera);
            behavior::update(projectile, &mut ctx);
            resolver.resolve(stage, projectile, camera, &mut ctx);

            let body = projectile.body();
            if projectile.is_friendly() || !body.is_active() || !player.body().is_active() {
                continue;
            }
            if !player.body().overlaps(body) {
                continue;
            }
            let (source, origin, dir) = (body.hitbox_rect(), body.pos, sign(body.speed.x));
            if player.hurt(source, dir, &mut ctx) {
                ctx.events.push(SimEvent::PlayerHurt { source: origin });
                projectile.destroy();
                ctx.events.push(SimEvent::ProjectileHit { slot });
            }
        }
    }

    fn trigger_phase(&mut self) {
        let Self {
            stage,
            camera,
            config,
            progress,
            events,
            spawns,
            player,
            triggers,
            tick,
            ..
        } = self;
        let mut ctx = TickContext {
            step: config.step,
            tick: *tick,
            progress,
            events,
            spawns,
        };

        for i in 0..triggers.len() {
            let trigger = triggers[i].as_mut();
            camera_check(trigger, camera);
            behavior::update(trigger, &mut ctx);
            if trigger.player_collision(player.as_mut(), &mut ctx) != TriggerResponse::Toggled {
                continue;
            }

            stage.toggle_special_blocks();
            let state = ctx.progress.toggle_flag(Flag::SwitchState);
            ctx.events.push(SimEvent::BlocksToggled { state });
            debug!(trigger = i, state, "blocks_toggled");
            for (j, other) in triggers.iter_mut().enumerate() {
                if j != i {
                    other.reset_toggle();
                }
            }
        }
    }

    fn enemy_phase(&mut self) {
        let Self {
            stage,
            camera,
            config,
            resolver,
            progress,
            events,
            spawns,
            player,
            projectiles,
            enemies,
            tick,
            ..
        } = self;
        let mut ctx = TickContext {
            step: config.step,
            tick: *tick,
            progress,
            events,
            spawns,
        };

        for (index, enemy) in enemies.iter_mut().enumerate() {
            let enemy = enemy.as_mut();
            let was_dying = enemy.body().is_dying();

            camera_check(enemy, camera);
            enemy.camera_event(camera);
            behavior::update(enemy, &mut ctx);
            enemy.player_collision(player.as_mut(), &mut ctx);
            resolver.resolve(stage, enemy, camera, &mut ctx);

            if enemy.body().is_active() {
                for (slot, projectile) in projectiles.live_mut() {
                    if enemy.projectile_collision(projectile, &mut ctx) {
                        ctx.events.push(SimEvent::ProjectileHit { slot });
                    }
                }
            }

            if !was_dying && enemy.body().is_dying() {
                ctx.progress.add(Counter::Kills, 1);
                ctx.progress
                    .insert(SetKey::EnemiesDefeated, u32::try_from(index).unwrap_or(u32::MAX));
                ctx.events.push(SimEvent::EnemyKilled { index });
                debug!(index, "enemy_killed");
            }
        }
    }

    fn particle_phase(&mut self) {
        let Self {
            camera,
            config,
            progress,
            events,
            spawns,
            particles,
            tick,
            ..
        } = self;
        let mut ctx = TickContext {
            step: config.step,
            tick: *tick,
            progress,
            events,
            spawns,
        };

        for particle in particles.iter_mut() {
            camera_check(particle, camera);
            behavior::update(particle, &mut ctx);
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Places a projectile in the pool, reusing a dead slot if there is one.
    ///
    /// The projectile moves from the next projectile phase on.
    pub fn spawn_projectile(&mut self, spawn: ProjectileSpawn) -> SlotId {
        let slot = self.projectiles.spawn(|p| p.spawn(&spawn));
        self.events.push(SimEvent::ProjectileSpawned {
            slot,
            friendly: spawn.friendly,
        });
        slot
    }

    /// Emits a burst of cosmetic particles at `origin`.
    pub fn burst(&mut self, origin: Vec2) {
        let count = self.config.burst_particles;
        for _ in 0..count {
            let spawn = ParticleSpawn::at(origin)
                .with_speed(Vec2::new(
                    self.rng.gen_range(-1.0..=1.0),
                    self.rng.gen_range(-2.5..=-1.0),
                ))
                .with_lifetime(self.rng.gen_range(30.0..=60.0))
                .with_frame(self.rng.gen_range(0..4));
            self.particles.spawn(|p| p.spawn(&spawn));
        }
        self.events.push(SimEvent::ParticleBurst { origin, count });
    }

    /// Brings every enemy back to its spawn point, alive.
    pub fn respawn_enemies(&mut self) {
        for enemy in &mut self.enemies {
            enemy.respawn();
        }
        self.refresh_visibility();
    }

    /// Restarts play from a checkpoint.
    ///
    /// The player is revived at `pos`, the camera snaps to the room that
    /// contains it, transient actors are cleared and every enemy respawns.
    pub fn reset_to_checkpoint(&mut self, pos: Vec2) {
        self.player.respawn_at(pos);
        self.camera.focus_on(pos);
        self.projectiles.clear_with(|p| p.body_mut().kill());
        self.particles.clear_with(|p| p.body_mut().kill());
        self.spawns = SpawnQueue::default();
        info!(x = pos.x, y = pos.y, "checkpoint_reset");
        self.respawn_enemies();
        self.record_room();
    }

    /// Drains the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        self.events.take()
    }

    /// Render snapshot of every visible actor.
    ///
    /// Order: triggers, enemies, player, projectiles, particles.
    #[must_use]
    pub fn draw_list(&self) -> Vec<DrawInfo> {
        let triggers = self.triggers.iter().filter_map(|t| t.draw_info());
        let enemies = self.enemies.iter().filter_map(|e| e.draw_info());
        let projectiles = self.projectiles.iter().filter_map(Drawable::draw_info);
        let particles = self.particles.iter().filter_map(Drawable::draw_info);
        triggers
            .chain(enemies)
            .chain(self.player.draw_info())
            .chain(projectiles)
            .chain(particles)
            .collect()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current tick number.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The stage grid.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The stage grid, mutably.
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &dyn PlayerActor {
        self.player.as_ref()
    }

    /// The player, mutably.
    pub fn player_mut(&mut self) -> &mut dyn PlayerActor {
        self.player.as_mut()
    }

    /// Enemies in marker order.
    #[must_use]
    pub fn enemies(&self) -> &[Box<dyn EnemyActor>] {
        &self.enemies
    }

    /// Triggers in marker order.
    #[must_use]
    pub fn triggers(&self) -> &[Box<dyn Trigger>] {
        &self.triggers
    }

    /// Projectile pool.
    #[must_use]
    pub fn projectiles(&self) -> &SlotArena<Projectile> {
        &self.projectiles
    }

    /// Particle pool.
    #[must_use]
    pub fn particles(&self) -> &SlotArena<Particle> {
        &self.particles
    }

    /// Game progress.
    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Game progress, mutably.
    pub fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn refresh_visibility(&mut self) {
        let camera = &self.camera;
        for trigger in &mut self.triggers {
            camera_check(trigger.as_mut(), camera);
        }
        for enemy in &mut self.enemies {
            camera_check(enemy.as_mut(), camera);
        }
    }

    fn record_room(&mut self) {
        let room = self.camera.room_index(rooms(&self.stage, &self.config).0);
        self.progress.insert(SetKey::RoomsVisited, room);
        self.events.push(SimEvent::RoomEntered { room });
    }
}

/// Rooms across and down the stage. A partial room at an edge counts.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rooms(stage: &Stage, config: &SimConfig) -> (u32, u32) {
    let across = (stage.pixel_width() / config.viewport.x).ceil().max(1.0) as u32;
    let down = (stage.pixel_height() / config.viewport.y).ceil().max(1.0) as u32;
    (across, down)
}

/// Starts a room transition when the player pushes against a viewport edge.
///
/// Where there is no room beyond a side edge the player is stopped there
/// instead.
fn room_exit(
    stage: &Stage,
    camera: &mut Camera,
    config: &SimConfig,
    player: &mut dyn PlayerActor,
    ctx: &mut TickContext<'_>,
) {
    let body = player.body();
    if !body.is_active() {
        return;
    }
    let view = camera.rect();
    let margin = config.transition.edge_margin;
    let (pos, speed) = (body.pos, body.speed);

    let (dx, dy) = if pos.x - margin < view.x && speed.x < 0.0 {
        (-1, 0)
    } else if pos.x + margin > view.right() && speed.x > 0.0 {
        (1, 0)
    } else if pos.y - margin < view.y && speed.y < 0.0 {
        (0, -1)
    } else if pos.y + margin > view.bottom() && speed.y > 0.0 {
        (0, 1)
    } else {
        return;
    };

    let target = camera.room().as_ivec2() + IVec2::new(dx, dy);
    let (across, down) = rooms(stage, config);
    let inside = u32::try_from(target.x).is_ok_and(|x| x < across)
        && u32::try_from(target.y).is_ok_and(|y| y < down);

    if inside {
        if camera.start_transition(dx, dy, config.transition.speed) {
            ctx.events.push(SimEvent::TransitionStarted { dx, dy });
            debug!(dx, dy, "transition_started");
        }
        return;
    }
    if dx < 0 {
        wall_collision(player, view.x, view.y, view.h, -1.0, true, ctx);
    } else if dx > 0 {
        wall_collision(player, view.right(), view.y, view.h, 1.0, true, ctx);
    }
}
