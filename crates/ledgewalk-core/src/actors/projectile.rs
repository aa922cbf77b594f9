//! Pooled projectiles.
//!
//! A projectile flies until it touches any solid tile side, then plays a
//! short burst animation and disappears. Leaving the viewport removes it at
//! once. Friendly projectiles are tested against enemies, hostile ones
//! against the player; either way a hit destroys the projectile.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::arena::Poolable;
use crate::behavior::{Collidable, Movable, TickContext};
use crate::entity::{ActorTag, Body, BodyFlags};

/// Fall speed of projectiles spawned with gravity.
pub const PROJECTILE_GRAVITY: f32 = 2.0;

const DIE_ROW: i32 = 1;
const DIE_LAST_COLUMN: i32 = 4;
const DIE_SPEED: f32 = 4.0;

/// Parameters of one projectile spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpawn {
    /// Spawn position.
    pub pos: Vec2,
    /// Initial velocity; the horizontal part is held for the whole flight.
    pub speed: Vec2,
    /// Accelerate toward [`PROJECTILE_GRAVITY`] instead of holding the
    /// initial vertical speed.
    pub gravity: bool,
    /// Sprite column.
    pub sprite_id: i32,
    /// Hits enemies when `true`, the player when `false`.
    pub friendly: bool,
}

impl ProjectileSpawn {
    /// Friendly, gravity-free projectile.
    #[must_use]
    pub fn new(pos: Vec2, speed: Vec2) -> Self {
        Self {
            pos,
            speed,
            gravity: false,
            sprite_id: 0,
            friendly: true,
        }
    }

    /// Makes the projectile fall.
    #[must_use]
    pub fn with_gravity(mut self) -> Self {
        self.gravity = true;
        self
    }

    /// Makes the projectile hit the player instead of enemies.
    #[must_use]
    pub fn hostile(mut self) -> Self {
        self.friendly = false;
        self
    }

    /// Selects the sprite column.
    #[must_use]
    pub fn with_sprite(mut self, sprite_id: i32) -> Self {
        self.sprite_id = sprite_id;
        self
    }
}

/// A projectile slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    body: Body,
    sprite_id: i32,
    friendly: bool,
}

impl Default for Projectile {
    fn default() -> Self {
        let mut body = Body::dormant();
        body.hitbox = Vec2::splat(4.0);
        body.collision_box = Vec2::splat(2.0);
        body.friction = Vec2::splat(0.1);
        body.flags.insert(BodyFlags::IGNORE_CAMERA_BORDER);
        Self {
            body,
            sprite_id: 0,
            friendly: true,
        }
    }
}

impl Projectile {
    /// Fills the slot with a new projectile.
    ///
    /// The projectile starts flagged in camera so one spawned off-screen is
    /// removed by its first visibility check.
    pub fn spawn(&mut self, spawn: &ProjectileSpawn) {
        self.body.revive(spawn.pos);
        self.body.speed = spawn.speed;
        self.body.target = Vec2::new(
            spawn.speed.x,
            if spawn.gravity {
                PROJECTILE_GRAVITY
            } else {
                spawn.speed.y
            },
        );
        self.body.flags.insert(BodyFlags::IN_CAMERA);
        self.body.sprite.set_frame(spawn.sprite_id, 0);
        self.sprite_id = spawn.sprite_id;
        self.friendly = spawn.friendly;
    }

    /// Stops the projectile and starts its burst animation.
    pub fn destroy(&mut self) {
        if self.body.is_dying() || !self.body.exists() {
            return;
        }
        self.body.start_dying();
        self.body.sprite.set_frame(0, DIE_ROW);
        self.body.stop_movement();
    }

    /// Whether it hits enemies rather than the player.
    #[must_use]
    pub fn is_friendly(&self) -> bool {
        self.friendly
    }

    /// Sprite column chosen at spawn.
    #[must_use]
    pub fn sprite_id(&self) -> i32 {
        self.sprite_id
    }
}

impl Poolable for Projectile {
    fn is_live(&self) -> bool {
        self.body.exists()
    }
}

impl Movable for Projectile {
    fn tag(&self) -> ActorTag {
        ActorTag::Projectile
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn die(&mut self, ctx: &mut TickContext<'_>) -> bool {
        self.body
            .sprite
            .animate(DIE_ROW, 0, DIE_LAST_COLUMN, DIE_SPEED, ctx.step);
        self.body.sprite.column() == DIE_LAST_COLUMN
    }

    fn outside_camera_event(&mut self) {
        self.body.kill();
    }
}

impl Collidable for Projectile {
    fn vertical_collision_event(&mut self, _dir: f32, _ctx: &mut TickContext<'_>) {
        self.destroy();
    }

    fn wall_collision_event(&mut self, _dir: f32, _ctx: &mut TickContext<'_>) {
        self.destroy();
    }
}
