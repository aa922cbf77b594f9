//! Player contract.
//!
//! Player behavior (input, abilities, animation) belongs to the embedding
//! game. The core needs a handful of queries and commands on top of the
//! collision callbacks, collected in [`PlayerActor`].

use glam::Vec2;

use crate::behavior::{Collidable, Damageable};
use crate::camera::Camera;
use crate::entity::{Body, BodyFlags};

/// Fall speed the player accelerates toward.
pub const PLAYER_GRAVITY: f32 = 4.0;

/// The player singleton.
pub trait PlayerActor: Collidable + Damageable {
    /// Whether the player is standing on something this tick.
    fn is_grounded(&self) -> bool;

    /// Whether the player asked to interact with a strong trigger this tick.
    fn wants_interaction(&self) -> bool {
        false
    }

    /// Launches the player vertically, e.g. off a switch.
    fn bounce(&mut self, speed: f32) {
        self.body_mut().speed.y = speed;
    }

    /// Carries the player with a running camera transition.
    ///
    /// Over a whole transition the player moves `shift` world units in the
    /// transition's direction.
    fn camera_movement(&mut self, camera: &Camera, shift: f32, step: f32) {
        let delta = camera.direction() * camera.speed() * shift * step;
        let body = self.body_mut();
        body.pos += delta;
        body.old_pos = body.pos;
    }

    /// Puts the player back into play at `pos`.
    fn respawn_at(&mut self, pos: Vec2) {
        let body = self.body_mut();
        body.revive(pos);
        body.flags.insert(BodyFlags::IN_CAMERA);
    }
}

/// Body with the player's boxes, friction and gravity.
///
/// The player is never clamped by the viewport sides: walking off an edge
/// is how room transitions start.
#[must_use]
pub fn player_body(pos: Vec2) -> Body {
    let mut body = Body::new(pos);
    body.center = Vec2::new(0.0, 2.0);
    body.hitbox = Vec2::splat(12.0);
    body.collision_box = Vec2::new(8.0, 10.0);
    body.friction = Vec2::new(0.1, 0.15);
    body.target.y = PLAYER_GRAVITY;
    body.flags
        .insert(BodyFlags::IN_CAMERA | BodyFlags::IGNORE_CAMERA_BORDER);
    body
}

/// Grounded-state latch.
///
/// Landing sets the latch from the collision callback, which runs after
/// movement; [`GroundLatch::end_tick`] clears it at the end of the next
/// movement phase. Between the two the latch reads as grounded, which is
/// when triggers and the next tick's intent query it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroundLatch {
    current: bool,
    previous: bool,
}

impl GroundLatch {
    /// Records a landing.
    pub fn land(&mut self) {
        self.current = true;
    }

    /// Call from `post_movement`.
    pub fn end_tick(&mut self) {
        self.previous = self.current;
        self.current = false;
    }

    /// Landed since the last movement phase.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.current
    }

    /// Was grounded going into the last movement phase.
    #[must_use]
    pub fn was_grounded(&self) -> bool {
        self.previous
    }
}
