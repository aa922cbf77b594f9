//! Pooled cosmetic particles.
//!
//! Particles fly ballistically, ignore tiles and disappear when they leave
//! the viewport or run out of lifetime. Nothing in the simulation reads
//! them back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::arena::Poolable;
use crate::behavior::{Movable, TickContext};
use crate::entity::{ActorTag, Body, BodyFlags};
use crate::sprite::Sprite;

/// Terminal fall speed.
pub const PARTICLE_MAX_FALL: f32 = 4.0;

/// Parameters of one particle spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSpawn {
    /// Spawn position.
    pub pos: Vec2,
    /// Initial velocity.
    pub speed: Vec2,
    /// Downward acceleration per step.
    pub gravity: f32,
    /// Steps before the particle vanishes.
    pub lifetime: f32,
    /// Sprite column.
    pub frame: i32,
}

impl ParticleSpawn {
    /// A resting particle at `pos` with default gravity and lifetime.
    #[must_use]
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            speed: Vec2::ZERO,
            gravity: 0.15,
            lifetime: 60.0,
            frame: 0,
        }
    }

    /// Sets the initial velocity.
    #[must_use]
    pub fn with_speed(mut self, speed: Vec2) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the lifetime in steps.
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Sets the sprite column.
    #[must_use]
    pub fn with_frame(mut self, frame: i32) -> Self {
        self.frame = frame;
        self
    }
}

/// A particle slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    body: Body,
    lifetime: f32,
}

impl Default for Particle {
    fn default() -> Self {
        let mut body = Body::dormant();
        body.sprite = Sprite::new(8.0, 8.0);
        body.hitbox = Vec2::splat(8.0);
        body.collision_box = Vec2::splat(8.0);
        Self {
            body,
            lifetime: 0.0,
        }
    }
}

impl Particle {
    /// Fills the slot with a new particle.
    pub fn spawn(&mut self, spawn: &ParticleSpawn) {
        self.body.revive(spawn.pos);
        self.body.speed = spawn.speed;
        // Gravity as an acceleration toward terminal velocity; x is held.
        self.body.target = Vec2::new(spawn.speed.x, PARTICLE_MAX_FALL);
        self.body.friction = Vec2::new(0.0, spawn.gravity);
        self.body.flags.insert(BodyFlags::IN_CAMERA);
        self.body.sprite.set_frame(spawn.frame, 0);
        self.lifetime = spawn.lifetime;
    }

    /// Steps left before the particle vanishes.
    #[must_use]
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }
}

impl Poolable for Particle {
    fn is_live(&self) -> bool {
        self.body.exists()
    }
}

impl Movable for Particle {
    fn tag(&self) -> ActorTag {
        ActorTag::Particle
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn post_movement(&mut self, ctx: &mut TickContext<'_>) {
        self.lifetime -= ctx.step;
        if self.lifetime <= 0.0 {
            self.body.kill();
        }
    }

    fn outside_camera_event(&mut self) {
        self.body.kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{self, TickState};

    #[test]
    fn falls_toward_terminal_speed() {
        let mut p = Particle::default();
        p.spawn(&ParticleSpawn::at(Vec2::ZERO).with_speed(Vec2::new(1.0, -1.0)));
        let mut state = TickState::default();
        for tick in 0..100 {
            behavior::update(&mut p, &mut state.context(1.0, tick));
            assert!(p.body().speed.y <= PARTICLE_MAX_FALL + 0.0001);
            if !p.is_live() {
                break;
            }
        }
        assert!((p.body().speed.y - PARTICLE_MAX_FALL).abs() < 0.0001);
        assert!((p.body().speed.x - 1.0).abs() < 0.0001);
    }

    #[test]
    fn expires_after_lifetime() {
        let mut p = Particle::default();
        p.spawn(&ParticleSpawn::at(Vec2::ZERO).with_lifetime(3.0));
        let mut state = TickState::default();
        for tick in 0..2 {
            behavior::update(&mut p, &mut state.context(1.0, tick));
        }
        assert!(p.is_live());
        behavior::update(&mut p, &mut state.context(1.0, 2));
        assert!(!p.is_live());
    }

    #[test]
    fn leaving_camera_removes_it() {
        let mut p = Particle::default();
        p.spawn(&ParticleSpawn::at(Vec2::ZERO));
        p.outside_camera_event();
        assert!(!p.is_live());
    }

    #[test]
    fn reused_slot_starts_fresh() {
        let mut p = Particle::default();
        p.spawn(&ParticleSpawn::at(Vec2::ZERO).with_frame(2));
        p.body_mut().kill();
        p.spawn(&ParticleSpawn::at(Vec2::ONE));
        assert!(p.is_live());
        assert_eq!(p.body().pos, Vec2::ONE);
        assert_eq!(p.body().sprite.column(), 0);
        assert!((p.lifetime() - 60.0).abs() < 0.0001);
    }
}
