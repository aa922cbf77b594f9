//! Kinematic entity state shared by every simulated actor.
//!
//! This module provides:
//! - [`ActorTag`]: which orchestrator collection an actor belongs to
//! - [`BodyFlags`]: lifecycle and opt-out flags
//! - [`Body`]: position, velocity, boxes and flags of one actor
//! - [`update_speed_axis`]: the approach-to-target integration rule
//!
//! Behavior lives elsewhere (see [`crate::behavior`]); a `Body` is pure state
//! plus the operations every actor kind shares.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use ledgewalk_core::entity::Body;
//!
//! let mut body = Body::new(Vec2::new(32.0, 32.0));
//! body.friction = Vec2::splat(0.5);
//! body.target = Vec2::new(1.0, 0.0);
//!
//! body.integrate(1.0);
//! assert!((body.speed.x - 0.5).abs() < 0.0001);
//! assert!((body.pos.x - 32.5).abs() < 0.0001);
//! ```

pub mod components;

use std::fmt;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::{box_overlay, Rect};
use crate::sprite::Sprite;

pub use components::{AxisMargins, CollisionMargins};

/// Collection an actor belongs to.
///
/// The orchestrator keeps one collection per tag and visits them in a fixed
/// order each tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActorTag {
    /// The player singleton.
    Player,
    /// Pooled projectile.
    Projectile,
    /// Interaction target or switch.
    Trigger,
    /// Enemy.
    Enemy,
    /// Pooled cosmetic particle.
    Particle,
}

impl fmt::Display for ActorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Projectile => write!(f, "Projectile"),
            Self::Trigger => write!(f, "Trigger"),
            Self::Enemy => write!(f, "Enemy"),
            Self::Particle => write!(f, "Particle"),
        }
    }
}

bitflags! {
    /// Lifecycle state and per-entity collision opt-outs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BodyFlags: u16 {
        /// The entity takes part in the simulation.
        const EXISTS = 1 << 0;
        /// The entity is running its death effect.
        const DYING = 1 << 1;
        /// The expanded bounding box intersects the viewport.
        const IN_CAMERA = 1 << 2;
        /// Visibility checks leave `IN_CAMERA` set and fire no exit event.
        const KEEP_IN_CAMERA = 1 << 3;
        /// Tile tests are skipped unless forced.
        const DISABLE_COLLISIONS = 1 << 4;
        /// Fence hazards neither hurt nor block.
        const IGNORE_FENCE = 1 << 5;
        /// Not clamped to the viewport's left and right edges.
        const IGNORE_CAMERA_BORDER = 1 << 6;
        /// Water reports contact but applies no buoyancy.
        const IGNORE_SUBMERSION_PUSH = 1 << 7;
        /// In interior-room state; water is ignored entirely.
        const INSIDE = 1 << 8;
    }
}

/// Moves `speed` toward `target` by at most `delta`, never overshooting.
///
/// With `delta = friction * step` this is the integration rule of every axis:
/// friction acts as an acceleration toward a commanded speed, so the same
/// formula expresses both speeding up and braking.
#[must_use]
pub fn update_speed_axis(speed: f32, target: f32, delta: f32) -> f32 {
    if speed < target {
        (speed + delta).min(target)
    } else {
        (speed - delta).max(target)
    }
}

/// Kinematic state of one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Position in world units.
    pub pos: Vec2,
    /// Position at the start of the current tick.
    pub old_pos: Vec2,
    /// Offset from `pos` to the center of both boxes.
    pub center: Vec2,
    /// Current velocity.
    pub speed: Vec2,
    /// Velocity the body accelerates toward.
    pub target: Vec2,
    /// Per-axis acceleration toward `target`.
    pub friction: Vec2,
    /// Box used for actor-vs-actor overlap.
    pub hitbox: Vec2,
    /// Box used for actor-vs-tile tests, usually smaller than the hitbox.
    pub collision_box: Vec2,
    /// Extra margin around the sprite before the body counts as off-camera.
    pub off_camera_radius: f32,
    /// Lifecycle and opt-out flags.
    pub flags: BodyFlags,
    /// Swept-test tolerances.
    pub margins: AxisMargins,
    /// Frame state for rendering; its size also drives visibility.
    pub sprite: Sprite,
}

impl Body {
    /// Creates an existing, not yet visible body at `pos` with 16x16 boxes.
    #[must_use]
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            old_pos: pos,
            center: Vec2::ZERO,
            speed: Vec2::ZERO,
            target: Vec2::ZERO,
            friction: Vec2::ONE,
            hitbox: Vec2::splat(16.0),
            collision_box: Vec2::splat(16.0),
            off_camera_radius: 0.0,
            flags: BodyFlags::EXISTS,
            margins: AxisMargins::default(),
            sprite: Sprite::new(16.0, 16.0),
        }
    }

    /// Creates a non-existent body, used for empty pool slots.
    #[must_use]
    pub fn dormant() -> Self {
        Self {
            flags: BodyFlags::empty(),
            ..Self::new(Vec2::ZERO)
        }
    }

    /// Whether the body takes part in the simulation.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.flags.contains(BodyFlags::EXISTS)
    }

    /// Whether the body is running its death effect.
    #[must_use]
    pub fn is_dying(&self) -> bool {
        self.flags.contains(BodyFlags::DYING)
    }

    /// Whether the body is inside the viewport.
    #[must_use]
    pub fn in_camera(&self) -> bool {
        self.flags.contains(BodyFlags::IN_CAMERA)
    }

    /// Exists, is in camera and is not dying: eligible for normal movement,
    /// tile tests and hit tests.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.exists() && self.in_camera() && !self.is_dying()
    }

    /// Enters the death state. Calling it again has no further effect.
    pub fn start_dying(&mut self) {
        if self.exists() {
            self.flags.insert(BodyFlags::DYING);
        }
    }

    /// Removes the body from the simulation immediately.
    pub fn kill(&mut self) {
        self.flags
            .remove(BodyFlags::EXISTS | BodyFlags::DYING | BodyFlags::KEEP_IN_CAMERA);
    }

    /// Brings the body back at `pos` with zero velocity.
    pub fn revive(&mut self, pos: Vec2) {
        self.pos = pos;
        self.old_pos = pos;
        self.stop_movement();
        self.flags.remove(BodyFlags::DYING | BodyFlags::KEEP_IN_CAMERA);
        self.flags.insert(BodyFlags::EXISTS);
    }

    /// Zeroes both velocity and target velocity.
    pub fn stop_movement(&mut self) {
        self.speed = Vec2::ZERO;
        self.target = Vec2::ZERO;
    }

    /// Applies the integration rule on both axes and advances the position.
    pub fn integrate(&mut self, step: f32) {
        self.speed.x = update_speed_axis(self.speed.x, self.target.x, self.friction.x * step);
        self.speed.y = update_speed_axis(self.speed.y, self.target.y, self.friction.y * step);
        self.pos += self.speed * step;
    }

    /// World-space hitbox.
    #[must_use]
    pub fn hitbox_rect(&self) -> Rect {
        Rect::from_center(self.pos + self.center, self.hitbox)
    }

    /// World-space collision box.
    #[must_use]
    pub fn collision_rect(&self) -> Rect {
        Rect::from_center(self.pos + self.center, self.collision_box)
    }

    /// Hitbox overlap with an arbitrary rectangle.
    #[must_use]
    pub fn overlaps_rect(&self, rect: Rect) -> bool {
        box_overlay(self.pos, self.center, self.hitbox, rect)
    }

    /// Collision-box overlap with a tile-space area.
    #[must_use]
    pub fn touches_area(&self, rect: Rect) -> bool {
        box_overlay(self.pos, self.center, self.collision_box, rect)
    }

    /// Hitbox-vs-hitbox overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.overlaps_rect(other.hitbox_rect())
    }

    /// Size of the box tested against the viewport.
    #[must_use]
    pub fn visibility_size(&self) -> Vec2 {
        self.sprite.size() + Vec2::splat(self.off_camera_radius * 2.0)
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::dormant()
    }
}
