//! Axis-aligned rectangles and the overlap convention shared by every test.
//!
//! Overlap is inclusive on the near edge of the moving box: a box whose bottom
//! edge sits exactly on a rectangle's top edge counts as touching it. Standing
//! actors rely on this to keep reporting contact with the tile below them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world units, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Creates a rectangle of `size` centered on `center`.
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Returns this rectangle moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Tests overlap with `other` using the [`box_overlay`] convention,
    /// treating `self` as the moving box.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() >= other.x
            && self.x < other.right()
            && self.bottom() >= other.y
            && self.y < other.bottom()
    }
}

/// Tests whether a box of `size`, placed at `pos + center`, overlaps `rect`.
///
/// This is the single overlap primitive of the engine: actor-vs-actor hits use
/// the hitbox as `size`, actor-vs-tile area checks use the collision box.
#[must_use]
pub fn box_overlay(pos: Vec2, center: Vec2, size: Vec2, rect: Rect) -> bool {
    let px = pos.x + center.x - size.x / 2.0;
    let py = pos.y + center.y - size.y / 2.0;

    px + size.x >= rect.x && px < rect.right() && py + size.y >= rect.y && py < rect.bottom()
}

/// Sign of `value` as -1, 0 or 1. Unlike [`f32::signum`], zero maps to zero.
#[must_use]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
