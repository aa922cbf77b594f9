//! Per-entity tuning components.
//!
//! Collision margins are carried by every body instead of being global
//! constants: entity kinds tune them separately per axis.

use serde::{Deserialize, Serialize};

/// Tolerance window for one axis of the swept tile test.
///
/// All distances except `epsilon` are multiplied by the tick step before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionMargins {
    /// Minimum speed toward a side before that side is tested.
    pub epsilon: f32,
    /// How far short of a boundary the new leading edge may stop and still
    /// count as touching it.
    pub near: f32,
    /// How far past a boundary the old leading edge may already be. The
    /// current speed is added on top.
    pub far: f32,
    /// Inset applied to the cross-axis overlap test, so bodies sliding along
    /// a surface do not catch on the corner of a neighbouring tile.
    pub cross: f32,
}

impl Default for CollisionMargins {
    fn default() -> Self {
        Self {
            epsilon: 0.001,
            near: 1.0,
            far: 4.0,
            cross: 1.0,
        }
    }
}

/// Margins for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisMargins {
    /// Used by wall (x-axis) tests.
    pub horizontal: CollisionMargins,
    /// Used by floor/ceiling (y-axis) tests.
    pub vertical: CollisionMargins,
}

impl AxisMargins {
    /// Same margins on both axes.
    #[must_use]
    pub fn uniform(margins: CollisionMargins) -> Self {
        Self {
            horizontal: margins,
            vertical: margins,
        }
    }
}
