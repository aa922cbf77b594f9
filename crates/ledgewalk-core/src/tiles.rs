//! Tile collision table.
//!
//! A raw tile index maps through the stage's collision map to a small
//! collision id. Ids `1..=15` select a combination of solid sides from
//! [`COLLISION_TABLE`]; ids from [`LADDER_TOP`] upward select special
//! behavior. [`TileKind`] is the decoded form the resolver dispatches on.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Edge length of a tile in world units.
pub const TILE_SIZE: f32 = 16.0;

bitflags! {
    /// Sides of a tile that block movement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SideFlags: u8 {
        /// Top edge stops a body moving down (a floor).
        const DOWN = 1 << 0;
        /// Bottom edge stops a body moving up (a ceiling).
        const UP = 1 << 1;
        /// Left edge stops a body moving right.
        const LEFT = 1 << 2;
        /// Right edge stops a body moving left.
        const RIGHT = 1 << 3;
    }
}

const D: SideFlags = SideFlags::DOWN;
const U: SideFlags = SideFlags::UP;
const L: SideFlags = SideFlags::LEFT;
const R: SideFlags = SideFlags::RIGHT;

/// Side flags for collision ids `1..=15`, stored at `id - 1`.
///
/// Singles first, then pairs, triples and the fully solid block.
pub const COLLISION_TABLE: [SideFlags; 15] = [
    D,
    U,
    L,
    R,
    D.union(U),
    D.union(L),
    D.union(R),
    U.union(L),
    U.union(R),
    L.union(R),
    D.union(U).union(L),
    D.union(U).union(R),
    D.union(L).union(R),
    U.union(L).union(R),
    SideFlags::all(),
];

/// Ladder segment with a landing on top.
pub const LADDER_TOP: u8 = 16;
/// Ladder segment.
pub const LADDER_BODY: u8 = 17;
/// Breakable block, level 0.
pub const BREAKABLE_WEAK: u8 = 18;
/// Breakable block, level 1.
pub const BREAKABLE_STRONG: u8 = 19;
/// Spikes on a floor.
pub const SPIKES_FLOOR: u8 = 20;
/// Spikes hanging from a ceiling.
pub const SPIKES_CEILING: u8 = 21;
/// Spikes on the left side of a tile, pointing right.
pub const SPIKES_LEFT: u8 = 22;
/// Spikes on the right side of a tile, pointing left.
pub const SPIKES_RIGHT: u8 = 23;
/// Electrified fence.
pub const FENCE: u8 = 24;
/// Anchor tile of a wind zone.
pub const WIND: u8 = 25;

/// Side flags for a collision id; empty for id 0 and for special ids.
#[must_use]
pub fn side_flags(id: u8) -> SideFlags {
    match id {
        1..=15 => COLLISION_TABLE[usize::from(id - 1)],
        _ => SideFlags::empty(),
    }
}

/// Hazard sub-variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardVariant {
    /// Spikes on the floor.
    SpikesFloor,
    /// Spikes on the ceiling.
    SpikesCeiling,
    /// Spikes on a wall facing right.
    SpikesLeft,
    /// Spikes on a wall facing left.
    SpikesRight,
    /// Thin vertical fence; bodies flagged `IGNORE_FENCE` pass through.
    Fence,
}

impl HazardVariant {
    /// Hurt area relative to the tile's top-left corner.
    #[must_use]
    pub fn area(self) -> Rect {
        match self {
            Self::SpikesFloor => Rect::new(2.0, 10.0, 12.0, 6.0),
            Self::SpikesCeiling => Rect::new(2.0, 0.0, 12.0, 6.0),
            Self::SpikesLeft => Rect::new(0.0, 2.0, 6.0, 12.0),
            Self::SpikesRight => Rect::new(10.0, 2.0, 6.0, 12.0),
            Self::Fence => Rect::new(6.0, 0.0, 4.0, 16.0),
        }
    }

    /// Horizontal knockback direction, 0 when the victim should decide.
    #[must_use]
    pub fn push_dir(self) -> f32 {
        match self {
            Self::SpikesLeft => 1.0,
            Self::SpikesRight => -1.0,
            Self::SpikesFloor | Self::SpikesCeiling | Self::Fence => 0.0,
        }
    }

    /// Whether `IGNORE_FENCE` bodies skip this variant.
    #[must_use]
    pub fn is_fence(self) -> bool {
        matches!(self, Self::Fence)
    }

    /// Hurt area in world space for the tile at (`tx`, `ty`).
    #[must_use]
    pub fn world_area(self, tx: i32, ty: i32) -> Rect {
        self.area().translated(tile_origin(tx, ty))
    }
}

/// Decoded meaning of a collision id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Walk-through.
    Empty,
    /// Generic solid sides.
    Solid(SideFlags),
    /// Ladder segment; `top` marks the landing segment.
    Ladder {
        /// Topmost segment.
        top: bool,
    },
    /// Destroyed by a qualifying attack, otherwise a solid block.
    Breakable {
        /// Attack level required, interpreted by the attacker.
        level: u8,
    },
    /// Hurts on contact and blocks like a box.
    Hazard(HazardVariant),
    /// Anchor of an upward wind column.
    Wind,
}

impl TileKind {
    /// Decodes a collision id. Returns `None` for ids with no meaning.
    #[must_use]
    pub fn from_collision_id(id: u8) -> Option<Self> {
        let kind = match id {
            0 => Self::Empty,
            1..=15 => Self::Solid(side_flags(id)),
            LADDER_TOP => Self::Ladder { top: true },
            LADDER_BODY => Self::Ladder { top: false },
            BREAKABLE_WEAK => Self::Breakable { level: 0 },
            BREAKABLE_STRONG => Self::Breakable { level: 1 },
            SPIKES_FLOOR => Self::Hazard(HazardVariant::SpikesFloor),
            SPIKES_CEILING => Self::Hazard(HazardVariant::SpikesCeiling),
            SPIKES_LEFT => Self::Hazard(HazardVariant::SpikesLeft),
            SPIKES_RIGHT => Self::Hazard(HazardVariant::SpikesRight),
            FENCE => Self::Hazard(HazardVariant::Fence),
            WIND => Self::Wind,
            _ => return None,
        };
        Some(kind)
    }

    /// Decodes a collision id, treating unknown ids as walk-through.
    #[must_use]
    pub fn from_collision_id_or_empty(id: u8) -> Self {
        Self::from_collision_id(id).unwrap_or(Self::Empty)
    }
}

/// Top-left corner of a tile in world units.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn tile_origin(tx: i32, ty: i32) -> Vec2 {
    Vec2::new(tx as f32 * TILE_SIZE, ty as f32 * TILE_SIZE)
}

/// Full rectangle of a tile in world units.
#[must_use]
pub fn tile_rect(tx: i32, ty: i32) -> Rect {
    let o = tile_origin(tx, ty);
    Rect::new(o.x, o.y, TILE_SIZE, TILE_SIZE)
}

/// Tile coordinates containing a world point.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn tile_coords(point: Vec2) -> (i32, i32) {
    (
        (point.x / TILE_SIZE).floor() as i32,
        (point.y / TILE_SIZE).floor() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    mod table_tests {
        use super::*;

        #[test]
        fn every_combination_appears_once() {
            let mut seen = std::collections::HashSet::new();
            for flags in COLLISION_TABLE {
                assert!(!flags.is_empty());
                assert!(seen.insert(flags.bits()), "duplicate entry {flags:?}");
            }
            assert_eq!(seen.len(), 15);
        }

        #[test]
        fn zero_and_special_ids_have_no_sides() {
            assert!(side_flags(0).is_empty());
            assert!(side_flags(LADDER_TOP).is_empty());
            assert!(side_flags(255).is_empty());
        }

        #[test]
        fn single_sides_come_first() {
            assert_eq!(side_flags(1), SideFlags::DOWN);
            assert_eq!(side_flags(4), SideFlags::RIGHT);
            assert_eq!(side_flags(15), SideFlags::all());
        }
    }

    mod kind_tests {
        use super::*;

        #[test]
        fn decodes_special_ids() {
            assert_eq!(
                TileKind::from_collision_id(LADDER_TOP),
                Some(TileKind::Ladder { top: true })
            );
            assert_eq!(
                TileKind::from_collision_id(BREAKABLE_STRONG),
                Some(TileKind::Breakable { level: 1 })
            );
            assert_eq!(
                TileKind::from_collision_id(FENCE),
                Some(TileKind::Hazard(HazardVariant::Fence))
            );
            assert_eq!(TileKind::from_collision_id(WIND), Some(TileKind::Wind));
        }

        #[test]
        fn unknown_ids_degrade_to_empty() {
            assert_eq!(TileKind::from_collision_id(200), None);
            assert_eq!(TileKind::from_collision_id_or_empty(200), TileKind::Empty);
        }

        #[test]
        fn hazard_areas_stay_inside_tile() {
            for v in [
                HazardVariant::SpikesFloor,
                HazardVariant::SpikesCeiling,
                HazardVariant::SpikesLeft,
                HazardVariant::SpikesRight,
                HazardVariant::Fence,
            ] {
                let a = v.area();
                assert!(a.x >= 0.0 && a.y >= 0.0);
                assert!(a.right() <= TILE_SIZE && a.bottom() <= TILE_SIZE);
            }
            assert!(HazardVariant::Fence.is_fence());
            assert!(!HazardVariant::SpikesFloor.is_fence());
        }
    }

    mod coord_tests {
        use super::*;

        #[test]
        fn negative_points_floor_down() {
            assert_eq!(tile_coords(Vec2::new(-0.5, 17.0)), (-1, 1));
            assert_eq!(tile_coords(Vec2::new(31.9, 32.0)), (1, 2));
        }

        #[test]
        fn tile_rect_matches_origin() {
            let r = tile_rect(2, 3);
            assert!((r.x - 32.0).abs() < 0.0001);
            assert!((r.y - 48.0).abs() < 0.0001);
            let spikes = HazardVariant::SpikesFloor.world_area(2, 3);
            assert!((spikes.y - 58.0).abs() < 0.0001);
        }
    }
}
