//! The tile grid.
//!
//! A [`Stage`] is built once from an already decoded [`StageDesc`]. At load
//! time the collision map is turned into a [`TileKind`] lookup indexed by raw
//! tile id, and the object layer is turned into a list of [`Marker`]s through
//! an explicit [`MarkerTable`]. After that the grid only changes through the
//! few mutations special tiles need: clearing a broken cell, swapping the
//! toggle pair and removing fence decoration.
//!
//! Out-of-range coordinates are never an error. They read as raw id 0, which
//! is always [`TileKind::Empty`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LedgewalkError, Result};
use crate::geometry::Rect;
use crate::tiles::{TileKind, TILE_SIZE};

// =============================================================================
// Object markers
// =============================================================================

/// Broad class of an object marker range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerClass {
    /// Player start position.
    PlayerStart,
    /// Block-toggling floor switch.
    Switch,
    /// Enemy; the offset into the range selects the variant.
    Enemy,
    /// Collectible item; the offset is the item id.
    Item,
    /// Interaction target; the offset is the target id.
    Interactable,
}

/// Inclusive range of raw object ids sharing a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerRange {
    /// First raw id of the range.
    pub first: u16,
    /// Last raw id of the range.
    pub last: u16,
    /// Class assigned to every id in the range.
    pub class: MarkerClass,
}

/// Decoded object marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Player start.
    PlayerStart,
    /// Floor switch.
    Switch,
    /// Enemy of the given variant.
    Enemy(u16),
    /// Item with the given id.
    Item(u16),
    /// Interaction target with the given id.
    Interactable(u16),
}

/// A marker placed on the object layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// What to spawn.
    pub kind: MarkerKind,
    /// Tile column.
    pub tile_x: u32,
    /// Tile row.
    pub tile_y: u32,
}

impl Marker {
    /// Spawn position: the center of the marker's tile.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn spawn_pos(&self) -> Vec2 {
        Vec2::new(
            self.tile_x as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            self.tile_y as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        )
    }
}

/// Raw object id numbering.
///
/// Ranges are applied in order; a later range overrides an earlier one where
/// they overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerTable {
    /// Ranges in application order.
    pub ranges: Vec<MarkerRange>,
}

impl Default for MarkerTable {
    fn default() -> Self {
        Self {
            ranges: vec![
                MarkerRange {
                    first: 1,
                    last: 1,
                    class: MarkerClass::PlayerStart,
                },
                MarkerRange {
                    first: 2,
                    last: 2,
                    class: MarkerClass::Switch,
                },
                MarkerRange {
                    first: 3,
                    last: 16,
                    class: MarkerClass::Interactable,
                },
                MarkerRange {
                    first: 17,
                    last: 48,
                    class: MarkerClass::Enemy,
                },
                MarkerRange {
                    first: 49,
                    last: 64,
                    class: MarkerClass::Item,
                },
            ],
        }
    }
}

impl MarkerTable {
    /// Builds a lookup indexed by raw id.
    #[must_use]
    pub fn build(&self) -> Vec<Option<MarkerKind>> {
        let len = self
            .ranges
            .iter()
            .map(|r| usize::from(r.last) + 1)
            .max()
            .unwrap_or(0);
        let mut lookup = vec![None; len];
        for range in &self.ranges {
            for raw in range.first..=range.last {
                let offset = raw - range.first;
                lookup[usize::from(raw)] = Some(match range.class {
                    MarkerClass::PlayerStart => MarkerKind::PlayerStart,
                    MarkerClass::Switch => MarkerKind::Switch,
                    MarkerClass::Enemy => MarkerKind::Enemy(offset),
                    MarkerClass::Item => MarkerKind::Item(offset),
                    MarkerClass::Interactable => MarkerKind::Interactable(offset),
                });
            }
        }
        lookup
    }
}

// =============================================================================
// Stage description
// =============================================================================

/// Decoded stage data as produced by a tilemap loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDesc {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Raw tile ids, row-major, one vector per layer. Id 0 is empty.
    pub layers: Vec<Vec<u16>>,
    /// Collision id for each raw tile id, indexed by raw id.
    #[serde(default)]
    pub collision_map: Vec<u8>,
    /// Layers tested for collisions. All layers when absent.
    #[serde(default)]
    pub collision_layers: Option<Vec<usize>>,
    /// Raw object marker ids, row-major.
    #[serde(default)]
    pub objects: Option<Vec<u16>>,
    /// Marker numbering for `objects`.
    #[serde(default)]
    pub markers: MarkerTable,
    /// Row of the water surface, if the stage has water.
    #[serde(default)]
    pub water_level: Option<u32>,
    /// Whether the stage starts in interior state.
    #[serde(default)]
    pub inside: bool,
    /// Whether tile lookups wrap horizontally.
    #[serde(default)]
    pub loop_x: bool,
    /// Raw ids swapped by switches.
    #[serde(default)]
    pub toggle_pair: Option<(u16, u16)>,
    /// Raw ids of fence decoration removed when a tile breaks.
    #[serde(default)]
    pub fence_tiles: Vec<u16>,
}

// =============================================================================
// Stage
// =============================================================================

/// Rectangular tile grid with collision semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    width: u32,
    height: u32,
    layers: Vec<Vec<u16>>,
    collision_layers: Vec<usize>,
    kinds: Vec<TileKind>,
    markers: Vec<Marker>,
    water_level: Option<u32>,
    inside: bool,
    loop_x: bool,
    toggle_pair: Option<(u16, u16)>,
    fence_tiles: Vec<u16>,
}

impl Stage {
    /// Validates `desc` and builds the collision and marker lookups.
    ///
    /// # Errors
    ///
    /// Returns an error when a dimension is zero, there are no layers, a
    /// layer or the object layer has the wrong cell count, or a collision
    /// layer index is out of range. Unknown collision ids and object markers
    /// are logged and treated as empty.
    pub fn from_desc(desc: StageDesc) -> Result<Self> {
        if desc.width == 0 || desc.height == 0 {
            return Err(LedgewalkError::EmptyStage {
                width: desc.width,
                height: desc.height,
            });
        }
        if desc.layers.is_empty() {
            return Err(LedgewalkError::NoLayers);
        }

        let expected = desc.width as usize * desc.height as usize;
        for (layer, cells) in desc.layers.iter().enumerate() {
            if cells.len() != expected {
                return Err(LedgewalkError::LayerSize {
                    layer,
                    expected,
                    actual: cells.len(),
                });
            }
        }

        let collision_layers = desc
            .collision_layers
            .unwrap_or_else(|| (0..desc.layers.len()).collect());
        if let Some(&index) = collision_layers.iter().find(|&&i| i >= desc.layers.len()) {
            return Err(LedgewalkError::CollisionLayer {
                index,
                layers: desc.layers.len(),
            });
        }

        let kinds = build_kinds(&desc.collision_map);
        let missing = collision_layers
            .iter()
            .flat_map(|&i| desc.layers[i].iter())
            .filter(|&&raw| raw != 0 && usize::from(raw) >= kinds.len())
            .count();
        if missing > 0 {
            warn!(
                cells = missing,
                map_len = kinds.len(),
                "collision_map_missing_entries"
            );
        }

        let markers = match &desc.objects {
            Some(objects) => {
                if objects.len() != expected {
                    return Err(LedgewalkError::ObjectLayerSize {
                        expected,
                        actual: objects.len(),
                    });
                }
                parse_markers(objects, desc.width, &desc.markers)
            }
            None => Vec::new(),
        };

        debug!(
            width = desc.width,
            height = desc.height,
            layers = desc.layers.len(),
            markers = markers.len(),
            "stage_loaded"
        );

        Ok(Self {
            width: desc.width,
            height: desc.height,
            layers: desc.layers,
            collision_layers,
            kinds,
            markers,
            water_level: desc.water_level,
            inside: desc.inside,
            loop_x: desc.loop_x,
            toggle_pair: desc.toggle_pair,
            fence_tiles: desc.fence_tiles,
        })
    }

    /// Width in tiles.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width in world units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    /// Height in world units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    /// Number of tile layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Indices of the layers tested for collisions.
    #[must_use]
    pub fn collision_layers(&self) -> &[usize] {
        &self.collision_layers
    }

    /// Object markers decoded at load time, in row-major order.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The first player start marker.
    #[must_use]
    pub fn player_start(&self) -> Option<&Marker> {
        self.markers
            .iter()
            .find(|m| m.kind == MarkerKind::PlayerStart)
    }

    /// Row of the water surface.
    #[must_use]
    pub fn water_level(&self) -> Option<u32> {
        self.water_level
    }

    /// World y of the water surface.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn water_surface_y(&self) -> Option<f32> {
        self.water_level.map(|row| row as f32 * TILE_SIZE)
    }

    /// Whether the stage is in interior state.
    #[must_use]
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Switches interior state.
    pub fn set_inside(&mut self, inside: bool) {
        self.inside = inside;
    }

    /// Whether tile lookups wrap horizontally.
    #[must_use]
    pub fn loops_x(&self) -> bool {
        self.loop_x
    }

    /// Raw tile id at a cell; 0 outside the grid or for a missing layer.
    #[must_use]
    pub fn tile(&self, layer: usize, x: i32, y: i32) -> u16 {
        match (self.layers.get(layer), self.cell_index(x, y)) {
            (Some(cells), Some(index)) => cells[index],
            _ => 0,
        }
    }

    /// Decoded collision meaning of a cell.
    #[must_use]
    pub fn tile_kind(&self, layer: usize, x: i32, y: i32) -> TileKind {
        let raw = self.tile(layer, x, y);
        self.kinds
            .get(usize::from(raw))
            .copied()
            .unwrap_or(TileKind::Empty)
    }

    /// Clears a cell to empty. Returns `false` if it already was.
    pub fn clear_tile(&mut self, layer: usize, x: i32, y: i32) -> bool {
        let Some(index) = self.cell_index(x, y) else {
            return false;
        };
        let Some(cell) = self.layers.get_mut(layer).and_then(|l| l.get_mut(index)) else {
            return false;
        };
        if *cell == 0 {
            return false;
        }
        *cell = 0;
        true
    }

    /// Swaps the two toggle tile ids across every layer.
    ///
    /// Returns the number of cells rewritten; 0 when the stage has no
    /// toggle pair.
    pub fn toggle_special_blocks(&mut self) -> usize {
        let Some((a, b)) = self.toggle_pair else {
            return 0;
        };
        let mut swapped = 0;
        for cell in self.layers.iter_mut().flatten() {
            if *cell == a {
                *cell = b;
                swapped += 1;
            } else if *cell == b {
                *cell = a;
                swapped += 1;
            }
        }
        debug!(a, b, swapped, "special_blocks_toggled");
        swapped
    }

    /// Clears fence decoration tiles overlapping `area` on every layer.
    ///
    /// Returns the number of cells cleared.
    #[allow(clippy::cast_possible_truncation)]
    pub fn clear_fences_in(&mut self, area: Rect) -> usize {
        if self.fence_tiles.is_empty() {
            return 0;
        }
        let x0 = (area.x / TILE_SIZE).floor() as i32;
        let y0 = (area.y / TILE_SIZE).floor() as i32;
        let x1 = (area.right() / TILE_SIZE).ceil() as i32 - 1;
        let y1 = (area.bottom() / TILE_SIZE).ceil() as i32 - 1;

        let mut cleared = 0;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let Some(index) = self.cell_index(x, y) else {
                    continue;
                };
                for layer in &mut self.layers {
                    if self.fence_tiles.contains(&layer[index]) {
                        layer[index] = 0;
                        cleared += 1;
                    }
                }
            }
        }
        cleared
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        let (w, h) = (self.width as i32, self.height as i32);
        let x = if self.loop_x { x.rem_euclid(w) } else { x };
        if x < 0 || x >= w || y < 0 || y >= h {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

fn build_kinds(collision_map: &[u8]) -> Vec<TileKind> {
    collision_map
        .iter()
        .enumerate()
        .map(|(raw, &id)| {
            TileKind::from_collision_id(id).unwrap_or_else(|| {
                warn!(raw, id, "unknown_collision_id");
                TileKind::Empty
            })
        })
        .collect()
}

fn parse_markers(objects: &[u16], width: u32, table: &MarkerTable) -> Vec<Marker> {
    let lookup = table.build();
    let mut markers = Vec::new();
    let mut tile_x = 0;
    let mut tile_y = 0;
    for &raw in objects {
        if raw != 0 {
            match lookup.get(usize::from(raw)).copied().flatten() {
                Some(kind) => markers.push(Marker {
                    kind,
                    tile_x,
                    tile_y,
                }),
                None => warn!(raw, tile_x, tile_y, "unknown_object_marker"),
            }
        }
        tile_x += 1;
        if tile_x == width {
            tile_x = 0;
            tile_y += 1;
        }
    }
    markers
}
