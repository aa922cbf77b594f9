//! Tile collision resolution.
//!
//! After an actor has integrated its motion, [`TileResolver::resolve`] scans
//! the tiles around it and applies whatever each one means:
//!
//! - solid sides run the swept boundary tests in [`sweep`]
//! - ladders report overlap and never block
//! - breakables ask the actor whether it breaks them, otherwise block
//! - hazards report overlap with their hurt area, then block on that area
//! - wind columns and the stage water body push unless the actor handles
//!   them itself
//! - the viewport edges and the top of the world act as walls
//!
//! # Invariants
//!
//! - A body that is dying, absent or out of camera is never touched.
//! - The scan stops as soon as the body stops being active, so an actor that
//!   dies on a hazard gets no further callbacks that tick.
//! - A breakable cell is cleared at most once; a second entity touching the
//!   same cell later in the tick finds it empty.

pub mod sweep;
mod zones;

use tracing::debug;

use crate::behavior::{Collidable, TickContext};
use crate::camera::Camera;
use crate::config::{SimConfig, WaterConfig, WindConfig};
use crate::entity::BodyFlags;
use crate::events::SimEvent;
use crate::geometry::Rect;
use crate::stage::Stage;
use crate::tiles::{tile_coords, tile_rect, HazardVariant, SideFlags, TileKind, TILE_SIZE};

pub use sweep::{box_collision, solid_sides, vertical_collision, wall_collision};

/// Upper bound on the scan radius, in tiles.
const MAX_SCAN_RADIUS: u32 = 8;

/// One cell of one collision layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    layer: usize,
    x: i32,
    y: i32,
}

/// Applies stage tiles, zones and viewport bounds to actors.
#[derive(Debug, Clone, PartialEq)]
pub struct TileResolver {
    scan_radius: i32,
    wind: WindConfig,
    water: WaterConfig,
    clear_fences_on_break: bool,
}

impl Default for TileResolver {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

impl TileResolver {
    /// Builds a resolver from the simulation config.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            scan_radius: config.scan_radius.min(MAX_SCAN_RADIUS) as i32,
            wind: config.wind,
            water: config.water,
            clear_fences_on_break: config.clear_fences_on_break,
        }
    }

    /// Tiles scanned around the body's center in every direction.
    #[must_use]
    pub fn scan_radius(&self) -> i32 {
        self.scan_radius
    }

    /// Resolves one actor against the stage for this tick.
    pub fn resolve<A: Collidable + ?Sized>(
        &self,
        stage: &mut Stage,
        actor: &mut A,
        camera: &Camera,
        ctx: &mut TickContext<'_>,
    ) {
        if !actor.body().is_active() {
            return;
        }
        let body = actor.body();
        let (tx, ty) = tile_coords(body.pos + body.center);
        let r = self.scan_radius;

        for li in 0..stage.collision_layers().len() {
            let layer = stage.collision_layers()[li];
            for y in (ty - r)..=(ty + r) {
                for x in (tx - r)..=(tx + r) {
                    if !actor.body().is_active() {
                        return;
                    }
                    let kind = stage.tile_kind(layer, x, y);
                    self.apply_tile(stage, actor, camera, Cell { layer, x, y }, kind, ctx);
                }
            }
        }

        if !actor.body().is_active() {
            return;
        }
        self.apply_wind(stage, actor, (tx, ty), ctx);
        self.apply_water(stage, actor, camera, ctx);
        zones::apply_bounds(actor, camera, ctx);
    }

    fn apply_tile<A: Collidable + ?Sized>(
        &self,
        stage: &mut Stage,
        actor: &mut A,
        camera: &Camera,
        cell: Cell,
        kind: TileKind,
        ctx: &mut TickContext<'_>,
    ) {
        match kind {
            TileKind::Empty | TileKind::Wind => {}
            TileKind::Solid(sides) => {
                solid_sides(actor, tile_rect(cell.x, cell.y), sides, ctx);
            }
            TileKind::Ladder { top } => {
                let area = ladder_area(cell.x, cell.y);
                if actor.body().touches_area(area) {
                    actor.ladder_collision(area, top, ctx);
                }
            }
            TileKind::Breakable { level } => {
                self.apply_breakable(stage, actor, camera, cell, level, ctx);
            }
            TileKind::Hazard(variant) => apply_hazard(actor, variant, cell, ctx),
        }
    }

    fn apply_breakable<A: Collidable + ?Sized>(
        &self,
        stage: &mut Stage,
        actor: &mut A,
        camera: &Camera,
        cell: Cell,
        level: u8,
        ctx: &mut TickContext<'_>,
    ) {
        let area = tile_rect(cell.x, cell.y);
        if actor.body().touches_area(area) && actor.break_collision(area, level, ctx) {
            if stage.clear_tile(cell.layer, cell.x, cell.y) {
                debug!(layer = cell.layer, x = cell.x, y = cell.y, level, "tile_broken");
                ctx.events.push(SimEvent::TileBroken {
                    layer: cell.layer,
                    x: cell.x,
                    y: cell.y,
                });
                ctx.spawns.burst(area.center());
                if self.clear_fences_on_break {
                    let count = stage.clear_fences_in(camera.rect());
                    if count > 0 {
                        ctx.events.push(SimEvent::FencesCleared { count });
                    }
                }
            }
            return;
        }
        box_collision(actor, area, ctx);
    }
}

/// Climbable strip of a ladder cell.
fn ladder_area(tx: i32, ty: i32) -> Rect {
    let tile = tile_rect(tx, ty);
    Rect::new(tile.x + TILE_SIZE / 4.0, tile.y, TILE_SIZE / 2.0, TILE_SIZE)
}

fn apply_hazard<A: Collidable + ?Sized>(
    actor: &mut A,
    variant: HazardVariant,
    cell: Cell,
    ctx: &mut TickContext<'_>,
) {
    if variant.is_fence() && actor.body().flags.contains(BodyFlags::IGNORE_FENCE) {
        return;
    }
    let area = variant.world_area(cell.x, cell.y);
    if actor.body().touches_area(area) {
        actor.hurt_collision(area, variant.push_dir(), ctx);
    }
    let sides = if variant.is_fence() {
        SideFlags::LEFT | SideFlags::RIGHT
    } else {
        SideFlags::all()
    };
    solid_sides(actor, area, sides, ctx);
}
