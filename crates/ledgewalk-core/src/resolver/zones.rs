//! Area effects that are not single tiles: wind columns, the stage water
//! body and the viewport bounds.

use crate::behavior::{Collidable, TickContext};
use crate::camera::Camera;
use crate::entity::BodyFlags;
use crate::geometry::Rect;
use crate::progress::Flag;
use crate::stage::Stage;
use crate::tiles::{tile_origin, TileKind, TILE_SIZE};

use super::sweep::{vertical_collision, wall_collision};
use super::TileResolver;

impl TileResolver {
    /// Column of a wind anchor: the anchor cell and the cells stacked above.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    fn wind_area(&self, ax: i32, ay: i32) -> Rect {
        let height = self.wind.height_tiles.max(1) as i32;
        let origin = tile_origin(ax, ay - height + 1);
        Rect::new(origin.x, origin.y, TILE_SIZE, height as f32 * TILE_SIZE)
    }

    #[allow(clippy::cast_possible_wrap)]
    pub(super) fn apply_wind<A: Collidable + ?Sized>(
        &self,
        stage: &Stage,
        actor: &mut A,
        (tx, ty): (i32, i32),
        ctx: &mut TickContext<'_>,
    ) {
        if !ctx.progress.flag(Flag::WindEnabled) {
            return;
        }
        let height = self.wind.height_tiles.max(1) as i32;
        let r = self.scan_radius;

        let mut pushed = false;
        for &layer in stage.collision_layers() {
            for ay in (ty - 1)..=(ty + height) {
                for ax in (tx - r)..=(tx + r) {
                    if stage.tile_kind(layer, ax, ay) != TileKind::Wind {
                        continue;
                    }
                    let area = self.wind_area(ax, ay);
                    if !actor.body().touches_area(area) || actor.wind_collision(area, ctx) {
                        continue;
                    }
                    if !pushed {
                        let body = actor.body_mut();
                        if body.speed.y > self.wind.target_speed {
                            body.speed.y = (body.speed.y - self.wind.acceleration * ctx.step)
                                .max(self.wind.target_speed);
                        }
                        pushed = true;
                    }
                }
            }
        }
    }

    pub(super) fn apply_water<A: Collidable + ?Sized>(
        &self,
        stage: &Stage,
        actor: &mut A,
        camera: &Camera,
        ctx: &mut TickContext<'_>,
    ) {
        if stage.is_inside() || actor.body().flags.contains(BodyFlags::INSIDE) {
            return;
        }
        let Some(surface_y) = stage.water_surface_y() else {
            return;
        };

        let view = camera.rect();
        let band = self.water.surface_band;
        let surface = Rect::new(view.x, surface_y, view.w, band);
        if actor.body().touches_area(surface) {
            actor.water_collision(surface, true, ctx);
        }

        let depth = stage.pixel_height() - surface_y - band;
        if depth <= 0.0 || !actor.body().is_active() {
            return;
        }
        let water = Rect::new(view.x, surface_y + band, view.w, depth);
        if !actor.body().touches_area(water) || actor.water_collision(water, false, ctx) {
            return;
        }
        let body = actor.body_mut();
        if !body.flags.contains(BodyFlags::IGNORE_SUBMERSION_PUSH) {
            body.speed.y = (body.speed.y - self.water.buoyancy * ctx.step).min(self.water.max_sink_speed);
        }
    }
}

/// Clamps the body to the viewport sides and the top of the world.
pub(super) fn apply_bounds<A: Collidable + ?Sized>(
    actor: &mut A,
    camera: &Camera,
    ctx: &mut TickContext<'_>,
) {
    let view = camera.rect();
    if !actor.body().flags.contains(BodyFlags::IGNORE_CAMERA_BORDER) {
        wall_collision(actor, view.x, view.y, view.h, -1.0, true, ctx);
        wall_collision(actor, view.right(), view.y, view.h, 1.0, true, ctx);
    }
    vertical_collision(actor, view.x, 0.0, view.w, -1.0, false, ctx);
}
