//! Swept per-axis boundary tests.
//!
//! Each test checks one boundary of one tile (or of any rectangle) against
//! the body's collision box, using the body's old and new positions:
//!
//! - the body must be moving toward the boundary faster than `epsilon`
//! - its cross-axis extent must overlap the boundary, inset by `cross`
//! - the new leading edge must have reached the boundary, up to `near`
//!   short of it
//! - the old leading edge must not already be more than `far + |speed|`
//!   past it
//!
//! The last two conditions form the tunneling guard: a fast body that
//! started the tick short of the boundary is caught even when a single step
//! overshoots, while a body that was already well past the boundary is never
//! snapped back. Margins are scaled by the step and come from the body.
//!
//! On acceptance the body is snapped so its leading edge lies exactly on the
//! boundary, its speed on that axis is zeroed and the matching event hook
//! runs.

use crate::behavior::{Collidable, TickContext};
use crate::entity::{Body, BodyFlags, CollisionMargins};
use crate::geometry::Rect;
use crate::tiles::SideFlags;

fn collision_ready(body: &Body, force: bool) -> bool {
    body.is_active() && (force || !body.flags.contains(BodyFlags::DISABLE_COLLISIONS))
}

fn crossed(
    old_edge: f32,
    new_edge: f32,
    boundary: f32,
    dir: f32,
    speed: f32,
    margins: &CollisionMargins,
    step: f32,
) -> bool {
    let near = margins.near * step;
    let far = (margins.far + speed.abs()) * step;
    if dir > 0.0 {
        new_edge >= boundary - near && old_edge <= boundary + far
    } else {
        new_edge <= boundary + near && old_edge >= boundary - far
    }
}

/// Tests a horizontal boundary at `y` spanning `[x, x + w)`.
///
/// `dir > 0` is a floor hit from above, `dir < 0` a ceiling hit from below.
/// `force` bypasses [`BodyFlags::DISABLE_COLLISIONS`].
///
/// # Returns
///
/// Whether the body was stopped.
pub fn vertical_collision<A: Collidable + ?Sized>(
    actor: &mut A,
    x: f32,
    y: f32,
    w: f32,
    dir: f32,
    force: bool,
    ctx: &mut TickContext<'_>,
) -> bool {
    let body = actor.body();
    if !collision_ready(body, force) {
        return false;
    }
    let m = body.margins.vertical;
    if body.speed.y * dir < m.epsilon {
        return false;
    }

    let cx = body.pos.x + body.center.x;
    let half_w = body.collision_box.x / 2.0;
    if cx + half_w < x + m.cross || cx - half_w >= x + w - m.cross {
        return false;
    }

    let offset = body.center.y + dir * body.collision_box.y / 2.0;
    let new_edge = body.pos.y + offset;
    let old_edge = body.old_pos.y + offset;
    if !crossed(old_edge, new_edge, y, dir, body.speed.y, &m, ctx.step) {
        return false;
    }

    let body = actor.body_mut();
    body.pos.y = y - offset;
    body.speed.y = 0.0;
    actor.vertical_collision_event(dir, ctx);
    true
}

/// Tests a vertical boundary at `x` spanning `[y, y + h)`.
///
/// `dir > 0` is a wall on the body's right, `dir < 0` on its left.
/// `force` bypasses [`BodyFlags::DISABLE_COLLISIONS`].
///
/// # Returns
///
/// Whether the body was stopped.
pub fn wall_collision<A: Collidable + ?Sized>(
    actor: &mut A,
    x: f32,
    y: f32,
    h: f32,
    dir: f32,
    force: bool,
    ctx: &mut TickContext<'_>,
) -> bool {
    let body = actor.body();
    if !collision_ready(body, force) {
        return false;
    }
    let m = body.margins.horizontal;
    if body.speed.x * dir < m.epsilon {
        return false;
    }

    let top = body.pos.y + body.center.y - body.collision_box.y / 2.0;
    let bottom = top + body.collision_box.y;
    if bottom <= y + m.cross || top >= y + h - m.cross {
        return false;
    }

    let offset = body.center.x + dir * body.collision_box.x / 2.0;
    let new_edge = body.pos.x + offset;
    let old_edge = body.old_pos.x + offset;
    if !crossed(old_edge, new_edge, x, dir, body.speed.x, &m, ctx.step) {
        return false;
    }

    let body = actor.body_mut();
    body.pos.x = x - offset;
    body.speed.x = 0.0;
    actor.wall_collision_event(dir, ctx);
    true
}

/// Applies the boundary tests for each solid side of `area`.
///
/// Every selected side is tested, even after an earlier one hit.
pub fn solid_sides<A: Collidable + ?Sized>(
    actor: &mut A,
    area: Rect,
    sides: SideFlags,
    ctx: &mut TickContext<'_>,
) -> bool {
    let mut hit = false;
    if sides.contains(SideFlags::DOWN) {
        hit |= vertical_collision(actor, area.x, area.y, area.w, 1.0, false, ctx);
    }
    if sides.contains(SideFlags::UP) {
        hit |= vertical_collision(actor, area.x, area.bottom(), area.w, -1.0, false, ctx);
    }
    if sides.contains(SideFlags::LEFT) {
        hit |= wall_collision(actor, area.x, area.y, area.h, 1.0, false, ctx);
    }
    if sides.contains(SideFlags::RIGHT) {
        hit |= wall_collision(actor, area.right(), area.y, area.h, -1.0, false, ctx);
    }
    hit
}

/// Treats `area` as a block solid on all four sides.
pub fn box_collision<A: Collidable + ?Sized>(
    actor: &mut A,
    area: Rect,
    ctx: &mut TickContext<'_>,
) -> bool {
    solid_sides(actor, area, SideFlags::all(), ctx)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::behavior::TickState;
    use crate::tests::helpers::TestActor;

    fn faller(x: f32, y: f32, speed: f32) -> TestActor {
        let mut actor = TestActor::visible(Vec2::new(x, y));
        actor.body.collision_box = Vec2::new(8.0, 10.0);
        actor.body.speed.y = speed;
        actor.body.old_pos = Vec2::new(x, y - speed);
        actor
    }

    mod vertical_tests {
        use super::*;

        #[test]
        fn lands_on_floor_from_worked_example() {
            // Bottom edge reaches 39.9 this tick, moving at 2.0.
            let mut actor = faller(32.0, 34.9, 2.0);
            let mut state = TickState::default();
            let hit = vertical_collision(
                &mut actor,
                16.0,
                40.0,
                32.0,
                1.0,
                false,
                &mut state.context(1.0, 0),
            );
            assert!(hit);
            assert!((actor.body.pos.y + 5.0 - 40.0).abs() < 0.0001);
            assert!(actor.body.speed.y.abs() < f32::EPSILON);
            assert_eq!(actor.vertical_events, vec![1.0]);
        }

        #[test]
        fn ignores_when_moving_away() {
            let mut actor = faller(32.0, 34.9, -2.0);
            let mut state = TickState::default();
            assert!(!vertical_collision(
                &mut actor,
                16.0,
                40.0,
                32.0,
                1.0,
                false,
                &mut state.context(1.0, 0)
            ));
        }

        #[test]
        fn ignores_when_not_over_column() {
            // Box spans x in [28, 36]; column ends at 28 plus the margin.
            let mut actor = faller(32.0, 34.9, 2.0);
            let mut state = TickState::default();
            assert!(!vertical_collision(
                &mut actor,
                0.0,
                40.0,
                28.5,
                1.0,
                false,
                &mut state.context(1.0, 0)
            ));
        }

        #[test]
        fn does_not_snap_body_already_past() {
            // Old bottom edge 10 units below the boundary.
            let mut actor = faller(32.0, 47.0, 2.0);
            let mut state = TickState::default();
            assert!(!vertical_collision(
                &mut actor,
                16.0,
                40.0,
                32.0,
                1.0,
                false,
                &mut state.context(1.0, 0)
            ));
            assert!((actor.body.pos.y - 47.0).abs() < 0.0001);
        }

        #[test]
        fn ceiling_hit_snaps_top_edge() {
            let mut actor = faller(32.0, 36.5, -2.0);
            let mut state = TickState::default();
            let hit = vertical_collision(
                &mut actor,
                16.0,
                32.0,
                32.0,
                -1.0,
                false,
                &mut state.context(1.0, 0),
            );
            assert!(hit);
            assert!((actor.body.pos.y - 5.0 - 32.0).abs() < 0.0001);
            assert_eq!(actor.vertical_events, vec![-1.0]);
        }

        #[test]
        fn center_offset_moves_leading_edge() {
            let mut actor = faller(32.0, 32.9, 2.0);
            actor.body.center = Vec2::new(0.0, 2.0);
            let mut state = TickState::default();
            assert!(vertical_collision(
                &mut actor,
                16.0,
                40.0,
                32.0,
                1.0,
                false,
                &mut state.context(1.0, 0)
            ));
            assert!((actor.body.pos.y - 33.0).abs() < 0.0001);
        }
    }

    mod wall_tests {
        use super::*;

        fn runner(x: f32, speed: f32) -> TestActor {
            let mut actor = TestActor::visible(Vec2::new(x, 40.0));
            actor.body.collision_box = Vec2::new(8.0, 10.0);
            actor.body.speed.x = speed;
            actor.body.old_pos = Vec2::new(x - speed, 40.0);
            actor
        }

        #[test]
        fn stops_at_wall_on_right() {
            let mut actor = runner(45.0, 1.5);
            let mut state = TickState::default();
            assert!(wall_collision(
                &mut actor,
                48.0,
                32.0,
                16.0,
                1.0,
                false,
                &mut state.context(1.0, 0)
            ));
            assert!((actor.body.pos.x - 44.0).abs() < 0.0001);
            assert!(actor.body.speed.x.abs() < f32::EPSILON);
            assert_eq!(actor.wall_events, vec![1.0]);
        }

        #[test]
        fn stops_at_wall_on_left() {
            let mut actor = runner(35.0, -1.5);
            let mut state = TickState::default();
            assert!(wall_collision(
                &mut actor,
                32.0,
                32.0,
                16.0,
                -1.0,
                false,
                &mut state.context(1.0, 0)
            ));
            assert!((actor.body.pos.x - 36.0).abs() < 0.0001);
            assert_eq!(actor.wall_events, vec![-1.0]);
        }

        #[test]
        fn skips_wall_below_feet() {
            // Body spans y in [35, 45]; the wall starts at 44 and the
            // one-unit inset leaves no overlap.
            let mut actor = runner(45.0, 1.5);
            let mut state = TickState::default();
            assert!(!wall_collision(
                &mut actor,
                48.0,
                44.0,
                16.0,
                1.0,
                false,
                &mut state.context(1.0, 0)
            ));
        }

        #[test]
        fn disabled_collisions_need_force() {
            let mut actor = runner(45.0, 1.5);
            actor.body.flags.insert(BodyFlags::DISABLE_COLLISIONS);
            let mut state = TickState::default();
            assert!(!wall_collision(
                &mut actor,
                48.0,
                32.0,
                16.0,
                1.0,
                false,
                &mut state.context(1.0, 0)
            ));
            assert!(wall_collision(
                &mut actor,
                48.0,
                32.0,
                16.0,
                1.0,
                true,
                &mut state.context(1.0, 0)
            ));
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn dying_body_is_never_resolved() {
            let mut actor = faller(32.0, 34.9, 2.0);
            actor.body.start_dying();
            let before = actor.body.clone();
            let mut state = TickState::default();
            let mut ctx = state.context(1.0, 0);
            assert!(!vertical_collision(&mut actor, 16.0, 40.0, 32.0, 1.0, true, &mut ctx));
            assert!(!box_collision(&mut actor, Rect::new(16.0, 40.0, 32.0, 16.0), &mut ctx));
            assert_eq!(actor.body, before);
            assert!(actor.vertical_events.is_empty());
        }

        #[test]
        fn out_of_camera_body_is_never_resolved() {
            let mut actor = faller(32.0, 34.9, 2.0);
            actor.body.flags.remove(BodyFlags::IN_CAMERA);
            let mut state = TickState::default();
            assert!(!vertical_collision(
                &mut actor,
                16.0,
                40.0,
                32.0,
                1.0,
                false,
                &mut state.context(1.0, 0)
            ));
        }
    }

    #[test]
    fn sides_filter_which_edges_block() {
        let mut actor = faller(32.0, 34.9, 2.0);
        let mut state = TickState::default();
        let tile = Rect::new(16.0, 40.0, 32.0, 16.0);
        assert!(!solid_sides(&mut actor, tile, SideFlags::UP, &mut state.context(1.0, 0)));
        assert!(solid_sides(&mut actor, tile, SideFlags::DOWN, &mut state.context(1.0, 0)));
    }

    proptest! {
        #[test]
        fn fast_faller_never_tunnels(speed in 0.5f32..8.0, gap in 0.0f32..10.0) {
            let boundary = 64.0;
            // Old bottom edge `gap` above the boundary, moving down at `speed`.
            let old_y = boundary - gap - 5.0;
            let mut actor = faller(32.0, old_y + speed, speed);
            actor.body.old_pos.y = old_y;

            let mut state = TickState::default();
            let hit = vertical_collision(
                &mut actor, 16.0, boundary, 32.0, 1.0, false, &mut state.context(1.0, 0),
            );

            let reach = speed + actor.body.margins.vertical.near;
            if gap < reach - 0.001 {
                prop_assert!(hit);
                prop_assert!((actor.body.pos.y + 5.0 - boundary).abs() < 0.001);
            } else if gap > reach + 0.001 {
                prop_assert!(!hit);
            }
        }
    }
}
