//! Camera-gated activation.
//!
//! An actor is simulated and drawn only while its expanded box
//! (`sprite size + 2 * off_camera_radius`) intersects the viewport. Leaving
//! the viewport fires [`Movable::outside_camera_event`] once per exit; an
//! actor that stays outside gets no further events until it has come back.
//!
//! Actors that must finish an effect off-screen set
//! [`BodyFlags::KEEP_IN_CAMERA`]: the check then leaves them in camera and
//! stays silent until the flag is cleared.

use tracing::trace;

use crate::behavior::Movable;
use crate::camera::Camera;
use crate::entity::BodyFlags;
use crate::geometry::box_overlay;

/// Result of one visibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The actor does not exist; nothing changed.
    Absent,
    /// In camera before and after.
    Visible,
    /// Came into the viewport this check.
    Entered,
    /// Left the viewport this check; the exit event ran.
    Exited,
    /// Out of camera before and after.
    Hidden,
}

impl Visibility {
    /// Whether the actor ended the check in camera.
    #[must_use]
    pub fn in_camera(self) -> bool {
        matches!(self, Self::Visible | Self::Entered)
    }
}

/// Updates `actor`'s in-camera flag against `camera`.
pub fn camera_check<A: Movable + ?Sized>(actor: &mut A, camera: &Camera) -> Visibility {
    let body = actor.body();
    if !body.exists() {
        return Visibility::Absent;
    }

    let was_in = body.in_camera();
    let now_in = body.flags.contains(BodyFlags::KEEP_IN_CAMERA)
        || box_overlay(body.pos, body.center, body.visibility_size(), camera.rect());

    actor.body_mut().flags.set(BodyFlags::IN_CAMERA, now_in);

    match (was_in, now_in) {
        (true, true) => Visibility::Visible,
        (false, true) => Visibility::Entered,
        (false, false) => Visibility::Hidden,
        (true, false) => {
            trace!(tag = %actor.tag(), x = actor.body().pos.x, y = actor.body().pos.y, "left_camera");
            actor.outside_camera_event();
            Visibility::Exited
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::entity::{ActorTag, Body};

    struct Watcher {
        body: Body,
        exits: u32,
        pin_on_exit: bool,
    }

    impl Watcher {
        fn at(x: f32, y: f32) -> Self {
            let mut body = Body::new(Vec2::new(x, y));
            body.off_camera_radius = 4.0;
            Self {
                body,
                exits: 0,
                pin_on_exit: false,
            }
        }
    }

    impl Movable for Watcher {
        fn tag(&self) -> ActorTag {
            ActorTag::Enemy
        }
        fn body(&self) -> &Body {
            &self.body
        }
        fn body_mut(&mut self) -> &mut Body {
            &mut self.body
        }
        fn outside_camera_event(&mut self) {
            self.exits += 1;
            if self.pin_on_exit {
                self.body.flags.insert(BodyFlags::KEEP_IN_CAMERA | BodyFlags::IN_CAMERA);
            }
        }
    }

    fn camera() -> Camera {
        Camera::new(0, 0, Vec2::new(160.0, 144.0))
    }

    #[test]
    fn enters_when_overlapping() {
        let mut w = Watcher::at(80.0, 72.0);
        assert_eq!(camera_check(&mut w, &camera()), Visibility::Entered);
        assert_eq!(camera_check(&mut w, &camera()), Visibility::Visible);
        assert!(w.body.in_camera());
    }

    #[test]
    fn radius_extends_activation() {
        // Sprite spans [168, 184]; with radius 4 the box starts at 164.
        let mut w = Watcher::at(176.0, 72.0);
        assert_eq!(camera_check(&mut w, &camera()), Visibility::Hidden);

        // Box now starts at 158, inside the 160-wide viewport.
        w.body.pos.x = 170.0;
        assert_eq!(camera_check(&mut w, &camera()), Visibility::Entered);
    }

    #[test]
    fn exit_fires_once_per_exit() {
        let mut w = Watcher::at(80.0, 72.0);
        camera_check(&mut w, &camera());

        w.body.pos.x = 400.0;
        assert_eq!(camera_check(&mut w, &camera()), Visibility::Exited);
        for _ in 0..5 {
            assert_eq!(camera_check(&mut w, &camera()), Visibility::Hidden);
        }
        assert_eq!(w.exits, 1);

        w.body.pos.x = 80.0;
        camera_check(&mut w, &camera());
        w.body.pos.x = 400.0;
        camera_check(&mut w, &camera());
        assert_eq!(w.exits, 2);
    }

    #[test]
    fn pinned_actor_stays_in_camera_silently() {
        let mut w = Watcher::at(80.0, 72.0);
        w.pin_on_exit = true;
        camera_check(&mut w, &camera());

        w.body.pos.x = 400.0;
        assert_eq!(camera_check(&mut w, &camera()), Visibility::Exited);
        assert!(w.body.in_camera());
        for _ in 0..3 {
            assert_eq!(camera_check(&mut w, &camera()), Visibility::Visible);
        }
        assert_eq!(w.exits, 1);

        w.body.flags.remove(BodyFlags::KEEP_IN_CAMERA);
        assert_eq!(camera_check(&mut w, &camera()), Visibility::Exited);
        assert_eq!(w.exits, 2);
    }

    #[test]
    fn absent_actor_is_untouched() {
        let mut w = Watcher::at(80.0, 72.0);
        w.body.kill();
        assert_eq!(camera_check(&mut w, &camera()), Visibility::Absent);
        assert!(!w.body.in_camera());
        assert!(!Visibility::Absent.in_camera());
    }
}
