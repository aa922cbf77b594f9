//! Room-based camera with smoothed transitions.
//!
//! The camera's logical position is a room coordinate: room (1, 0) shows the
//! viewport-sized area immediately right of room (0, 0). A transition moves
//! the logical position one room at a time while the render position is
//! interpolated over several ticks. While a transition runs the orchestrator
//! suspends tile collision and carries the player with the camera instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Viewport over the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    room: Vec2,
    target: Vec2,
    render_room: Vec2,
    timer: f32,
    speed: f32,
    moving: bool,
    size: Vec2,
}

impl Camera {
    /// Creates a resting camera showing room (`room_x`, `room_y`).
    #[must_use]
    pub fn new(room_x: i32, room_y: i32, size: Vec2) -> Self {
        let room = room_vec(room_x, room_y);
        Self {
            room,
            target: room,
            render_room: room,
            timer: 0.0,
            speed: 0.0,
            moving: false,
            size,
        }
    }

    /// Starts moving by (`dx`, `dy`) rooms, completing `speed` of the way
    /// per step. Ignored while a transition is already running.
    ///
    /// Returns whether a transition started.
    pub fn start_transition(&mut self, dx: i32, dy: i32, speed: f32) -> bool {
        if self.moving || (dx == 0 && dy == 0) || speed <= 0.0 {
            return false;
        }
        self.target = self.room + room_vec(dx, dy);
        self.timer = 0.0;
        self.speed = speed;
        self.moving = true;
        true
    }

    /// Advances a running transition. Returns `true` on the tick it ends.
    pub fn update(&mut self, step: f32) -> bool {
        if !self.moving {
            return false;
        }
        self.timer += self.speed * step;
        if self.timer >= 1.0 {
            self.timer = 0.0;
            self.room = self.target;
            self.render_room = self.room;
            self.moving = false;
            return true;
        }
        self.render_room = self.room.lerp(self.target, self.timer);
        false
    }

    /// Whether a transition is running.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Direction of the running transition in rooms; zero when resting.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        if self.moving {
            self.target - self.room
        } else {
            Vec2::ZERO
        }
    }

    /// Transition speed; zero when resting.
    #[must_use]
    pub fn speed(&self) -> f32 {
        if self.moving {
            self.speed
        } else {
            0.0
        }
    }

    /// Logical room coordinate.
    #[must_use]
    pub fn room(&self) -> Vec2 {
        self.room
    }

    /// Room the running transition is heading to.
    #[must_use]
    pub fn target_room(&self) -> Vec2 {
        self.target
    }

    /// Viewport size in world units.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Interpolated top-left corner in world units.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.render_room * self.size
    }

    /// Interpolated viewport in world units.
    #[must_use]
    pub fn rect(&self) -> Rect {
        let p = self.position();
        Rect::new(p.x, p.y, self.size.x, self.size.y)
    }

    /// Snaps to the room containing `point`, cancelling any transition.
    pub fn focus_on(&mut self, point: Vec2) {
        let room = (point / self.size).floor();
        self.room = room;
        self.target = room;
        self.render_room = room;
        self.timer = 0.0;
        self.moving = false;
    }

    /// Row-major index of the logical room for a stage `rooms_per_row` wide.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn room_index(&self, rooms_per_row: u32) -> u32 {
        let x = self.room.x.max(0.0) as u32;
        let y = self.room.y.max(0.0) as u32;
        y * rooms_per_row + x
    }
}

#[allow(clippy::cast_precision_loss)]
fn room_vec(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32, y as f32)
}
