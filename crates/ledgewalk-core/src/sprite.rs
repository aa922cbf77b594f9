//! Sprite-frame state exposed to rendering.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Frame selection and animation timer for one actor.
///
/// The core only tracks which cell of a sprite sheet is current; the
/// renderer owns the bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    width: f32,
    height: f32,
    column: i32,
    row: i32,
    timer: f32,
}

impl Sprite {
    /// Creates a sprite of the given frame size showing frame (0, 0).
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            column: 0,
            row: 0,
            timer: 0.0,
        }
    }

    /// Frame size in world units.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Current column.
    #[must_use]
    pub fn column(&self) -> i32 {
        self.column
    }

    /// Current row.
    #[must_use]
    pub fn row(&self) -> i32 {
        self.row
    }

    /// Jumps to a frame and restarts the timer.
    pub fn set_frame(&mut self, column: i32, row: i32) {
        self.column = column;
        self.row = row;
        self.timer = 0.0;
    }

    /// Advances a looping animation over columns `start..=end` of `row`.
    ///
    /// Switching rows restarts at `start`. The column advances once every
    /// `speed` steps and wraps back to `start` after passing `end`.
    pub fn animate(&mut self, row: i32, start: i32, end: i32, speed: f32, step: f32) {
        if row != self.row {
            self.row = row;
            self.column = start;
            self.timer = 0.0;
        }
        if start == end || speed <= 0.0 {
            self.column = start;
            self.timer = 0.0;
            return;
        }
        if self.column < start || self.column > end {
            self.column = start;
        }

        self.timer += step;
        while self.timer >= speed {
            self.timer -= speed;
            self.column += 1;
            if self.column > end {
                self.column = start;
            }
        }
    }
}
