//! Floor switch that swaps the stage's toggle blocks.

use glam::Vec2;

use crate::actors::{PlayerActor, Trigger, TriggerResponse};
use crate::behavior::{Movable, TickContext};
use crate::entity::{ActorTag, Body};
use crate::sprite::Sprite;
use crate::stage::Marker;
use crate::tiles::TILE_SIZE;

/// Upward speed given to the player when it presses a switch.
pub const SWITCH_BOUNCE: f32 = -3.0;

/// The player must be falling faster than this to press a switch.
const PRESS_SPEED: f32 = 0.1;

/// A switch. Pressed by landing on it; un-pressed when another switch fires.
#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    body: Body,
    down: bool,
}

impl Switch {
    /// Creates a switch whose base sits at `pos`.
    #[must_use]
    pub fn new(pos: Vec2) -> Self {
        let mut body = Body::new(pos);
        body.center = Vec2::new(0.0, -6.0);
        body.hitbox = Vec2::new(8.0, 4.0);
        body.collision_box = body.hitbox;
        body.sprite = Sprite::new(16.0, 16.0);
        Self { body, down: false }
    }

    /// Creates a switch standing on the bottom edge of a marker's tile.
    #[must_use]
    pub fn from_marker(marker: &Marker) -> Self {
        Self::new(marker.spawn_pos() + Vec2::new(0.0, TILE_SIZE / 2.0))
    }

    /// Whether the switch is pressed.
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.down
    }
}

impl Movable for Switch {
    fn tag(&self) -> ActorTag {
        ActorTag::Trigger
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn integrates(&self) -> bool {
        false
    }
}

impl Trigger for Switch {
    fn reset_toggle(&mut self) {
        self.down = false;
        self.body.sprite.set_frame(0, 0);
    }

    fn player_collision(
        &mut self,
        player: &mut dyn PlayerActor,
        _ctx: &mut TickContext<'_>,
    ) -> TriggerResponse {
        if self.down || !self.body.is_active() {
            return TriggerResponse::Ignored;
        }
        if player.body().speed.y <= PRESS_SPEED || !player.body().overlaps(&self.body) {
            return TriggerResponse::Ignored;
        }
        self.down = true;
        self.body.sprite.set_frame(1, 0);
        player.bounce(SWITCH_BOUNCE);
        TriggerResponse::Toggled
    }
}
