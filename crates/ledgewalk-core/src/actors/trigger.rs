//! Interaction targets.
//!
//! Triggers are static actors the player activates by touching them. Weak
//! targets (coins, hint zones) fire on plain overlap; strong targets (doors,
//! chests, save points) additionally need the player to stand on the ground
//! and ask to interact.

use crate::actors::PlayerActor;
use crate::behavior::{Movable, TickContext};

/// How a trigger is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// Fires on overlap.
    Weak,
    /// Also offers an interaction to a grounded player.
    Strong,
}

/// Result of testing a trigger against the player. Ordered by strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TriggerResponse {
    /// Nothing happened.
    Ignored,
    /// The player touched or used the trigger.
    Touched,
    /// The trigger asks the world to swap the stage's toggle blocks.
    Toggled,
}

/// A static interaction target.
pub trait Trigger: Movable {
    /// Activation rule.
    fn kind(&self) -> TriggerKind {
        TriggerKind::Weak
    }

    /// Runs every tick the trigger is active, before the overlap test.
    fn player_event(&mut self, _player: &mut dyn PlayerActor, _ctx: &mut TickContext<'_>) {}

    /// The player overlaps the trigger.
    fn touch(&mut self, _player: &mut dyn PlayerActor, _ctx: &mut TickContext<'_>) -> TriggerResponse {
        TriggerResponse::Touched
    }

    /// A grounded player overlapping a strong trigger asked to interact.
    fn interact(
        &mut self,
        _player: &mut dyn PlayerActor,
        _ctx: &mut TickContext<'_>,
    ) -> TriggerResponse {
        TriggerResponse::Touched
    }

    /// Another trigger toggled the stage; return to the un-pressed state.
    fn reset_toggle(&mut self) {}

    /// Tests the trigger against the player.
    fn player_collision(
        &mut self,
        player: &mut dyn PlayerActor,
        ctx: &mut TickContext<'_>,
    ) -> TriggerResponse {
        if !self.body().is_active() {
            return TriggerResponse::Ignored;
        }
        self.player_event(player, ctx);
        if !player.body().overlaps(self.body()) {
            return TriggerResponse::Ignored;
        }

        let touched = self.touch(player, ctx);
        if self.kind() == TriggerKind::Strong && player.is_grounded() && player.wants_interaction() {
            return touched.max(self.interact(player, ctx));
        }
        touched
    }
}
