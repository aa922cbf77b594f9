//! Simulation event log.
//!
//! The core records what happened during a tick so audio, effects and UI
//! collaborators can react afterwards without being called from inside the
//! tick. Events never feed back into simulation state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::arena::SlotId;

/// Something observable that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A breakable cell was cleared.
    TileBroken {
        /// Layer of the cell.
        layer: usize,
        /// Tile column.
        x: i32,
        /// Tile row.
        y: i32,
    },
    /// Fence decoration was removed after a break.
    FencesCleared {
        /// Cells cleared.
        count: usize,
    },
    /// A switch swapped the toggle blocks.
    BlocksToggled {
        /// Value of the switch-state flag after the toggle.
        state: bool,
    },
    /// The camera started moving to a neighbouring room.
    TransitionStarted {
        /// Direction in rooms.
        dx: i32,
        /// Direction in rooms.
        dy: i32,
    },
    /// The camera came to rest in a room.
    RoomEntered {
        /// Row-major room index.
        room: u32,
    },
    /// A projectile was placed in its pool.
    ProjectileSpawned {
        /// Pool handle.
        slot: SlotId,
        /// Whether it hurts enemies rather than the player.
        friendly: bool,
    },
    /// A projectile hit an actor.
    ProjectileHit {
        /// Pool handle.
        slot: SlotId,
    },
    /// The player was hurt.
    PlayerHurt {
        /// Where the damage came from.
        source: Vec2,
    },
    /// An enemy entered its death state.
    EnemyKilled {
        /// Index in the enemy collection.
        index: usize,
    },
    /// Cosmetic particles were emitted.
    ParticleBurst {
        /// Burst origin.
        origin: Vec2,
        /// Particles emitted.
        count: u32,
    },
}

/// Append-only event buffer drained once per tick by the embedding game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Drains and returns all recorded events in order.
    pub fn take(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
