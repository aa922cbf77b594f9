//! Slot arena for pooled actors.
//!
//! Projectiles and particles live in contiguous slot storage. A spawn reuses
//! the first slot whose occupant no longer exists and only grows the storage
//! when every slot is live, so a steady stream of short-lived actors stops
//! allocating once the pool has reached its working size.
//!
//! Handles are generation-tagged: reusing a slot bumps its generation, so a
//! [`SlotId`] held across the death of its actor resolves to `None` instead
//! of silently pointing at the replacement.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use ledgewalk_core::actors::{Particle, ParticleSpawn};
//! use ledgewalk_core::arena::SlotArena;
//! use ledgewalk_core::behavior::Movable;
//!
//! let mut pool: SlotArena<Particle> = SlotArena::new();
//! let first = pool.spawn(|p| p.spawn(&ParticleSpawn::at(Vec2::ZERO)));
//! pool.get_mut(first).unwrap().body_mut().kill();
//!
//! let second = pool.spawn(|p| p.spawn(&ParticleSpawn::at(Vec2::ONE)));
//! assert_eq!(pool.capacity(), 1);
//! assert!(pool.get(first).is_none());
//! assert!(pool.get(second).is_some());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// Slot Handle
// =============================================================================

/// Generation-tagged handle to a pooled actor.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId {
    index: u32,
    generation: u32,
}

impl SlotId {
    /// Slot index within the arena.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Number of times the slot had been filled before this handle.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// Poolable
// =============================================================================

/// An actor that can occupy an arena slot.
pub trait Poolable: Default {
    /// Whether the slot is occupied. Dead slots are reused by the next spawn.
    fn is_live(&self) -> bool;
}

// =============================================================================
// Arena
// =============================================================================

/// Contiguous pool of reusable actor slots.
#[derive(Debug, Clone, Default)]
pub struct SlotArena<T> {
    slots: Vec<T>,
    generations: Vec<u32>,
}

impl<T: Poolable> SlotArena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
        }
    }

    /// Fills the first dead slot, or appends one, and runs `init` on it.
    ///
    /// `init` receives the slot's previous occupant (or a default value for
    /// a new slot) and must leave it live.
    ///
    /// # Returns
    ///
    /// A handle valid until the slot is reused.
    #[allow(clippy::cast_possible_truncation)]
    pub fn spawn(&mut self, init: impl FnOnce(&mut T)) -> SlotId {
        let index = match self.slots.iter().position(|slot| !slot.is_live()) {
            Some(index) => {
                self.generations[index] = self.generations[index].wrapping_add(1);
                index
            }
            None => {
                self.slots.push(T::default());
                self.generations.push(0);
                debug!(capacity = self.slots.len(), "pool_grew");
                self.slots.len() - 1
            }
        };
        init(&mut self.slots[index]);
        SlotId {
            index: index as u32,
            generation: self.generations[index],
        }
    }

    /// Looks up a live slot by handle.
    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        let index = id.index as usize;
        if self.generations.get(index) != Some(&id.generation) {
            return None;
        }
        self.slots.get(index).filter(|slot| slot.is_live())
    }

    /// Looks up a live slot by handle, mutably.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        let index = id.index as usize;
        if self.generations.get(index) != Some(&id.generation) {
            return None;
        }
        self.slots.get_mut(index).filter(|slot| slot.is_live())
    }

    /// Iterates every slot, live or not, in index order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    /// Iterates every slot mutably, live or not, in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut()
    }

    /// Iterates live slots with their current handles.
    #[allow(clippy::cast_possible_truncation)]
    pub fn live(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .zip(&self.generations)
            .enumerate()
            .filter(|(_, (slot, _))| slot.is_live())
            .map(|(index, (slot, &generation))| {
                (
                    SlotId {
                        index: index as u32,
                        generation,
                    },
                    slot,
                )
            })
    }

    /// Iterates live slots mutably with their current handles.
    #[allow(clippy::cast_possible_truncation)]
    pub fn live_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        self.slots
            .iter_mut()
            .zip(&self.generations)
            .enumerate()
            .filter(|(_, (slot, _))| slot.is_live())
            .map(|(index, (slot, &generation))| {
                (
                    SlotId {
                        index: index as u32,
                        generation,
                    },
                    slot,
                )
            })
    }

    /// Kills every slot through `kill` without releasing storage.
    pub fn clear_with(&mut self, mut kill: impl FnMut(&mut T)) {
        for slot in self.slots.iter_mut().filter(|slot| slot.is_live()) {
            kill(slot);
        }
    }

    /// Number of live slots.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_live()).count()
    }

    /// Number of slots ever allocated.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }
}
