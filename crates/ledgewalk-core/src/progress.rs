//! Typed game-progress store.
//!
//! Replaces a free-form property bag with enumerated keys. Each key kind has
//! its own map, so a flag can never be read back as a number.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Boolean progress keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Flag {
    /// Wind zones push bodies.
    WindEnabled,
    /// Toggle blocks are in their swapped state.
    SwitchState,
}

/// Numeric progress keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Counter {
    /// Enemies killed.
    Kills,
    /// Coins collected.
    Coins,
    /// Id of the last activated checkpoint.
    Checkpoint,
}

/// Set-valued progress keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SetKey {
    /// Collected item ids.
    Items,
    /// Row-major indices of rooms the camera has rested in.
    RoomsVisited,
    /// Indices of enemies defeated at least once.
    EnemiesDefeated,
}

/// Progress values keyed by [`Flag`], [`Counter`] and [`SetKey`].
///
/// # Example
///
/// ```
/// use ledgewalk_core::progress::{Counter, Flag, Progress, SetKey};
///
/// let mut progress = Progress::new();
/// progress.set_flag(Flag::WindEnabled, true);
/// progress.add(Counter::Kills, 2);
/// progress.insert(SetKey::Items, 11);
///
/// assert!(progress.flag(Flag::WindEnabled));
/// assert_eq!(progress.counter(Counter::Kills), 2);
/// assert!(progress.contains(SetKey::Items, 11));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    flags: BTreeMap<Flag, bool>,
    counters: BTreeMap<Counter, i64>,
    sets: BTreeMap<SetKey, BTreeSet<u32>>,
}

impl Progress {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a flag; unset flags are `false`.
    #[must_use]
    pub fn flag(&self, key: Flag) -> bool {
        self.flags.get(&key).copied().unwrap_or(false)
    }

    /// Writes a flag.
    pub fn set_flag(&mut self, key: Flag, value: bool) {
        self.flags.insert(key, value);
    }

    /// Inverts a flag and returns the new value.
    pub fn toggle_flag(&mut self, key: Flag) -> bool {
        let value = !self.flag(key);
        self.set_flag(key, value);
        value
    }

    /// Reads a counter; unset counters are 0.
    #[must_use]
    pub fn counter(&self, key: Counter) -> i64 {
        self.counters.get(&key).copied().unwrap_or(0)
    }

    /// Writes a counter.
    pub fn set_counter(&mut self, key: Counter, value: i64) {
        self.counters.insert(key, value);
    }

    /// Adds to a counter and returns the new value.
    pub fn add(&mut self, key: Counter, delta: i64) -> i64 {
        let value = self.counters.entry(key).or_insert(0);
        *value += delta;
        *value
    }

    /// Inserts into a set. Returns `false` if the value was already present.
    pub fn insert(&mut self, key: SetKey, value: u32) -> bool {
        self.sets.entry(key).or_default().insert(value)
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, key: SetKey, value: u32) -> bool {
        self.sets.get(&key).is_some_and(|s| s.contains(&value))
    }

    /// Number of values in a set.
    #[must_use]
    pub fn count(&self, key: SetKey) -> usize {
        self.sets.get(&key).map_or(0, BTreeSet::len)
    }
}
