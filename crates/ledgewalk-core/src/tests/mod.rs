//! Cross-module tests.
//!
//! - `determinism.rs`: same seed and stage give the same world state
//! - `integration.rs`: whole-world scenarios through [`World::step`]
//! - `helpers.rs`: recording actors, a factory and a stage builder, also
//!   used by the unit tests of individual modules
//!
//! [`World::step`]: crate::world::World::step

mod determinism;
pub mod helpers;
