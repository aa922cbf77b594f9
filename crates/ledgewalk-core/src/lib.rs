//! # Ledgewalk Core
//!
//! Tile collision and kinematics core for a 2D side-scrolling platformer.
//!
//! The crate moves every dynamic actor once per fixed tick, resolves its
//! contact with a layered tile grid and tells actor logic what it hit.
//! Game-specific behavior (input, animation, damage rules) stays outside;
//! the core decides *when* hooks run and *with what geometry*.
//!
//! ## Architecture
//!
//! - **Stage**: the tile grid and its collision lookup ([`stage`], [`tiles`])
//! - **Bodies**: kinematic state shared by all actors ([`entity`])
//! - **Behavior**: capability traits and the per-tick context ([`behavior`])
//! - **Resolver**: swept tile collision and zone effects ([`resolver`])
//! - **Camera**: room viewport, transitions and activation ([`camera`],
//!   [`visibility`])
//! - **World**: actor collections and the fixed tick order ([`world`])
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledgewalk_core::{SimConfig, Stage, World};
//!
//! let stage = Stage::from_desc(serde_json::from_str(&stage_json)?)?;
//! let mut world = World::new(stage, SimConfig::default(), &mut my_factory)?;
//! loop {
//!     world.step();
//!     for event in world.take_events() {
//!         // play sounds, shake the screen, ...
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod actors;
pub mod arena;
pub mod behavior;
pub mod camera;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod geometry;
pub mod progress;
pub mod resolver;
pub mod sprite;
pub mod stage;
pub mod tiles;
pub mod visibility;
pub mod world;

pub use arena::{SlotArena, SlotId};
pub use behavior::{Collidable, Damageable, DrawInfo, Drawable, Movable, TickContext};
pub use camera::Camera;
pub use config::SimConfig;
pub use entity::{ActorTag, Body, BodyFlags};
pub use error::{LedgewalkError, Result};
pub use events::SimEvent;
pub use geometry::Rect;
pub use progress::Progress;
pub use resolver::TileResolver;
pub use stage::{Stage, StageDesc};
pub use world::World;

#[cfg(test)]
mod tests;
