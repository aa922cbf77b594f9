//! Actor kinds known to the core.
//!
//! The core ships the actors its own semantics need (projectiles, particles
//! and switches) and defines contracts for the ones the embedding game
//! supplies (the player, enemies and other triggers). Game actors are
//! created through an [`ActorFactory`] when a world is built from a stage.

mod enemy;
mod particle;
mod player;
mod projectile;
mod switch;
mod trigger;

use glam::Vec2;

use crate::stage::Marker;

pub use enemy::{enemy_body, enemy_exit_camera, EnemyActor, SpawnPoint, ENEMY_GRAVITY};
pub use particle::{Particle, ParticleSpawn, PARTICLE_MAX_FALL};
pub use player::{player_body, GroundLatch, PlayerActor, PLAYER_GRAVITY};
pub use projectile::{Projectile, ProjectileSpawn, PROJECTILE_GRAVITY};
pub use switch::{Switch, SWITCH_BOUNCE};
pub use trigger::{Trigger, TriggerKind, TriggerResponse};

/// Builds game-defined actors from stage markers.
pub trait ActorFactory {
    /// Creates the player at the start marker's position.
    fn player(&mut self, pos: Vec2) -> Box<dyn PlayerActor>;

    /// Creates an enemy of `variant`. `index` is the enemy's stable position
    /// in the world's enemy list. `None` skips the marker.
    fn enemy(&mut self, variant: u16, pos: Vec2, index: usize) -> Option<Box<dyn EnemyActor>>;

    /// Creates the trigger for an item or interactable marker. Switch
    /// markers never reach the factory.
    fn trigger(&mut self, _marker: &Marker) -> Option<Box<dyn Trigger>> {
        None
    }
}
