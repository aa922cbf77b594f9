//! Simulation configuration.
//!
//! Every field has a default tuned for a 160x144 viewport over 16-unit tiles.
//! Configs are plain serde values so an embedding game can ship them as JSON
//! next to its stage data; missing fields fall back to the defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{LedgewalkError, Result};

/// Default logical step per tick.
pub const DEFAULT_STEP: f32 = 1.0;

/// Default viewport size in world units.
pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(160.0, 144.0);

/// Tuning for wind zones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Height of a zone in tiles, counted upward from and including the anchor.
    pub height_tiles: u32,
    /// Vertical speed change per step while inside a zone.
    pub acceleration: f32,
    /// Vertical speed the push converges to and never passes.
    pub target_speed: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            height_tiles: 4,
            acceleration: 0.25,
            target_speed: -2.0,
        }
    }
}

/// Tuning for the stage water body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// Thickness of the surface band in world units.
    pub surface_band: f32,
    /// Upward speed change per step while submerged.
    pub buoyancy: f32,
    /// Cap on downward speed while submerged.
    pub max_sink_speed: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            surface_band: 4.0,
            buoyancy: 0.1,
            max_sink_speed: 0.5,
        }
    }
}

/// Tuning for room-to-room camera transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Fraction of the transition completed per step.
    pub speed: f32,
    /// Distance from a viewport edge at which the player pushes the camera.
    pub edge_margin: f32,
    /// Total distance the player is carried during one transition.
    pub player_shift: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            speed: 1.0 / 20.0,
            edge_margin: 4.0,
            player_shift: 12.0,
        }
    }
}

/// Top-level simulation configuration.
///
/// # Example
///
/// ```
/// use ledgewalk_core::config::SimConfig;
///
/// let config: SimConfig = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.scan_radius, 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Logical step applied to every tick.
    pub step: f32,
    /// Seed for cosmetic randomness.
    pub seed: u64,
    /// Tiles scanned around an entity in every direction.
    pub scan_radius: u32,
    /// Camera viewport size in world units.
    pub viewport: Vec2,
    /// Room transition tuning.
    pub transition: TransitionConfig,
    /// Wind zone tuning.
    pub wind: WindConfig,
    /// Water tuning.
    pub water: WaterConfig,
    /// Particles emitted when a breakable tile is destroyed.
    pub burst_particles: u32,
    /// Remove fence decoration inside the viewport when a tile breaks.
    pub clear_fences_on_break: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            seed: 0,
            scan_radius: 2,
            viewport: DEFAULT_VIEWPORT,
            transition: TransitionConfig::default(),
            wind: WindConfig::default(),
            water: WaterConfig::default(),
            burst_particles: 6,
            clear_fences_on_break: true,
        }
    }
}

impl SimConfig {
    /// Checks value ranges the tick relies on.
    ///
    /// # Errors
    ///
    /// Returns [`LedgewalkError::InvalidConfig`] for a non-positive step,
    /// a zero scan radius, a degenerate viewport or a non-positive
    /// transition speed.
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.step) {
            return Err(invalid("step", format!("must be positive, got {}", self.step)));
        }
        if self.scan_radius == 0 {
            return Err(invalid("scan_radius", "must be at least 1".into()));
        }
        if !is_positive(self.viewport.x) || !is_positive(self.viewport.y) {
            return Err(invalid(
                "viewport",
                format!("must be positive, got {}x{}", self.viewport.x, self.viewport.y),
            ));
        }
        if !is_positive(self.transition.speed) {
            return Err(invalid(
                "transition.speed",
                format!("must be positive, got {}", self.transition.speed),
            ));
        }
        Ok(())
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(field: &'static str, reason: String) -> LedgewalkError {
    LedgewalkError::InvalidConfig { field, reason }
}
