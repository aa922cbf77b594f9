//! Error types for stage loading and configuration.
//!
//! Nothing inside a tick returns an error. Malformed tile content degrades to
//! non-solid cells at load time, so these variants only surface while a
//! [`World`](crate::world::World) is being built.

use thiserror::Error;

/// Errors raised while validating stage data or simulation config.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgewalkError {
    /// The stage has a zero dimension.
    #[error("stage dimensions must be non-zero, got {width}x{height}")]
    EmptyStage {
        /// Width in tiles.
        width: u32,
        /// Height in tiles.
        height: u32,
    },

    /// The stage has no tile layers at all.
    #[error("stage has no tile layers")]
    NoLayers,

    /// A tile layer does not hold `width * height` cells.
    #[error("layer {layer} has {actual} cells, expected {expected}")]
    LayerSize {
        /// Index of the offending layer.
        layer: usize,
        /// Cell count implied by the stage dimensions.
        expected: usize,
        /// Cell count actually supplied.
        actual: usize,
    },

    /// A collision layer index points past the last tile layer.
    #[error("collision layer index {index} out of range ({layers} layers)")]
    CollisionLayer {
        /// The requested layer index.
        index: usize,
        /// Number of tile layers in the stage.
        layers: usize,
    },

    /// The object marker layer does not hold `width * height` cells.
    #[error("object layer has {actual} cells, expected {expected}")]
    ObjectLayerSize {
        /// Cell count implied by the stage dimensions.
        expected: usize,
        /// Cell count actually supplied.
        actual: usize,
    },

    /// The object layer has no player start marker.
    #[error("stage has no player start marker")]
    MissingPlayerStart,

    /// A simulation config value is out of its valid range.
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Convenience alias used by every fallible constructor in the crate.
pub type Result<T> = std::result::Result<T, LedgewalkError>;
