//! Error types for the engine

use thiserror::Error;

use crate::simulation::UnknownMaterial;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },

    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error(transparent)]
    UnknownMaterial(#[from] UnknownMaterial),

    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to parse RON configuration: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

pub type SimResult<T> = Result<T, SimError>;
