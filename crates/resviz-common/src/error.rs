//! Error types for reservoir visualization.

use thiserror::Error;

/// Result type alias using ResvizError.
pub type ResvizResult<T> = Result<T, ResvizError>;

/// Primary error type for visualization operations.
#[derive(Debug, Error)]
pub enum ResvizError {
    // === Data shape errors ===
    #[error("{what} has length {actual}, expected {expected}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("cannot lay out zero panels")]
    EmptyLayout,

    #[error("point ({x}, {y}) lies outside the grid")]
    PointOutsideGrid { x: f64, y: f64 },

    // === Figure errors ===
    #[error("artist not found: {0}")]
    ArtistNotFound(String),

    #[error("axes index {index} out of range for figure with {len} axes")]
    AxesOutOfRange { index: usize, len: usize },

    #[error("frame {frame} out of range for series with {len} steps")]
    FrameOutOfRange { frame: usize, len: usize },

    // === Configuration and output ===
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ResvizError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an Encode error.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// True for the one failure the animator tolerates on redraw.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ArtistNotFound(_))
    }
}
