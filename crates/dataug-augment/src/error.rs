use dataug_image::{ImageError, Rect};
use dataug_io::error::IoError;

use crate::linalg::LinalgError;

/// An error type for the augmentation module.
#[derive(thiserror::Error, Debug)]
pub enum AugmentError {
    /// A region became empty after deformation or truncation.
    #[error("Degenerate region {0}")]
    DegenerateRegion(Rect),

    /// A projection hit a zero depth or a singular matrix.
    #[error("Singular projection")]
    SingularProjection,

    /// A warp would produce a canvas far larger than its source.
    #[error("Warped canvas {0:.0}x{1:.0} is too large")]
    OversizedWarp(f64, f64),

    /// The configuration holds out of range values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be parsed.
    #[error("Failed to parse the configuration. {0}")]
    ConfigParseError(#[from] serde_json::Error),

    /// Error from an image operation.
    #[error(transparent)]
    ImageError(#[from] ImageError),

    /// Error reading or writing files.
    #[error(transparent)]
    IoError(#[from] IoError),
}

impl From<LinalgError> for AugmentError {
    fn from(_: LinalgError) -> Self {
        AugmentError::SingularProjection
    }
}
