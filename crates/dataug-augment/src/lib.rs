#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Run parameters loaded from JSON.
pub mod config;

/// Error types for the augmentation crate.
pub mod error;

/// Small fixed size matrices for the projective chain.
pub mod linalg;

/// Pixel noise and blur perturbations.
pub mod photometric;

/// Drives the augmentation of a list of annotated images.
pub mod pipeline;

/// Camera pose rotation of an image through a perspective model.
pub mod projective;

/// Rectangle deformation, clipping and cropping.
pub mod rect;

/// Random camera pose rotation of a labeled region.
pub mod rotation;

/// Destinations of the generated samples.
pub mod sink;

/// Generation of a single augmented variant.
pub mod transform;

pub use crate::config::AugmentationConfig;
pub use crate::error::AugmentError;
pub use crate::pipeline::{Augmenter, RunSummary};
