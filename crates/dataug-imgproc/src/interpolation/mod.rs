//! Pixel interpolation methods for image transformations.
//!
//! This module provides the interpolation algorithms used when resampling
//! images during geometric transformations, and the border policies deciding
//! the value of samples that fall outside of the source image.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value (no interpolation)
//! - **Bilinear**: Smooth linear interpolation between adjacent pixels

mod bilinear;

/// Border policies for out-of-bounds samples.
pub mod border;

/// Coordinate maps consumed by [`remap`].
pub mod grid;

pub(crate) mod interpolate;
mod nearest;
mod remap;

pub use border::BorderMode;
pub use grid::CoordinateMap;
pub use interpolate::{interpolate_pixel, InterpolationMode};
pub use remap::remap;
