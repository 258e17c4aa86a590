#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Annotation files in the `createsamples` text format.
///
/// Read the labeled rectangles of a set of images, append the labels of
/// generated samples, and resolve the input of an augmentation run.
pub mod annotation;

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access, encoding and decoding failures,
/// and malformed annotation files.
pub mod error;

/// High-level image reading and writing functions.
///
/// See [`functional::read_image_any`] for automatic format detection.
pub mod functional;

/// PNG image encoding.
pub mod png;
