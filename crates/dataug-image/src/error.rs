/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images or maps are expected to share a size.
    #[error("Invalid image size ({0}, {1}) does not match ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a region does not fit inside the image.
    #[error("Region ({0}, {1}, {2}, {3}) is outside of image with size ({4}, {5})")]
    RegionOutOfBounds(usize, usize, usize, usize, usize, usize),

    /// Error when a filter kernel is empty.
    #[error("Invalid kernel length ({0}, {1})")]
    InvalidKernelLength(usize, usize),
}
