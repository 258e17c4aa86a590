use dataug_image::{Image, ImageError};

use super::border::BorderMode;
use super::grid::CoordinateMap;
use super::interpolate::interpolate_pixel;
use super::InterpolationMode;
use crate::parallel;

/// Apply generic geometric transformation to an image.
///
/// Every destination pixel `(x, y)` is sampled from `src` at the coordinates
/// stored in `map` for `(x, y)`.
///
/// # Arguments
///
/// * `src` - The input image container with shape (height, width, C).
/// * `dst` - The output image container with shape (height, width, C).
/// * `map` - The source coordinates of every destination pixel.
/// * `interpolation` - The interpolation mode to use.
/// * `border` - The border policy for samples outside of `src`.
/// * `border_value` - The fill value used by [`BorderMode::Constant`].
///
/// # Errors
///
/// The output image must have the same size as the map.
pub fn remap<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    map: &CoordinateMap,
    interpolation: InterpolationMode,
    border: BorderMode,
    border_value: [f32; C],
) -> Result<(), ImageError> {
    if dst.size() != map.size() {
        return Err(ImageError::InvalidImageSize(
            map.size().width,
            map.size().height,
            dst.width(),
            dst.height(),
        ));
    }

    // parallelize the remap operation by rows
    parallel::par_iter_rows_resample(dst, map, |&x, &y, dst_pixel| {
        let pixel = interpolate_pixel(src, x, y, interpolation, border, &border_value);
        dst_pixel.copy_from_slice(&pixel);
    });

    Ok(())
}
