use dataug_image::Image;

use super::border::{pixel_with_border, BorderMode};

/// Kernel for nearest neighbor interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `border` - The border policy for samples outside of the image.
/// * `border_value` - The value used by [`BorderMode::Constant`].
///
/// # Returns
///
/// The interpolated pixel values.
pub(crate) fn nearest_neighbor_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    border: BorderMode,
    border_value: &[f32; C],
) -> [f32; C] {
    if !u.is_finite() || !v.is_finite() {
        return *border_value;
    }

    let limit = (1 << 30) as f32;
    let iu = u.round().clamp(-limit, limit) as isize;
    let iv = v.round().clamp(-limit, limit) as isize;

    pixel_with_border(image, iu, iv, border, border_value)
}
