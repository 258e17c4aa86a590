use dataug_image::Image;

use super::border::{pixel_with_border, BorderMode};

// keeps the neighbour indices far away from isize overflow
const COORD_LIMIT: f32 = (1 << 30) as f32;

/// Kernel for bilinear interpolation
///
/// The four neighbours around `(u, v)` are fetched through the border policy, so
/// samples partially or fully outside of the image blend in the border values.
/// Non-finite coordinates read the border value directly.
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `border` - The border policy for neighbours outside of the image.
/// * `border_value` - The value used by [`BorderMode::Constant`].
///
/// # Returns
///
/// The interpolated pixel values.
pub(crate) fn bilinear_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    border: BorderMode,
    border_value: &[f32; C],
) -> [f32; C] {
    if !u.is_finite() || !v.is_finite() {
        return *border_value;
    }

    let u = u.clamp(-COORD_LIMIT, COORD_LIMIT);
    let v = v.clamp(-COORD_LIMIT, COORD_LIMIT);

    let u0 = u.floor();
    let v0 = v.floor();

    let frac_u = u - u0;
    let frac_v = v - v0;

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let w00 = frac_uu * frac_vv;
    let w01 = frac_u * frac_vv;
    let w10 = frac_uu * frac_v;
    let w11 = frac_u * frac_v;

    let (iu0, iv0) = (u0 as isize, v0 as isize);

    let p00 = pixel_with_border(image, iu0, iv0, border, border_value);
    let p01 = pixel_with_border(image, iu0 + 1, iv0, border, border_value);
    let p10 = pixel_with_border(image, iu0, iv0 + 1, border, border_value);
    let p11 = pixel_with_border(image, iu0 + 1, iv0 + 1, border, border_value);

    let mut pixel = [0.0; C];
    for k in 0..C {
        pixel[k] = p00[k] * w00 + p01[k] * w01 + p10[k] * w10 + p11[k] * w11;
    }

    pixel
}
