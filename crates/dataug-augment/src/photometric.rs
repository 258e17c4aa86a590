use dataug_image::Image;
use dataug_imgproc::{filter::gaussian_blur, interpolation::BorderMode};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::AugmentError;

/// Add gaussian noise of a random strength to every channel value.
///
/// The noise sigma is drawn uniformly from `[0, noise_max_sigma)`. When it is
/// positive, one normal sample per value is drawn in buffer order and added;
/// the sum is truncated toward zero and saturated to `[0, 255]`.
///
/// # Arguments
///
/// * `image` - The image to perturb in place.
/// * `noise_max_sigma` - The upper bound of the noise sigma.
/// * `rng` - The random generator.
pub fn random_noise<R: Rng + ?Sized, const C: usize>(
    image: &mut Image<u8, C>,
    noise_max_sigma: f64,
    rng: &mut R,
) {
    let sigma = rng.random::<f64>() * noise_max_sigma;
    if sigma <= 0.0 {
        return;
    }
    log::debug!("noise sigma {sigma:.3}");

    for v in image.as_slice_mut() {
        let noise = sigma * rng.sample::<f64, _>(StandardNormal);
        let value = (*v as f64 + noise) as i32;
        *v = value.clamp(0, 255) as u8;
    }
}

/// The odd kernel size used to blur with the given sigma.
///
/// # Examples
///
/// ```
/// use dataug_augment::photometric::blur_kernel_size;
///
/// assert_eq!(blur_kernel_size(1.0), 3);
/// assert_eq!(blur_kernel_size(2.0), 5);
/// ```
pub fn blur_kernel_size(sigma: f64) -> usize {
    let mut k = (sigma * 2.5 + 0.5) as i64;
    k += 1 - k % 2;
    k.max(0) as usize
}

/// Blur an image with a gaussian of random strength.
///
/// The sigma is drawn uniformly from `[0, blur_max_sigma)`. Images are returned
/// untouched when the sigma is zero or the kernel would be smaller than 3.
/// Borders are reflected without repeating the edge pixel.
///
/// # Arguments
///
/// * `image` - The image to blur.
/// * `blur_max_sigma` - The upper bound of the blur sigma.
/// * `rng` - The random generator.
pub fn random_blur<R: Rng + ?Sized, const C: usize>(
    image: Image<u8, C>,
    blur_max_sigma: f64,
    rng: &mut R,
) -> Result<Image<u8, C>, AugmentError> {
    let sigma = rng.random::<f64>() * blur_max_sigma;
    let kernel_size = blur_kernel_size(sigma);
    if sigma <= 0.0 || kernel_size < 3 {
        return Ok(image);
    }
    log::debug!("blur sigma {sigma:.3}, kernel {kernel_size}");

    let mut dst = Image::<u8, C>::from_size_val(image.size(), 0)?;
    gaussian_blur(
        &image,
        &mut dst,
        (kernel_size, kernel_size),
        (sigma as f32, sigma as f32),
        BorderMode::Reflect101,
    )?;

    Ok(dst)
}
