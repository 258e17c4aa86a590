use dataug_image::{Image, Rect};
use rand::Rng;

use crate::{
    config::AugmentationConfig,
    error::AugmentError,
    photometric::{random_blur, random_noise},
    projective::WarpParams,
    rect::{random_deform_rect, truncate_rect},
    rotation::random_rotate_image,
};

/// Generate one randomized variant of a labeled region.
///
/// The region is deformed, clipped to the image, rotated by a random camera
/// pose, then perturbed with noise and finally blurred. A region with a
/// non-positive size selects the whole image, which is not deformed.
///
/// # Arguments
///
/// * `img` - The source image.
/// * `area` - The labeled region.
/// * `config` - The perturbation strengths.
/// * `params` - The warp parameters.
/// * `rng` - The random generator.
///
/// # Errors
///
/// [`AugmentError::DegenerateRegion`] when the region leaves the image, and
/// [`AugmentError::SingularProjection`] from the warp.
pub fn transform_image<R: Rng + ?Sized, const C: usize>(
    img: &Image<u8, C>,
    area: Rect,
    config: &AugmentationConfig,
    params: &WarpParams,
    rng: &mut R,
) -> Result<Image<u8, C>, AugmentError> {
    let rect = if area.is_empty() {
        Rect::from_size(img.size())
    } else {
        random_deform_rect(
            area,
            config.x_slide_sigma,
            config.y_slide_sigma,
            config.aspect_ratio_sigma,
            rng,
        )
    };

    let rect = truncate_rect(rect, img.size());
    if rect.is_empty() {
        return Err(AugmentError::DegenerateRegion(rect));
    }

    let mut dst = random_rotate_image(
        img,
        config.yaw_sigma,
        config.pitch_sigma,
        config.roll_sigma,
        rect,
        rng,
        params,
    )?;

    random_noise(&mut dst, config.noise_max_sigma, rng);

    random_blur(dst, config.blur_max_sigma, rng)
}
