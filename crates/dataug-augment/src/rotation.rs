use dataug_image::{Image, Rect};
use rand::Rng;

use crate::{
    error::AugmentError,
    projective::{rotate_image, Pose, WarpParams},
    rect::{crop_rect, expand_rect_for_rotate, truncate_rect_keep_center},
};

/// Rotate a region of an image by a random camera pose.
///
/// The region is grown to a square that contains any in-plane rotation of it,
/// so the rotated view is filled with image content where possible. After the
/// warp the central `area.width x area.height` window is cut out.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `yaw_sigma`, `pitch_sigma`, `roll_sigma` - Standard deviations of the
///   sampled angles, in degrees.
/// * `area` - The region to rotate. A non-positive size selects the whole image.
/// * `rng` - The random generator.
/// * `params` - The camera distance and the resampling policy.
///
/// # Errors
///
/// [`AugmentError::DegenerateRegion`] when a clipped region becomes empty, and
/// [`AugmentError::SingularProjection`] from the warp.
pub fn random_rotate_image<R: Rng + ?Sized, const C: usize>(
    src: &Image<u8, C>,
    yaw_sigma: f64,
    pitch_sigma: f64,
    roll_sigma: f64,
    area: Rect,
    rng: &mut R,
    params: &WarpParams,
) -> Result<Image<u8, C>, AugmentError> {
    let pose = Pose::sample(yaw_sigma, pitch_sigma, roll_sigma, rng);
    log::debug!(
        "pose: yaw {:.3}, pitch {:.3}, roll {:.3}",
        pose.yaw,
        pose.pitch,
        pose.roll
    );

    let area = if area.is_empty() {
        Rect::from_size(src.size())
    } else {
        area
    };

    let expanded = truncate_rect_keep_center(expand_rect_for_rotate(area), src.size());
    let work = crop_rect(src, expanded)?;

    let rotated = rotate_image(&work, &pose, params)?;

    let (rw, rh) = (rotated.width() as i32, rotated.height() as i32);
    let dst_area = truncate_rect_keep_center(
        Rect::new(
            (rw - area.width) / 2,
            (rh - area.height) / 2,
            area.width,
            area.height,
        ),
        rotated.size(),
    );

    crop_rect(&rotated, dst_area)
}

#[cfg(test)]
mod tests {
    use dataug_image::{Image, ImageSize, Rect};
    use rand::{rngs::StdRng, SeedableRng};

    use super::random_rotate_image;
    use crate::{error::AugmentError, projective::WarpParams, rect::crop_rect};

    fn gradient(size: ImageSize) -> Result<Image<u8, 1>, AugmentError> {
        let data = (0..size.width * size.height)
            .map(|i| ((i % size.width) * 2 + i / size.width) as u8)
            .collect();
        Ok(Image::new(size, data)?)
    }

    #[test]
    fn zero_pose_reproduces_area() -> Result<(), AugmentError> {
        let image = gradient([100, 100].into())?;
        let area = Rect::new(10, 10, 40, 40);
        let mut rng = StdRng::seed_from_u64(0);

        let out = random_rotate_image(&image, 0.0, 0.0, 0.0, area, &mut rng, &WarpParams::default())?;
        assert_eq!(out, crop_rect(&image, area)?);
        Ok(())
    }

    #[test]
    fn zero_pose_region_at_border() -> Result<(), AugmentError> {
        // the expanded square is clipped by the image border
        let image = gradient([60, 50].into())?;
        let area = Rect::new(0, 5, 30, 20);
        let mut rng = StdRng::seed_from_u64(0);

        let out = random_rotate_image(&image, 0.0, 0.0, 0.0, area, &mut rng, &WarpParams::default())?;
        assert_eq!(out, crop_rect(&image, area)?);
        Ok(())
    }

    #[test]
    fn empty_area_uses_whole_image() -> Result<(), AugmentError> {
        let image = gradient([32, 24].into())?;
        let mut rng = StdRng::seed_from_u64(0);

        let out = random_rotate_image(
            &image,
            0.0,
            0.0,
            0.0,
            Rect::new(3, 3, 0, 0),
            &mut rng,
            &WarpParams::default(),
        )?;
        assert_eq!(out, image);
        Ok(())
    }

    #[test]
    fn zero_pose_whole_image_uneven_clip() -> Result<(), AugmentError> {
        // the rotation square overflows these images by an odd amount
        for size in [[64usize, 48], [100, 100]] {
            let image = gradient(size.into())?;
            let mut rng = StdRng::seed_from_u64(0);

            let full = Rect::from_size(image.size());
            let out =
                random_rotate_image(&image, 0.0, 0.0, 0.0, full, &mut rng, &WarpParams::default())?;
            assert_eq!(out, image);

            let out = random_rotate_image(
                &image,
                0.0,
                0.0,
                0.0,
                Rect::default(),
                &mut rng,
                &WarpParams::default(),
            )?;
            assert_eq!(out, image);
        }
        Ok(())
    }

    #[test]
    fn random_pose_keeps_area_size() -> Result<(), AugmentError> {
        let image = gradient([120, 90].into())?;
        let area = Rect::new(30, 20, 50, 40);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..10 {
            let out =
                random_rotate_image(&image, 5.0, 5.0, 5.0, area, &mut rng, &WarpParams::default())?;
            assert_eq!(out.size(), [50, 40].into());
        }
        Ok(())
    }

    #[test]
    fn region_outside_is_degenerate() -> Result<(), AugmentError> {
        let image = gradient([20, 20].into())?;
        let mut rng = StdRng::seed_from_u64(0);

        let res = random_rotate_image(
            &image,
            0.0,
            0.0,
            0.0,
            Rect::new(40, 40, 10, 10),
            &mut rng,
            &WarpParams::default(),
        );
        assert!(matches!(res, Err(AugmentError::DegenerateRegion(_))));
        Ok(())
    }
}
