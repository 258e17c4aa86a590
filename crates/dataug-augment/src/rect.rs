//! Rectangle arithmetic on labeled regions.

use dataug_image::{Image, ImageSize, Rect};
use dataug_imgproc::crop::crop_image;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::AugmentError;

/// Clip a rectangle to the bounds `[0, width) x [0, height)`.
///
/// Each protruding edge is moved inside, shrinking the rectangle. A rectangle
/// lying fully outside of the bounds comes out empty.
///
/// # Examples
///
/// ```
/// use dataug_image::{ImageSize, Rect};
/// use dataug_augment::rect::truncate_rect;
///
/// let bounds = ImageSize { width: 100, height: 100 };
/// assert_eq!(truncate_rect(Rect::new(-5, 90, 20, 20), bounds), Rect::new(0, 90, 15, 10));
/// ```
pub fn truncate_rect(rect: Rect, bounds: ImageSize) -> Rect {
    let (bw, bh) = (bounds.width as i32, bounds.height as i32);
    let mut out = rect;

    if out.x < 0 {
        out.width = out.width.saturating_add(out.x);
        out.x = 0;
    }
    if out.y < 0 {
        out.height = out.height.saturating_add(out.y);
        out.y = 0;
    }
    if out.x.saturating_add(out.width) > bw {
        out.width = bw - out.x;
    }
    if out.y.saturating_add(out.height) > bh {
        out.height = bh - out.y;
    }

    out
}

/// Clip a rectangle to the bounds, keeping its center where possible.
///
/// An edge below zero by `e` pixels shrinks the rectangle by `e` on both
/// sides. An edge beyond the bound by `e` pixels moves the origin by `e / 2`
/// and ends the rectangle at the bound, so a square grown around a whole image
/// clips back to exactly that image. The result may be empty.
///
/// # Examples
///
/// ```
/// use dataug_image::{ImageSize, Rect};
/// use dataug_augment::rect::truncate_rect_keep_center;
///
/// let bounds = ImageSize { width: 100, height: 100 };
/// assert_eq!(
///     truncate_rect_keep_center(Rect::new(-5, 85, 20, 20), bounds),
///     Rect::new(0, 87, 10, 13),
/// );
/// ```
pub fn truncate_rect_keep_center(rect: Rect, bounds: ImageSize) -> Rect {
    let (bw, bh) = (bounds.width as i32, bounds.height as i32);
    let mut out = rect;

    if out.x < 0 {
        out.width = out.width.saturating_add(out.x.saturating_mul(2));
        out.x = 0;
    }
    if out.y < 0 {
        out.height = out.height.saturating_add(out.y.saturating_mul(2));
        out.y = 0;
    }

    let overflow_x = out.x.saturating_add(out.width).saturating_sub(bw);
    if overflow_x > 0 {
        out.x = out.x.saturating_add(overflow_x / 2);
        out.width = bw - out.x;
    }
    let overflow_y = out.y.saturating_add(out.height).saturating_sub(bh);
    if overflow_y > 0 {
        out.y = out.y.saturating_add(overflow_y / 2);
        out.height = bh - out.y;
    }

    out
}

/// Randomly slide a rectangle and change its aspect ratio.
///
/// Draws, in this order, the x shift, the y shift (both relative to the new
/// size) and the aspect change `a` from zero-mean gaussians. The width is
/// scaled by `1 + a / (2 + a)` and the height by `1 - a / (2 + a)` around the
/// original center before the shift. The result is not clipped.
pub fn random_deform_rect<R: Rng + ?Sized>(
    rect: Rect,
    x_sigma: f64,
    y_sigma: f64,
    aspect_sigma: f64,
    rng: &mut R,
) -> Rect {
    let x_shift = x_sigma * rng.sample::<f64, _>(StandardNormal);
    let y_shift = y_sigma * rng.sample::<f64, _>(StandardNormal);
    let aspect_change = aspect_sigma * rng.sample::<f64, _>(StandardNormal);

    // float to int casts saturate, a change close to -2 gives a huge or NaN deform
    let deform = aspect_change / (2.0 + aspect_change);
    let width = (rect.width as f64 * (1.0 + deform)) as i32;
    let height = (rect.height as f64 * (1.0 - deform)) as i32;

    let x = rect.x.saturating_add(rect.width.saturating_sub(width) / 2);
    let y = rect.y.saturating_add(rect.height.saturating_sub(height) / 2);

    log::debug!(
        "deform rect: shift ({x_shift:.4}, {y_shift:.4}), aspect change {aspect_change:.4}"
    );

    Rect::new(
        (x as f64 + x_shift * width as f64) as i32,
        (y as f64 + y_shift * height as f64) as i32,
        width,
        height,
    )
}

/// The square around a rectangle that any in-plane rotation of it fits into.
///
/// The side is `round((width + height) / sqrt(2))`, centered on the rectangle.
pub fn expand_rect_for_rotate(rect: Rect) -> Rect {
    let side = ((rect.width as f64 + rect.height as f64) / std::f64::consts::SQRT_2 + 0.5) as i32;
    Rect::new(
        rect.x.saturating_sub(side.saturating_sub(rect.width) / 2),
        rect.y.saturating_sub(side.saturating_sub(rect.height) / 2),
        side,
        side,
    )
}

/// Copy the pixels of a region into a new image.
///
/// # Errors
///
/// [`AugmentError::DegenerateRegion`] for an empty region or one that does not
/// fit inside the image.
pub fn crop_rect<T, const C: usize>(
    src: &Image<T, C>,
    rect: Rect,
) -> Result<Image<T, C>, AugmentError>
where
    T: Copy + Default + Send + Sync,
{
    let size = match rect.size() {
        Some(size) if rect.is_inside(src.size()) => size,
        _ => return Err(AugmentError::DegenerateRegion(rect)),
    };

    let mut dst = Image::<T, C>::from_size_val(size, T::default())?;
    crop_image(src, &mut dst, rect.x as usize, rect.y as usize)?;

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use dataug_image::{Image, ImageSize, Rect};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const BOUNDS: ImageSize = ImageSize {
        width: 100,
        height: 80,
    };

    fn within(r: Rect, b: ImageSize) -> bool {
        r.x >= 0 && r.y >= 0 && r.x + r.width <= b.width as i32 && r.y + r.height <= b.height as i32
    }

    #[test]
    fn truncate_inside_unchanged() {
        let rect = Rect::new(10, 20, 30, 40);
        assert_eq!(truncate_rect(rect, BOUNDS), rect);
        assert_eq!(truncate_rect_keep_center(rect, BOUNDS), rect);
        let full = Rect::new(0, 0, 100, 80);
        assert_eq!(truncate_rect(full, BOUNDS), full);
        assert_eq!(truncate_rect_keep_center(full, BOUNDS), full);
    }

    #[test]
    fn truncate_clips_each_edge() {
        assert_eq!(
            truncate_rect(Rect::new(-10, -5, 30, 20), BOUNDS),
            Rect::new(0, 0, 20, 15)
        );
        assert_eq!(
            truncate_rect(Rect::new(90, 70, 30, 20), BOUNDS),
            Rect::new(90, 70, 10, 10)
        );
        assert_eq!(
            truncate_rect(Rect::new(-10, -10, 200, 200), BOUNDS),
            Rect::new(0, 0, 100, 80)
        );
    }

    #[test]
    fn truncate_fully_outside_is_empty() {
        assert!(truncate_rect(Rect::new(150, 10, 20, 20), BOUNDS).is_empty());
        assert!(truncate_rect(Rect::new(-50, 10, 20, 20), BOUNDS).is_empty());
        assert!(truncate_rect_keep_center(Rect::new(-50, 10, 20, 20), BOUNDS).is_empty());
    }

    #[test]
    fn truncate_keep_center_edges() {
        // left underflow by 4 shrinks both sides
        let r = truncate_rect_keep_center(Rect::new(-4, 10, 20, 10), BOUNDS);
        assert_eq!(r, Rect::new(0, 10, 12, 10));
        // right overflow by 6 moves the origin by 3 and ends at the bound
        let r = truncate_rect_keep_center(Rect::new(84, 10, 22, 10), BOUNDS);
        assert_eq!(r, Rect::new(87, 10, 13, 10));
        // bottom overflow by 3
        let r = truncate_rect_keep_center(Rect::new(0, 70, 10, 13), BOUNDS);
        assert_eq!(r, Rect::new(0, 71, 10, 9));
    }

    #[test]
    fn truncate_keep_center_whole_image_square() {
        // odd overflows on both axes once the negative origin is folded back
        for (w, h) in [(64, 48), (100, 100), (100, 80), (40, 30)] {
            let bounds = ImageSize {
                width: w,
                height: h,
            };
            let full = Rect::from_size(bounds);
            let square = expand_rect_for_rotate(full);
            assert_eq!(truncate_rect_keep_center(square, bounds), full, "{w}x{h}");
        }
    }

    #[test]
    fn truncate_results_within_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let rect = Rect::new(
                rng.random_range(-150..150),
                rng.random_range(-150..150),
                rng.random_range(0..300),
                rng.random_range(0..300),
            );
            let a = truncate_rect(rect, BOUNDS);
            if !a.is_empty() {
                assert!(within(a, BOUNDS), "{rect} -> {a}");
            }
            let b = truncate_rect_keep_center(rect, BOUNDS);
            if !b.is_empty() {
                assert!(within(b, BOUNDS), "{rect} -> {b}");
            }
        }
    }

    #[test]
    fn extreme_rects_do_not_overflow() {
        let r = truncate_rect(Rect::new(5, 0, i32::MAX, 10), BOUNDS);
        assert_eq!(r, Rect::new(5, 0, 95, 10));
        let r = truncate_rect(Rect::new(i32::MIN, 0, i32::MIN, 10), BOUNDS);
        assert!(r.is_empty());

        let r = truncate_rect_keep_center(Rect::new(i32::MIN / 2 - 7, 0, i32::MAX, 10), BOUNDS);
        assert!(r.is_empty());
        let r = truncate_rect_keep_center(Rect::new(i32::MAX - 1, 0, i32::MAX, 10), BOUNDS);
        assert!(r.is_empty());

        let r = expand_rect_for_rotate(Rect::new(i32::MIN, i32::MAX, i32::MAX, i32::MAX));
        assert!(r.width > 0);
    }

    #[test]
    fn deform_extreme_sigma_saturates() {
        let mut rng = StdRng::seed_from_u64(21);
        let rect = Rect::new(30, 20, 40, 30);
        for _ in 0..200 {
            let r = random_deform_rect(rect, 1e300, 1e300, 1e300, &mut rng);
            let t = truncate_rect(r, BOUNDS);
            if !t.is_empty() {
                assert!(within(t, BOUNDS), "{r} -> {t}");
            }
        }
    }

    #[test]
    fn deform_zero_sigma_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        let rect = Rect::new(10, 12, 41, 37);
        assert_eq!(random_deform_rect(rect, 0.0, 0.0, 0.0, &mut rng), rect);
    }

    #[test]
    fn deform_keeps_area_center() {
        let mut rng = StdRng::seed_from_u64(5);
        let rect = Rect::new(100, 100, 60, 60);
        for _ in 0..100 {
            let r = random_deform_rect(rect, 0.0, 0.0, 0.2, &mut rng);
            // only the aspect changes, the center moves by at most one pixel
            assert!((2 * r.x + r.width - 260).abs() <= 2);
            assert!((2 * r.y + r.height - 260).abs() <= 2);
            assert!(r.width + r.height <= 120);
        }
    }

    #[test]
    fn deform_shift_relative_to_size() {
        // replay the draws to know the shift
        let mut rng = StdRng::seed_from_u64(9);
        let mut replay = StdRng::seed_from_u64(9);
        let xs: f64 = replay.sample(StandardNormal);
        let ys: f64 = replay.sample(StandardNormal);

        let rect = Rect::new(50, 50, 40, 20);
        let r = random_deform_rect(rect, 0.5, 0.25, 0.0, &mut rng);
        assert_eq!(r.width, 40);
        assert_eq!(r.height, 20);
        assert_eq!(r.x, (50.0 + 0.5 * xs * 40.0) as i32);
        assert_eq!(r.y, (50.0 + 0.25 * ys * 20.0) as i32);
    }

    #[test]
    fn expand_for_rotate() {
        assert_eq!(
            expand_rect_for_rotate(Rect::new(10, 10, 40, 40)),
            Rect::new(2, 2, 57, 57)
        );
        assert_eq!(
            expand_rect_for_rotate(Rect::new(0, 0, 100, 20)),
            Rect::new(7, -32, 85, 85)
        );
    }

    #[test]
    fn crop_rect_checks() -> Result<(), AugmentError> {
        let image = Image::<u8, 1>::new([3, 3].into(), (0..9).collect())?;
        let crop = crop_rect(&image, Rect::new(1, 1, 2, 2))?;
        assert_eq!(crop.as_slice(), &[4, 5, 7, 8]);

        for rect in [
            Rect::new(0, 0, 0, 2),
            Rect::new(-1, 0, 2, 2),
            Rect::new(2, 2, 2, 2),
        ] {
            assert!(matches!(
                crop_rect(&image, rect),
                Err(AugmentError::DegenerateRegion(r)) if r == rect
            ));
        }
        Ok(())
    }
}
