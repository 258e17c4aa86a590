use dataug_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

/// Crop an image to a specified region.
///
/// The region has the size of `dst` and its top-left corner at `(x, y)`.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image to store the cropped image.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Errors
///
/// The region must lie fully inside `src`.
///
/// # Examples
///
/// ```rust
/// use dataug_image::{Image, ImageSize};
/// use dataug_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let dst_cols = dst.cols();
    let dst_rows = dst.rows();

    if x + dst_cols > src.cols() || y + dst_rows > src.rows() {
        return Err(ImageError::RegionOutOfBounds(
            x,
            y,
            dst_cols,
            dst_rows,
            src.cols(),
            src.rows(),
        ));
    }

    if dst_cols == 0 {
        return Ok(());
    }

    let src_stride = src.cols() * C;
    let src_rows = src.as_slice().par_chunks_exact(src_stride).skip(y);

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .zip(src_rows)
        .for_each(|(dst_row, src_row)| {
            // copy the row segment starting at the left edge of the region
            dst_row.copy_from_slice(&src_row[x * C..(x + dst_cols) * C]);
        });

    Ok(())
}
