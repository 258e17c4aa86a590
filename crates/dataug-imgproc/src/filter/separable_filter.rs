use dataug_image::{Image, ImageDtype, ImageError};
use rayon::prelude::*;

use crate::interpolation::BorderMode;

/// A separable 2D filter that applies horizontal and vertical 1D convolutions sequentially.
///
/// The neighbour indices of every output column and row are resolved once
/// through the border policy.
struct SeparableFilter<'a> {
    kernel_x: &'a [f32],
    kernel_y: &'a [f32],
    border: BorderMode,
}

impl SeparableFilter<'_> {
    // for each output position, the source index of every kernel tap, if any
    fn taps(&self, kernel_len: usize, len: usize) -> Vec<Option<usize>> {
        let half = (kernel_len / 2) as isize;
        (0..len)
            .flat_map(|i| {
                (0..kernel_len).map(move |k| {
                    self.border
                        .map_index(i as isize + k as isize - half, len)
                })
            })
            .collect()
    }

    /// Performs horizontal filtering followed by vertical filtering using a temporary buffer.
    fn apply<T: ImageDtype, const C: usize>(&self, src: &Image<T, C>, dst: &mut Image<T, C>) {
        let rows = src.rows();
        let cols = src.cols();
        if rows == 0 || cols == 0 {
            return;
        }

        let taps_x = self.taps(self.kernel_x.len(), cols);
        let taps_y = self.taps(self.kernel_y.len(), rows);

        let src_data = src.as_slice();
        let mut temp = vec![0.0f32; src_data.len()];

        // Horizontal (parallel)
        temp.par_chunks_exact_mut(cols * C)
            .zip(src_data.par_chunks_exact(cols * C))
            .for_each(|(row_temp, row_src)| {
                for c in 0..cols {
                    let mut acc = [0.0f32; C];
                    let taps = &taps_x[c * self.kernel_x.len()..(c + 1) * self.kernel_x.len()];
                    for (&k, tap) in self.kernel_x.iter().zip(taps.iter()) {
                        if let Some(x) = tap {
                            let idx = x * C;
                            for (ch, acc_val) in acc.iter_mut().enumerate() {
                                *acc_val += row_src[idx + ch].to_f32() * k;
                            }
                        }
                    }
                    row_temp[c * C..(c + 1) * C].copy_from_slice(&acc);
                }
            });

        // Vertical (parallel)
        dst.as_slice_mut()
            .par_chunks_exact_mut(cols * C)
            .enumerate()
            .for_each(|(r, row_dst)| {
                let taps = &taps_y[r * self.kernel_y.len()..(r + 1) * self.kernel_y.len()];
                for c in 0..cols {
                    let mut acc = [0.0f32; C];
                    for (&k, tap) in self.kernel_y.iter().zip(taps.iter()) {
                        if let Some(y) = tap {
                            let idx = (y * cols + c) * C;
                            for (ch, acc_val) in acc.iter_mut().enumerate() {
                                *acc_val += temp[idx + ch] * k;
                            }
                        }
                    }
                    for (ch, &acc_val) in acc.iter().enumerate() {
                        row_dst[c * C + ch] = T::from_f32(acc_val);
                    }
                }
            });
    }
}

/// Apply a separable filter to an image.
///
/// The intermediate result is kept in `f32`; the output is converted back with
/// [`ImageDtype::from_f32`]. Taps falling outside of the image read zero with
/// [`BorderMode::Constant`] and the mapped pixel otherwise.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
/// * `border` - The border policy.
///
/// # Errors
///
/// The kernels must not be empty and `src` and `dst` must have the same size.
pub fn separable_filter<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
    border: BorderMode,
) -> Result<(), ImageError> {
    if kernel_x.is_empty() || kernel_y.is_empty() {
        return Err(ImageError::InvalidKernelLength(
            kernel_x.len(),
            kernel_y.len(),
        ));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let filter = SeparableFilter {
        kernel_x,
        kernel_y,
        border,
    };
    filter.apply(src, dst);

    Ok(())
}
