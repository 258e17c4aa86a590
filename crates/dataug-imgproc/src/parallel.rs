use rayon::prelude::*;

use dataug_image::Image;

use crate::interpolation::grid::CoordinateMap;

/// Apply a function to each destination pixel for grid sampling in parallel.
///
/// The closure receives the source coordinates stored in the map for the
/// destination pixel, and the destination pixel channels to fill.
///
/// PRECONDITION: `dst` and `map` have the same size.
pub fn par_iter_rows_resample<const C: usize>(
    dst: &mut Image<f32, C>,
    map: &CoordinateMap,
    f: impl Fn(&f32, &f32, &mut [f32]) + Send + Sync,
) {
    let cols = dst.cols();
    if cols == 0 {
        return;
    }

    let dst_slice = dst.as_slice_mut();
    let map_x_slice = map.map_x();
    let map_y_slice = map.map_y();

    dst_slice
        .par_chunks_exact_mut(C * cols)
        .zip(map_x_slice.par_chunks_exact(cols))
        .zip(map_y_slice.par_chunks_exact(cols))
        .for_each(|((dst_chunk, map_x_chunk), map_y_chunk)| {
            dst_chunk
                .chunks_exact_mut(C)
                .zip(map_x_chunk.iter().zip(map_y_chunk.iter()))
                .for_each(|(dst_pixel, (x, y))| {
                    f(x, y, dst_pixel);
                });
        });
}
