use dataug_image::{ImageError, ImageSize};
use rayon::prelude::*;

/// Per destination pixel lookup into source image coordinates.
///
/// Two same-shaped grids, `map_x` and `map_y`, stored row-major. The entry at
/// `(x, y)` holds the fractional source coordinate sampled for the destination
/// pixel `(x, y)`. Coordinates may lie outside of the source image; the
/// resampler's border policy decides what is read there.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateMap {
    size: ImageSize,
    map_x: Vec<f32>,
    map_y: Vec<f32>,
}

impl CoordinateMap {
    /// Create a map from its two grids.
    ///
    /// # Errors
    ///
    /// The grids must both hold `size.width * size.height` values.
    pub fn new(size: ImageSize, map_x: Vec<f32>, map_y: Vec<f32>) -> Result<Self, ImageError> {
        let expected = size.width * size.height;
        if map_x.len() != expected {
            return Err(ImageError::InvalidChannelShape(map_x.len(), expected));
        }
        if map_y.len() != expected {
            return Err(ImageError::InvalidChannelShape(map_y.len(), expected));
        }
        Ok(Self { size, map_x, map_y })
    }

    /// Create a map by evaluating `f(x, y)` for every destination pixel.
    ///
    /// # Arguments
    ///
    /// * `size` - The destination size.
    /// * `f` - Returns the source coordinates for the destination pixel, or an error
    ///   which aborts the construction.
    ///
    /// # Examples
    ///
    /// ```
    /// use dataug_image::ImageError;
    /// use dataug_imgproc::interpolation::CoordinateMap;
    ///
    /// let map = CoordinateMap::from_fn::<_, ImageError>([2, 2].into(), |x, y| {
    ///     Ok((x as f32 + 0.5, y as f32))
    /// }).unwrap();
    ///
    /// assert_eq!(map.get(1, 1), Some((1.5, 1.0)));
    /// ```
    pub fn from_fn<F, E>(size: ImageSize, mut f: F) -> Result<Self, E>
    where
        F: FnMut(usize, usize) -> Result<(f32, f32), E>,
    {
        let num_pixels = size.width * size.height;
        let mut map_x = Vec::with_capacity(num_pixels);
        let mut map_y = Vec::with_capacity(num_pixels);

        for y in 0..size.height {
            for x in 0..size.width {
                let (sx, sy) = f(x, y)?;
                map_x.push(sx);
                map_y.push(sy);
            }
        }

        Ok(Self { size, map_x, map_y })
    }

    /// Same as [`CoordinateMap::from_fn`], evaluating the rows in parallel.
    ///
    /// When several pixels fail, any one of their errors is returned.
    pub fn par_from_fn<F, E>(size: ImageSize, f: F) -> Result<Self, E>
    where
        F: Fn(usize, usize) -> Result<(f32, f32), E> + Send + Sync,
        E: Send,
    {
        let num_pixels = size.width * size.height;
        let mut map_x = vec![0.0; num_pixels];
        let mut map_y = vec![0.0; num_pixels];

        if size.width > 0 {
            map_x
                .par_chunks_exact_mut(size.width)
                .zip(map_y.par_chunks_exact_mut(size.width))
                .enumerate()
                .try_for_each(|(y, (row_x, row_y))| {
                    for (x, (sx, sy)) in row_x.iter_mut().zip(row_y.iter_mut()).enumerate() {
                        (*sx, *sy) = f(x, y)?;
                    }
                    Ok(())
                })?;
        }

        Ok(Self { size, map_x, map_y })
    }

    /// The destination size covered by the map.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The x coordinates, row-major.
    pub fn map_x(&self) -> &[f32] {
        &self.map_x
    }

    /// The y coordinates, row-major.
    pub fn map_y(&self) -> &[f32] {
        &self.map_y
    }

    /// The source coordinates stored for the destination pixel `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<(f32, f32)> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = y * self.size.width + x;
        Some((self.map_x[idx], self.map_y[idx]))
    }
}

#[cfg(test)]
mod tests {
    use dataug_image::ImageError;

    use super::CoordinateMap;

    #[test]
    fn map_new_checks_length() {
        let res = CoordinateMap::new([2, 2].into(), vec![0.0; 4], vec![0.0; 3]);
        assert_eq!(res, Err(ImageError::InvalidChannelShape(3, 4)));
    }

    #[test]
    fn map_from_fn_row_major() -> Result<(), ImageError> {
        let map = CoordinateMap::from_fn::<_, ImageError>([3, 2].into(), |x, y| {
            Ok((x as f32, 10.0 * y as f32))
        })?;
        assert_eq!(map.map_x(), &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert_eq!(map.map_y(), &[0.0, 0.0, 0.0, 10.0, 10.0, 10.0]);
        assert_eq!(map.get(3, 0), None);
        Ok(())
    }

    #[test]
    fn map_from_fn_propagates_error() {
        let res = CoordinateMap::from_fn([2, 2].into(), |x, _| {
            if x == 1 {
                Err("stop")
            } else {
                Ok((0.0, 0.0))
            }
        });
        assert_eq!(res, Err("stop"));
    }

    #[test]
    fn map_par_from_fn_matches_sequential() -> Result<(), ImageError> {
        let f = |x: usize, y: usize| Ok::<_, ImageError>((x as f32 * 0.5, y as f32 - 1.0));
        let seq = CoordinateMap::from_fn([7, 5].into(), f)?;
        let par = CoordinateMap::par_from_fn([7, 5].into(), f)?;
        assert_eq!(par, seq);

        let empty = CoordinateMap::par_from_fn([0, 3].into(), f)?;
        assert_eq!(empty.size(), [0, 3].into());
        assert!(empty.map_x().is_empty());
        Ok(())
    }

    #[test]
    fn map_par_from_fn_propagates_error() {
        let res = CoordinateMap::par_from_fn([4, 4].into(), |x, y| {
            if x == 2 && y == 3 {
                Err("stop")
            } else {
                Ok((0.0, 0.0))
            }
        });
        assert_eq!(res, Err("stop"));
    }
}
