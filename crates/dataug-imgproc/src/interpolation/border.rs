use dataug_image::Image;

/// A border type for samples that fall outside of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Fill the border with a single, constant value.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    #[default]
    Constant,

    /// Repeat the outermost row or column of pixels.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// Reflect the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// Reflect the pixel values at the boundary, starting with the pixel 'next' to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,

    /// Wrap the content from the opposite side.
    ///
    /// Example: ...d c b a | w x y z...
    Wrap,
}

impl BorderMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        let len = len as isize;
        let m = i.rem_euclid(2 * len);
        if m < len {
            m as usize
        } else {
            (2 * len - 1 - m) as usize
        }
    }

    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let m = i.rem_euclid(2 * (len - 1));
        if m < len {
            m as usize
        } else {
            (2 * (len - 1) - m) as usize
        }
    }

    #[inline]
    fn wrap(i: isize, len: usize) -> usize {
        i.rem_euclid(len as isize) as usize
    }

    /// Maps index `i` to a valid index within `[0, len)` according to the border mode.
    ///
    /// Returns `None` when the index is out of range and the mode is
    /// [`BorderMode::Constant`], or when `len` is zero.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }
        match self {
            BorderMode::Constant => None,
            BorderMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
            BorderMode::Reflect => Some(Self::reflect(i, len)),
            BorderMode::Reflect101 => Some(Self::reflect101(i, len)),
            BorderMode::Wrap => Some(Self::wrap(i, len)),
        }
    }
}

/// Fetch the pixel at integer coordinates, applying the border policy.
#[inline]
pub(crate) fn pixel_with_border<const C: usize>(
    image: &Image<f32, C>,
    x: isize,
    y: isize,
    border: BorderMode,
    border_value: &[f32; C],
) -> [f32; C] {
    let (Some(ix), Some(iy)) = (
        border.map_index(x, image.cols()),
        border.map_index(y, image.rows()),
    ) else {
        return *border_value;
    };

    let base = (iy * image.cols() + ix) * C;
    let mut pixel = [0.0; C];
    pixel.copy_from_slice(&image.as_slice()[base..base + C]);
    pixel
}
