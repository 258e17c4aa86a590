use crate::image::ImageSize;

/// An axis aligned rectangle in pixel coordinates.
///
/// Width and height are signed: arithmetic on rectangles (deformation,
/// truncation) may produce empty rectangles, which are detected with
/// [`Rect::is_empty`] before any pixel access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// x-coordinate of the top-left corner.
    pub x: i32,
    /// y-coordinate of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering a full image of the given size.
    ///
    /// # Examples
    ///
    /// ```
    /// use dataug_image::{ImageSize, Rect};
    ///
    /// let rect = Rect::from_size(ImageSize { width: 4, height: 3 });
    /// assert_eq!(rect, Rect::new(0, 0, 4, 3));
    /// ```
    pub fn from_size(size: ImageSize) -> Self {
        Self::new(0, 0, size.width as i32, size.height as i32)
    }

    /// True when the rectangle has a non-positive width or height.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether the rectangle lies fully inside an image of the given size.
    pub fn is_inside(&self, size: ImageSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x as i64 + self.width as i64 <= size.width as i64
            && self.y as i64 + self.height as i64 <= size.height as i64
    }

    /// The size of a non-empty rectangle.
    pub fn size(&self) -> Option<ImageSize> {
        if self.is_empty() {
            return None;
        }
        Some(ImageSize {
            width: self.width as usize,
            height: self.height as usize,
        })
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rect {{ x: {}, y: {}, width: {}, height: {} }}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// An axis aligned rectangle with real valued fields.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RectF {
    /// x-coordinate of the top-left corner.
    pub x: f64,
    /// y-coordinate of the top-left corner.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl RectF {
    /// Create a new rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle containing all the given points.
    ///
    /// Returns `None` for an empty slice.
    pub fn bounding(points: &[[f64; 2]]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y) = (first[0], first[1]);
        let (mut max_x, mut max_y) = (first[0], first[1]);
        for p in &points[1..] {
            min_x = min_x.min(p[0]);
            min_y = min_y.min(p[1]);
            max_x = max_x.max(p[0]);
            max_y = max_y.max(p[1]);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Pixel-aligned size of the rectangle, width and height rounded.
    pub fn pixel_size(&self) -> ImageSize {
        ImageSize {
            width: self.width.round().max(0.0) as usize,
            height: self.height.round().max(0.0) as usize,
        }
    }
}
