/// Bounding box with top-left origin coordinate system.
///
/// Coordinates use a top-left origin:
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
///
/// The same type carries image-space boxes once they have been reprojected,
/// in which case the units are pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Bounding box spanning two corner points.
    pub fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y)
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// The `(x0, top)` corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x0, self.top)
    }

    /// The `(x1, bottom)` corner.
    pub fn far_corner(&self) -> Point {
        Point::new(self.x1, self.bottom)
    }

    /// Center point of the box.
    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Shrink every side by `amount`. Negative amounts grow the box.
    pub fn inset(&self, amount: f64) -> BBox {
        BBox {
            x0: self.x0 + amount,
            top: self.top + amount,
            x1: self.x1 - amount,
            bottom: self.bottom - amount,
        }
    }

    /// Shrink like [`inset`](Self::inset), but collapse an axis onto its
    /// center line rather than letting its sides cross.
    ///
    /// An already inverted axis is inset unchanged, so it stays inverted.
    pub fn inset_clamped(&self, amount: f64) -> BBox {
        let axis = |lo: f64, hi: f64| {
            if lo > hi || hi - lo >= 2.0 * amount {
                (lo + amount, hi - amount)
            } else {
                let mid = (lo + hi) / 2.0;
                (mid, mid)
            }
        };
        let (x0, x1) = axis(self.x0, self.x1);
        let (top, bottom) = axis(self.top, self.bottom);
        BBox { x0, top, x1, bottom }
    }

    /// True when all four coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite()
            && self.top.is_finite()
            && self.x1.is_finite()
            && self.bottom.is_finite()
    }

    /// True when `x0 <= x1` and `top <= bottom`.
    pub fn is_ordered(&self) -> bool {
        self.x0 <= self.x1 && self.top <= self.bottom
    }

    /// Check if a point lies within the box (edges inclusive).
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x0 && point.x <= self.x1 && point.y >= self.top && point.y <= self.bottom
    }

    /// Check if `other` lies entirely within this box.
    pub fn contains(&self, other: &BBox) -> bool {
        other.x0 >= self.x0
            && other.x1 <= self.x1
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// A point in either page space or image space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Integer pixel rectangle used for cropping rendered images.
///
/// `(x0, y0)` is the top-left corner (inclusive) and `(x1, y1)` the
/// bottom-right corner (exclusive). No other point ordering is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelBox {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Build from image-space coordinates, truncating toward zero.
    /// Negative values clamp to zero.
    pub fn from_bbox_truncated(bbox: &BBox) -> Self {
        let t = |v: f64| if v <= 0.0 { 0 } else { v as u32 };
        Self::new(t(bbox.x0), t(bbox.top), t(bbox.x1), t(bbox.bottom))
    }

    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Pull every coordinate inside a `width` x `height` image.
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        Self::new(
            self.x0.min(width),
            self.y0.min(height),
            self.x1.min(width),
            self.y1.min(height),
        )
    }

    /// True when the box lies inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1 && self.x1 <= width && self.y1 <= height
    }
}

/// Orientation of a line segment or edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
    Diagonal,
}

/// Anything that can be drawn as a line segment between two page-space points.
///
/// Objects with a bounding box are drawn from `(x0, top)` to `(x1, bottom)`.
pub trait Segment {
    fn endpoints(&self) -> (Point, Point);
}

/// Anything with a page-space bounding box.
pub trait Bounded {
    fn bbox(&self) -> BBox;
}

/// Anything with a page-space anchor point, used as a circle center.
pub trait Anchor {
    fn anchor(&self) -> Point;
}

impl Segment for (Point, Point) {
    fn endpoints(&self) -> (Point, Point) {
        *self
    }
}

impl Segment for ((f64, f64), (f64, f64)) {
    fn endpoints(&self) -> (Point, Point) {
        (self.0.into(), self.1.into())
    }
}

impl Segment for (f64, f64, f64, f64) {
    fn endpoints(&self) -> (Point, Point) {
        (Point::new(self.0, self.1), Point::new(self.2, self.3))
    }
}

impl Segment for [f64; 4] {
    fn endpoints(&self) -> (Point, Point) {
        (Point::new(self[0], self[1]), Point::new(self[2], self[3]))
    }
}

impl Segment for BBox {
    fn endpoints(&self) -> (Point, Point) {
        (self.origin(), self.far_corner())
    }
}

impl<T: Segment + ?Sized> Segment for &T {
    fn endpoints(&self) -> (Point, Point) {
        (**self).endpoints()
    }
}

impl Bounded for BBox {
    fn bbox(&self) -> BBox {
        *self
    }
}

impl Bounded for (f64, f64, f64, f64) {
    fn bbox(&self) -> BBox {
        BBox::new(self.0, self.1, self.2, self.3)
    }
}

impl Bounded for [f64; 4] {
    fn bbox(&self) -> BBox {
        BBox::new(self[0], self[1], self[2], self[3])
    }
}

impl<T: Bounded + ?Sized> Bounded for &T {
    fn bbox(&self) -> BBox {
        (**self).bbox()
    }
}

impl Anchor for Point {
    fn anchor(&self) -> Point {
        *self
    }
}

impl Anchor for (f64, f64) {
    fn anchor(&self) -> Point {
        (*self).into()
    }
}

impl Anchor for BBox {
    fn anchor(&self) -> Point {
        self.center()
    }
}

impl<T: Anchor + ?Sized> Anchor for &T {
    fn anchor(&self) -> Point {
        (**self).anchor()
    }
}
