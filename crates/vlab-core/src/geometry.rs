#![forbid(unsafe_code)]

//! Geometric primitives in layout pixels.
//!
//! Unlike terminal cells these are fractional: element sizes come from the
//! host's layout measurement and positions are placed with sub-pixel
//! precision. All operations are infallible; degenerate inputs collapse to
//! zero rather than going negative.

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A zero-area size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Room left for `inner` when placed inside `self`, clamped at zero per axis.
    #[must_use]
    pub fn slack(self, inner: Size) -> Size {
        Size::new(
            (self.width - inner.width).max(0.0),
            (self.height - inner.height).max(0.0),
        )
    }

    /// Area in square pixels (zero for negative or NaN extents).
    #[must_use]
    pub fn area(self) -> f64 {
        let w = if self.width > 0.0 { self.width } else { 0.0 };
        let h = if self.height > 0.0 { self.height } else { 0.0 };
        w * h
    }
}

/// A position relative to the top-left corner of a container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The container origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Clamp each coordinate into `[0, max]` of the matching axis.
    #[must_use]
    pub fn clamp_to(self, max: Size) -> Point {
        Point::new(clamp(self.x, 0.0, max.width), clamp(self.y, 0.0, max.height))
    }
}

/// An axis-aligned rectangle (origin at top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle anchored at `origin` with the given size.
    #[inline]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Area in square pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.size().area()
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.area() <= 0.0
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle (at `self`'s origin) when they do not overlap.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::new(self.x, self.y, 0.0, 0.0);
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Grow (positive) or shrink (negative) the top and bottom edges by
    /// `fraction` of the height. Shrinking never inverts the rectangle.
    #[must_use]
    pub fn inset_vertical(&self, fraction: f64) -> Rect {
        let delta = self.height * fraction;
        let height = (self.height + 2.0 * delta).max(0.0);
        let y = self.y + (self.height - height) / 2.0;
        Rect::new(self.x, y, self.width, height)
    }
}

/// Clamp `value` into `[min, max]`, collapsing to `min` when the range is
/// degenerate or the value is NaN.
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if max <= min || value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}
