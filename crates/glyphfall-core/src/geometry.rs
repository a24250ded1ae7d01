#![forbid(unsafe_code)]

//! Geometric primitives.

/// A rectangle in document cell coordinates (0-indexed, origin at top-left).
///
/// Element layouts and the scrolling viewport are both expressed as `Rect`s
/// in the same space, so viewport entry and pointer hit testing are plain
/// rectangle tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Top edge (inclusive). Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> u16 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Same rectangle moved vertically to `y`.
    #[inline]
    pub const fn with_y(self, y: u16) -> Self {
        Self::new(self.x, y, self.width, self.height)
    }

    /// Shrink vertically by `rows` at both the top and the bottom.
    ///
    /// Collapses to a zero-height rectangle at the vertical midpoint when the
    /// inset exceeds half the height.
    pub fn inset_vertical(&self, rows: u16) -> Rect {
        let total = rows.saturating_mul(2);
        if total >= self.height {
            return Rect::new(self.x, self.y.saturating_add(self.height / 2), self.width, 0);
        }
        Rect::new(
            self.x,
            self.y.saturating_add(rows),
            self.width,
            self.height - total,
        )
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }
}
