use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
///
/// `size` may be negative; renderers draw the [`normalized`](Rect::normalized)
/// copy, so a rectangle built from inverted edges still covers the area it spans.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Builds a rectangle from left/top/right/bottom edges without sorting them.
    #[inline]
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Same area with non-negative width and height.
    #[inline]
    pub fn normalized(self) -> Self {
        let x = self.origin.x.min(self.origin.x + self.size.x);
        let y = self.origin.y.min(self.origin.y + self.size.y);
        Rect::new(x, y, self.size.x.abs(), self.size.y.abs())
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        p.x >= r.origin.x
            && p.y >= r.origin.y
            && p.x < (r.origin.x + r.size.x)
            && p.y < (r.origin.y + r.size.y)
    }
}
