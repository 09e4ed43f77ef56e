use easel_engine::coords::Rect;

/// A user-drawn rectangle, stored exactly as dragged.
///
/// Edges are not sorted: dragging up or left leaves `right < left` or
/// `bottom < top`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rectangle {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rectangle {
    /// Zero-area rectangle anchored at `(x, y)`.
    pub fn at(x: f32, y: f32) -> Self {
        Self { left: x, top: y, right: x, bottom: y }
    }

    pub fn to_rect(self) -> Rect {
        Rect::from_ltrb(self.left, self.top, self.right, self.bottom)
    }
}

/// Demo state: the rectangles drawn so far (oldest first) and whether the
/// user asked to quit.
#[derive(Debug, Default)]
pub struct AppState {
    pub rects: Vec<Rectangle>,
    pub quit: bool,
}
