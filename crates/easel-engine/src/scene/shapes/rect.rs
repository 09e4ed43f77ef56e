use crate::coords::Rect;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Solid rectangle fill.
///
/// `rect` is kept exactly as recorded, inverted edges included; the
/// renderer fills the area it spans.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub color: Color,
}

impl DrawList {
    /// Records `rect` filled with `color`.
    #[inline]
    pub fn push_solid_rect(&mut self, z: ZIndex, rect: Rect, color: Color) {
        self.push(z, DrawCmd::Rect(RectCmd { rect, color }));
    }
}
