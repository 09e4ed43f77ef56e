use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};
use crate::text::FontId;

/// One line of text, anchored on its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    pub font: FontId,
    /// Em size in logical pixels.
    pub size: f32,
    pub color: Color,
    /// Left end of the baseline, in the item's local space.
    pub baseline: Vec2,
}

impl DrawList {
    /// Records `text` starting at `baseline`. Newlines are not interpreted.
    pub fn push_text(
        &mut self,
        z: ZIndex,
        text: impl Into<String>,
        font: FontId,
        size: f32,
        color: Color,
        baseline: Vec2,
    ) {
        let cmd = TextCmd { text: text.into(), font, size, color, baseline };
        self.push(z, DrawCmd::Text(cmd));
    }
}
