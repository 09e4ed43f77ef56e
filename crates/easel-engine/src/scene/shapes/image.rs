use crate::coords::{Rect, Vec2};
use crate::paint::Image;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Image draw payload.
///
/// `dest` is in the local space of the item's transform; the image is
/// stretched to fill it.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub image: Image,
    pub dest: Rect,
}

impl DrawList {
    /// Records an image with its top-left corner at `top_left`, drawn at its
    /// natural size (one image pixel per logical pixel).
    pub fn push_image(&mut self, z: ZIndex, image: &Image, top_left: Vec2) {
        let dest = Rect::new(
            top_left.x,
            top_left.y,
            image.width() as f32,
            image.height() as f32,
        );
        self.push(z, DrawCmd::Image(ImageCmd { image: image.clone(), dest }));
    }
}
