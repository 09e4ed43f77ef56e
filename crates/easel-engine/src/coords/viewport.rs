use super::Vec2;

/// Viewport size in logical pixels.
///
/// Renderers should treat this as the coordinate basis for converting logical px
/// positions to NDC in shaders.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}
