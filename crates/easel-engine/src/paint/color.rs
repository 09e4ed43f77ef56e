/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);

    /// Creates a premultiplied color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Creates a premultiplied color from a packed `0xAARRGGBB` value.
    #[inline]
    pub fn from_argb_u32(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self::from_srgb_u8(r, g, b, a)
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
