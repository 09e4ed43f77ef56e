use easel_engine::coords::Vec2;
use easel_engine::paint::Color;

/// Everything about the demo that is a fixed choice rather than state.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub window_size: (f64, f64),

    pub background: Color,

    pub help_text: String,
    /// Left end of the help text baseline.
    pub help_baseline: Vec2,
    pub help_size: f32,
    pub help_color: Color,

    /// Alpha applied to every rectangle fill.
    pub rect_alpha: u8,

    /// Distance from the star's center to each tip.
    pub star_radius: f32,
    /// Side of the square image the star is rasterized into.
    pub star_image_size: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            window_size: (1366.0, 768.0),
            background: Color::WHITE,
            help_text: "Click and drag to create rects.  Press esc to quit.".to_string(),
            help_baseline: Vec2::new(100.0, 100.0),
            help_size: 12.0,
            help_color: Color::BLACK,
            rect_alpha: 0x44,
            star_radius: 50.0,
            star_image_size: 100,
        }
    }
}
