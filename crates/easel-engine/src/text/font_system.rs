use std::fmt;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading. The system is owned by the application
/// and passed to `TextRenderer::render` each frame so new glyphs can be
/// rasterized on demand.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    ///
    /// Returns the `FontId` that identifies the font in draw commands.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        if bytes.is_empty() {
            return Err(FontLoadError("no font data".to_string()));
        }
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    /// Returns a reference to the underlying `fontdue::Font`, if `id` is valid.
    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Distance from the top of a text line to its baseline, in logical pixels.
    ///
    /// Falls back to `size` when the font has no horizontal metrics or `id`
    /// is unknown.
    pub fn ascent(&self, id: FontId, size: f32) -> f32 {
        self.get(id)
            .and_then(|f| f.horizontal_line_metrics(size))
            .map_or(size, |m| m.ascent)
    }
}
