pub(crate) mod image;
pub(crate) mod rect;
pub(crate) mod text;

pub use image::ImageCmd;
pub use rect::RectCmd;
pub use text::TextCmd;
