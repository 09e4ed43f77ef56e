//! Colors and images shared between the demo and renderers.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - immutable CPU images composited by the image renderer
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod image;

pub use color::Color;
pub use image::{Image, ImageError, ImageId};
