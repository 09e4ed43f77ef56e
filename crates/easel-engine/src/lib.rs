//! Windowed 2D drawing engine.
//!
//! A [`window::Runtime`] opens one window, brings up the GPU behind it and
//! calls a [`core::App`] once per frame. The app records shapes, text and
//! images into a [`scene::DrawList`] and hands it to the renderers in
//! [`render::shapes`].

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
