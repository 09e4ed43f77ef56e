//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue for one window
//! - configuring the Surface (swapchain) once the window has a drawable size
//! - acquiring frames and providing encoders/views for rendering

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
