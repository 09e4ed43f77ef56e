//! GPU rendering subsystem.
//!
//! Renderers consume `scene` draw streams and issue GPU commands via wgpu.
//! Each renderer is responsible for its own GPU resources (pipelines, buffers,
//! textures) and opens its own render pass, so the order renderers are called
//! in is the order their output is layered.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Item transforms are applied on the CPU; every instance is a
//!   parallelogram `origin + u*axis_x + v*axis_y`.
//! - Vertex shader converts to NDC using a viewport uniform.

mod ctx;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
