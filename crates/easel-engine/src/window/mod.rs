//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the single window, wires them to the GPU
//! layer, and tracks the runtime [`Lifecycle`].

mod error;
mod lifecycle;
mod runtime;

pub use error::RuntimeError;
pub use lifecycle::{Lifecycle, LifecycleTracker, TransitionError};
pub use runtime::{Runtime, RuntimeConfig};
