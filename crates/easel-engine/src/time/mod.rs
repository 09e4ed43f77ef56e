//! Frame timing.
//!
//! The runtime owns one `FrameClock` and ticks it once per loop iteration;
//! the resulting `FrameTime` is handed to the app in `FrameCtx`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
