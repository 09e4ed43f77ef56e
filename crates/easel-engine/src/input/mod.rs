//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates platform events (see `platform`) into `InputEvent`s
//! and buffers them in an `InputFrame` until the next frame drains them.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};
