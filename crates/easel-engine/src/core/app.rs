use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Input reaches the app through `FrameCtx::input_frame`: every event that
/// arrived since the previous frame, in order, including close requests.
pub trait App {
    /// Called once per loop iteration. Returning [`AppControl::Exit`] ends the
    /// loop; no further frames are delivered.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
