use super::types::InputEvent;

/// Events received since the previous frame, in arrival order.
///
/// The runtime fills this from window events; the app drains it once per
/// frame with [`take_events`](Self::take_events). Held keys and buttons live
/// in `InputState`.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Takes the buffered events, leaving the frame empty.
    pub fn take_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }
}
