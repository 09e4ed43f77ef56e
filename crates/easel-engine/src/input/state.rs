use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for the window.
///
/// Held keys and buttons plus the pointer position. Every applied event is
/// also buffered into an `InputFrame` for the app.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds `ev` into the held state and buffers it in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // On focus loss, clear "down" sets so nothing stays stuck.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y, .. }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => self.keys_down.insert(*key),
                    KeyState::Released => self.keys_down.remove(key),
                };
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;

                match state {
                    MouseButtonState::Pressed => self.buttons_down.insert(*button),
                    MouseButtonState::Released => self.buttons_down.remove(button),
                };
            }

            InputEvent::CloseRequested => {}
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn press_and_release_are_tracked() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();

        st.apply_event(&mut fr, button(MouseButtonState::Pressed, 3.0, 4.0));
        assert!(st.button_down(MouseButton::Left));
        assert_eq!(st.pointer_pos, Some((3.0, 4.0)));

        st.apply_event(&mut fr, button(MouseButtonState::Released, 3.0, 4.0));
        assert!(!st.button_down(MouseButton::Left));
        assert_eq!(fr.events.len(), 2);
    }

    #[test]
    fn repeated_press_keeps_key_held_and_is_still_buffered() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        let esc = InputEvent::Key {
            key: Key::Escape,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        };

        st.apply_event(&mut fr, esc.clone());
        fr.clear();
        st.apply_event(&mut fr, esc);

        assert!(st.key_down(Key::Escape));
        assert_eq!(st.keys_down.len(), 1);
        assert_eq!(fr.events.len(), 1);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, button(MouseButtonState::Pressed, 0.0, 0.0));
        st.apply_event(&mut fr, InputEvent::Focused(false));
        assert!(st.buttons_down.is_empty());
        assert!(!st.focused);
    }

    #[test]
    fn close_request_is_buffered_without_state_change() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, InputEvent::CloseRequested);
        assert_eq!(fr.take_events(), vec![InputEvent::CloseRequested]);
        assert!(fr.events.is_empty());
    }

    #[test]
    fn pointer_leave_forgets_position() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(
            &mut fr,
            InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 2.0, primary_down: false }),
        );
        assert_eq!(st.pointer_pos, Some((1.0, 2.0)));
        st.apply_event(&mut fr, InputEvent::PointerLeft);
        assert_eq!(st.pointer_pos, None);
    }
}
