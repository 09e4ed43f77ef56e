/// Keyboard key identifier.
///
/// Only keys the runtime has a use for get a variant; everything else maps to
/// `Key::Unknown` carrying the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl MouseButton {
    /// The button that starts drags and presses things.
    pub const PRIMARY: MouseButton = MouseButton::Left;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Pointer move event in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
    /// Whether the primary button was held when the pointer moved.
    pub primary_down: bool,
}

/// Pointer button event.
///
/// Carries the pointer position so handlers don't need to track it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),

    /// The user asked to close the window (title-bar button, WM shortcut).
    /// The window stays open until the application exits.
    CloseRequested,
}

impl InputEvent {
    /// True for a fresh (non-repeat) press of `key`.
    pub fn is_key_press(&self, key: Key) -> bool {
        matches!(
            self,
            InputEvent::Key { key: k, state: KeyState::Pressed, repeat: false, .. } if *k == key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), repeat }
    }

    #[test]
    fn key_press_ignores_release_and_repeat() {
        assert!(key(Key::Escape, KeyState::Pressed, false).is_key_press(Key::Escape));
        assert!(!key(Key::Escape, KeyState::Released, false).is_key_press(Key::Escape));
        assert!(!key(Key::Escape, KeyState::Pressed, true).is_key_press(Key::Escape));
        assert!(!key(Key::Enter, KeyState::Pressed, false).is_key_press(Key::Escape));
        assert!(!InputEvent::CloseRequested.is_key_press(Key::Escape));
    }
}
