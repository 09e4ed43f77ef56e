use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::input::{
    InputEvent, InputState, Key, KeyState, Modifiers, MouseButton, MouseButtonState,
    PointerButtonEvent, PointerMoveEvent,
};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// `scale_factor` converts physical positions to logical pixels. `state` is
/// the tracked input state *before* this event; winit 0.30 cannot be queried
/// for modifiers or the cursor, so both come from there.
///
/// Returns `None` for events not represented by the input subsystem.
pub(crate) fn translate_window_event(
    scale_factor: f64,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    match event {
        WindowEvent::CloseRequested => Some(InputEvent::CloseRequested),

        WindowEvent::ModifiersChanged(m) => Some(InputEvent::ModifiersChanged(map_modifiers(m.state()))),

        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(scale_factor, *position);
            Some(InputEvent::PointerMoved(PointerMoveEvent {
                x,
                y,
                primary_down: state.button_down(MouseButton::PRIMARY),
            }))
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            let st = match st {
                ElementState::Pressed => MouseButtonState::Pressed,
                ElementState::Released => MouseButtonState::Released,
            };
            let (x, y) = state.pointer_pos.unwrap_or((0.0, 0.0));

            Some(InputEvent::PointerButton(PointerButtonEvent {
                button: map_mouse_button(*button),
                state: st,
                x,
                y,
                modifiers: state.modifiers,
            }))
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let st = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            Some(InputEvent::Key {
                key: map_key(event.physical_key),
                state: st,
                modifiers: state.modifiers,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

fn to_logical_f32(scale_factor: f64, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(scale_factor);
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => match code {
            KeyCode::Escape => Key::Escape,
            KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Space => Key::Space,

            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,

            KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
            KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
            KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
            KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

            other => Key::Unknown(other as u32),
        },

        // NativeKeyCode has no stable numeric form.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}
