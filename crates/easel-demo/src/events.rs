use easel_engine::input::{
    InputEvent, Key, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
};

use crate::state::{AppState, Rectangle};

/// Applies every pending event, in order.
pub fn handle_events<I>(state: &mut AppState, events: I)
where
    I: IntoIterator<Item = InputEvent>,
{
    for event in events {
        apply_event(state, &event);
    }
}

/// Applies one event to the state.
///
/// - primary-button press: start a new rectangle at the pointer
/// - pointer move with the primary button held: drag the newest rectangle's
///   far corner
/// - Escape or a close request: quit
pub fn apply_event(state: &mut AppState, event: &InputEvent) {
    match event {
        InputEvent::PointerMoved(PointerMoveEvent { x, y, primary_down: true }) => {
            if let Some(rect) = state.rects.last_mut() {
                rect.right = *x;
                rect.bottom = *y;
            }
        }

        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::PRIMARY,
            state: MouseButtonState::Pressed,
            x,
            y,
            ..
        }) => {
            state.rects.push(Rectangle::at(*x, *y));
            log::trace!("rectangle #{} started at ({x}, {y})", state.rects.len());
        }

        InputEvent::CloseRequested => {
            log::debug!("close requested");
            state.quit = true;
        }

        ev if ev.is_key_press(Key::Escape) => {
            log::debug!("escape pressed");
            state.quit = true;
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_engine::input::{KeyState, Modifiers};

    fn down(x: f32, y: f32) -> InputEvent {
        button(MouseButton::Left, MouseButtonState::Pressed, x, y)
    }

    fn button(button: MouseButton, state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn drag(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y, primary_down: true })
    }

    fn hover(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y, primary_down: false })
    }

    fn key(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        }
    }

    fn run(events: Vec<InputEvent>) -> AppState {
        let mut state = AppState::default();
        handle_events(&mut state, events);
        state
    }

    #[test]
    fn drag_with_no_rectangles_is_a_no_op() {
        let state = run(vec![drag(10.0, 10.0)]);
        assert!(state.rects.is_empty());
        assert!(!state.quit);
    }

    #[test]
    fn press_appends_zero_area_rectangle() {
        let state = run(vec![down(12.0, 34.0)]);
        assert_eq!(state.rects, vec![Rectangle::at(12.0, 34.0)]);
        assert_eq!(state.rects[0].left, state.rects[0].right);
        assert_eq!(state.rects[0].top, state.rects[0].bottom);
    }

    #[test]
    fn press_then_drag_sets_far_corner() {
        let state = run(vec![down(10.0, 10.0), drag(50.0, 60.0)]);
        assert_eq!(
            state.rects,
            vec![Rectangle { left: 10.0, top: 10.0, right: 50.0, bottom: 60.0 }]
        );
    }

    #[test]
    fn only_the_newest_rectangle_follows_the_drag() {
        let state = run(vec![down(0.0, 0.0), down(5.0, 5.0), drag(30.0, 40.0)]);
        assert_eq!(state.rects.len(), 2);
        assert_eq!(state.rects[0], Rectangle::at(0.0, 0.0));
        assert_eq!(
            state.rects[1],
            Rectangle { left: 5.0, top: 5.0, right: 30.0, bottom: 40.0 }
        );
    }

    #[test]
    fn repeated_drags_update_without_appending() {
        let state = run(vec![down(1.0, 1.0), drag(2.0, 2.0), drag(3.0, 4.0), drag(-5.0, -6.0)]);
        assert_eq!(state.rects.len(), 1);
        assert_eq!(
            state.rects[0],
            Rectangle { left: 1.0, top: 1.0, right: -5.0, bottom: -6.0 }
        );
    }

    #[test]
    fn hover_never_mutates() {
        let state = run(vec![down(1.0, 1.0), hover(80.0, 90.0)]);
        assert_eq!(state.rects, vec![Rectangle::at(1.0, 1.0)]);
    }

    #[test]
    fn other_buttons_and_releases_are_ignored() {
        let state = run(vec![
            button(MouseButton::Right, MouseButtonState::Pressed, 1.0, 1.0),
            button(MouseButton::Left, MouseButtonState::Released, 1.0, 1.0),
        ]);
        assert!(state.rects.is_empty());
    }

    #[test]
    fn escape_quits() {
        assert!(run(vec![key(Key::Escape)]).quit);
        assert!(!run(vec![key(Key::Enter)]).quit);
    }

    #[test]
    fn close_request_quits() {
        assert!(run(vec![InputEvent::CloseRequested]).quit);
    }

    #[test]
    fn events_after_quit_in_the_same_batch_still_apply() {
        let state = run(vec![key(Key::Escape), down(3.0, 3.0)]);
        assert!(state.quit);
        assert_eq!(state.rects.len(), 1);
    }
}
