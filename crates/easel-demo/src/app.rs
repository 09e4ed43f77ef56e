use rand::SeedableRng;
use rand::rngs::StdRng;

use easel_engine::core::{App, AppControl, FrameCtx};
use easel_engine::input::InputEvent;
use easel_engine::render::shapes::image::ImageRenderer;
use easel_engine::render::shapes::rect::RectRenderer;
use easel_engine::render::shapes::text::TextRenderer;
use easel_engine::scene::DrawList;

use crate::config::DemoConfig;
use crate::events::handle_events;
use crate::scene::{build_frame, SceneAssets};
use crate::state::AppState;

/// The demo application: owns its state, assets and renderers, and is moved
/// into the runtime for the rest of the process.
pub struct DemoApp {
    config: DemoConfig,
    state: AppState,
    /// Degrees; one step per rendered frame.
    rotation: u64,
    assets: SceneAssets,

    draw_list: DrawList,
    rect_renderer: RectRenderer,
    text_renderer: TextRenderer,
    image_renderer: ImageRenderer,
}

impl DemoApp {
    pub fn new(config: DemoConfig, assets: SceneAssets) -> Self {
        if assets.help_font.is_none() {
            log::warn!("no system font available; help text will not be drawn");
        }

        Self {
            config,
            state: AppState::default(),
            rotation: 0,
            assets,
            draw_list: DrawList::new(),
            rect_renderer: RectRenderer::new(),
            text_renderer: TextRenderer::new(),
            image_renderer: ImageRenderer::new(),
        }
    }

    /// Event step of one loop iteration.
    ///
    /// Once quit has been requested this returns [`AppControl::Exit`] without
    /// looking at `events`. Otherwise the events are applied and the frame
    /// goes ahead, even when they just requested quit.
    pub fn update<I>(&mut self, events: I) -> AppControl
    where
        I: IntoIterator<Item = InputEvent>,
    {
        if self.state.quit {
            return AppControl::Exit;
        }
        handle_events(&mut self.state, events);
        AppControl::Continue
    }
}

impl App for DemoApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.update(ctx.input_frame.take_events()) == AppControl::Exit {
            return AppControl::Exit;
        }

        // Fresh entropy every frame: rectangle colors are not stable.
        let mut rng = StdRng::from_entropy();
        build_frame(
            &mut self.draw_list,
            &self.state,
            self.rotation,
            ctx.window.viewport(),
            &mut rng,
            &self.assets,
            &self.config,
        );
        self.rotation = self.rotation.wrapping_add(1);

        let dl = &mut self.draw_list;
        let fonts = &self.assets.fonts;
        let r_text = &mut self.text_renderer;
        let r_rect = &mut self.rect_renderer;
        let r_image = &mut self.image_renderer;

        let control = ctx.render(self.config.background, |rctx, target| {
            r_text.render(rctx, target, dl, fonts);
            r_rect.render(rctx, target, dl);
            r_image.render(rctx, target, dl);
        });

        if self.state.quit {
            log::info!(
                "quitting with {} rectangles after {} frames",
                self.state.rects.len(),
                ctx.time.frame_index + 1
            );
            return AppControl::Exit;
        }
        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_engine::input::{
        Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    };
    use easel_engine::paint::Image;
    use easel_engine::text::FontSystem;

    fn app() -> DemoApp {
        DemoApp::new(
            DemoConfig::default(),
            SceneAssets {
                fonts: FontSystem::new(),
                help_font: None,
                star: Image::from_premul_rgba8(1, 1, vec![0, 0, 0, 255]).expect("image"),
            },
        )
    }

    fn press(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn escape() -> InputEvent {
        InputEvent::Key {
            key: Key::Escape,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        }
    }

    #[test]
    fn quit_frame_still_runs_then_loop_stops() {
        let mut app = app();

        assert_eq!(app.update(vec![press(1.0, 1.0), escape()]), AppControl::Continue);
        assert!(app.state.quit);
        assert_eq!(app.state.rects.len(), 1);

        // Later iterations exit without touching state.
        assert_eq!(app.update(vec![press(2.0, 2.0)]), AppControl::Exit);
        assert_eq!(app.state.rects.len(), 1);
    }

    #[test]
    fn close_request_ends_the_loop() {
        let mut app = app();
        app.update(vec![InputEvent::CloseRequested]);
        assert_eq!(app.update(Vec::new()), AppControl::Exit);
    }

    #[test]
    fn starts_empty_and_unrotated() {
        let app = app();
        assert!(app.state.rects.is_empty());
        assert!(!app.state.quit);
        assert_eq!(app.rotation, 0);
    }
}
