use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

use super::{Lifecycle, LifecycleTracker, RuntimeError};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            initial_size: LogicalSize::new(1366.0, 768.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, drives `app` once per frame until it returns
    /// [`AppControl::Exit`], then tears everything down.
    ///
    /// Start-up failures are returned as a [`RuntimeError`] naming the
    /// lifecycle phase that could not be reached.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<(), RuntimeError>
    where
        A: 'static + CoreApp,
    {
        let mut lifecycle = LifecycleTracker::new();

        let event_loop = match EventLoop::new().context("failed to create winit EventLoop") {
            Ok(el) => el,
            Err(e) => {
                lifecycle.fail();
                return Err(RuntimeError::new(Lifecycle::PlatformInitialized, e));
            }
        };
        advance(&mut lifecycle, Lifecycle::PlatformInitialized);

        let mut state = AppState::new(config, gpu_init, app, lifecycle);

        // Consumes the event loop; the window entry is already gone by the time
        // this returns (see `exiting`).
        let loop_result = event_loop.run_app(&mut state);
        let AppState { mut lifecycle, startup_error, frames, entry, .. } = state;
        drop(entry);

        if let Some(err) = startup_error {
            lifecycle.fail();
            return Err(err);
        }
        if let Err(e) = loop_result {
            lifecycle.fail();
            return Err(RuntimeError::new(
                Lifecycle::Running,
                anyhow::Error::new(e).context("winit event loop terminated with error"),
            ));
        }

        if lifecycle.phase() != Lifecycle::ShuttingDown {
            // The platform ended the loop before the app started or quit.
            lifecycle.fail();
        } else {
            advance(&mut lifecycle, Lifecycle::Terminated);
        }
        log::info!("terminated after {frames} frames");
        Ok(())
    }
}

/// Steps the tracker; an out-of-order step is a runtime bug and only logged.
fn advance(lifecycle: &mut LifecycleTracker, to: Lifecycle) {
    if let Err(e) = lifecycle.advance(to) {
        log::error!("{e}");
    }
}

/// The window plus everything whose lifetime is tied to it.
///
/// ouroboros drops the borrowing `gpu` before the `window` it borrows.
#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    lifecycle: LifecycleTracker,
    entry: Option<WindowEntry>,
    startup_error: Option<RuntimeError>,
    frames: u64,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A, lifecycle: LifecycleTracker) -> Self {
        Self {
            config,
            gpu_init,
            app,
            lifecycle,
            entry: None,
            startup_error: None,
            frames: 0,
        }
    }

    /// Runs every start-up step after the event loop exists, advancing the
    /// lifecycle as each succeeds.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RuntimeError> {
        let fail = |e| RuntimeError::new(Lifecycle::ContextCreated, e);

        log_display_mode(event_loop).map_err(fail)?;

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")
            .map_err(fail)?;

        let gpu_init = self.gpu_init.clone();
        let mut entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("failed to create GPU context")
            },
        }
        .try_build()
        .map_err(fail)?;
        advance(&mut self.lifecycle, Lifecycle::ContextCreated);

        entry
            .with_gpu_mut(|gpu| gpu.configure_surface())
            .context("failed to configure surface")
            .map_err(|e| RuntimeError::new(Lifecycle::SurfaceReady, e))?;
        advance(&mut self.lifecycle, Lifecycle::SurfaceReady);

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        advance(&mut self.lifecycle, Lifecycle::Running);
        Ok(())
    }

    /// Stops frame delivery and asks winit to leave the loop.
    fn begin_shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if self.lifecycle.is_running() {
            advance(&mut self.lifecycle, Lifecycle::ShuttingDown);
        }
        event_loop.exit();
    }

    /// Drives one loop iteration: the app consumes buffered input and renders.
    fn run_frame(&mut self) -> AppControl {
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let time = fields.clock.tick();
            let control = {
                let mut ctx = FrameCtx {
                    window: WindowCtx {
                        id: fields.window.id(),
                        window: fields.window,
                    },
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: &mut *fields.input_frame,
                    time,
                };
                app.on_frame(&mut ctx)
            };

            // Clear per-frame deltas after the frame is consumed.
            fields.input_frame.clear();
            control
        })
    }
}

/// Queries the display the window will open on and logs its mode.
fn log_display_mode(event_loop: &ActiveEventLoop) -> Result<()> {
    let monitor = event_loop
        .primary_monitor()
        .or_else(|| event_loop.available_monitors().next())
        .context("failed to query display mode: no monitor available")?;

    let size = monitor.size();
    let hz = monitor
        .refresh_rate_millihertz()
        .map(|mhz| format!("{:.2} Hz", mhz as f64 / 1000.0))
        .unwrap_or_else(|| "unknown refresh rate".to_string());

    log::info!(
        "display {}: {}x{} @ {hz}, scale {}",
        monitor.name().unwrap_or_else(|| "<unnamed>".to_string()),
        size.width,
        size.height,
        monitor.scale_factor(),
    );
    Ok(())
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.lifecycle.phase() != Lifecycle::PlatformInitialized {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.lifecycle.fail();
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.lifecycle.is_running() {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; presentation paces the loop.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if !self.lifecycle.is_running() {
            return;
        }
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        entry.with_mut(|fields| {
            let scale = fields.window.scale_factor();
            if let Some(ev) = translate_window_event(scale, fields.input_state, &event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
        });

        match &event {
            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                if self.run_frame() == AppControl::Exit {
                    self.begin_shutdown(event_loop);
                }
            }

            // Closing is the app's decision; the request reaches it as
            // `InputEvent::CloseRequested` on the next frame.
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.lifecycle.is_running() {
            // The platform is ending the loop without the app asking.
            advance(&mut self.lifecycle, Lifecycle::ShuttingDown);
        }

        if let Some(entry) = self.entry.take() {
            self.frames = entry.borrow_clock().frames();
            log::debug!("shutting down: releasing GPU context, then window");
            drop(entry);
            log::debug!("shutting down: releasing event loop");
        }
    }
}
