use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

use super::app::AppControl;

/// Window handle and metadata.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size as `(width, height)` in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        let phys  = self.window.inner_size();
        let scale = self.window.scale_factor();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(scale);
        (logi.width as f32, logi.height as f32)
    }

    /// The drawable area in logical pixels.
    pub fn viewport(&self) -> Viewport {
        let (w, h) = self.logical_size();
        Viewport::new(w, h)
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window:       WindowCtx<'a>,
    pub gpu:          &'a mut Gpu<'w>,
    pub input:        &'a InputState,
    /// Events since the last frame. Cleared by the runtime after the frame.
    pub input_frame:  &'a mut InputFrame,
    pub time:         FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears the surface with `clear`, calls `draw` with a ready [`RenderCtx`] and
    /// [`RenderTarget`], then presents the frame.
    ///
    /// Surface errors never reach `draw`: the frame is skipped (after a
    /// reconfigure when the surface was lost), and only an out-of-memory
    /// error returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        if !self.gpu.can_render() {
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                return match action {
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface out of memory; shutting down");
                        AppControl::Exit
                    }
                    SurfaceErrorAction::Reconfigured => {
                        log::debug!("surface reconfigured; frame skipped");
                        AppControl::Continue
                    }
                    SurfaceErrorAction::SkipFrame => {
                        log::debug!("surface unavailable; frame skipped");
                        AppControl::Continue
                    }
                };
            }
        };

        // Clear pass; dropped before the encoder is moved into submit().
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("easel clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view:           &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load:  wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes:         None,
                occlusion_query_set:      None,
                multiview_mask:           None,
            });
        }

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.window.viewport(),
        );

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
