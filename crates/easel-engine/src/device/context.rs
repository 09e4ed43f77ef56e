use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface;
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// Owns the wgpu objects for one window.
///
/// Construction is split in two steps so start-up can report which one
/// failed: [`Gpu::new`] acquires the device and picks a surface
/// configuration, [`Gpu::configure_surface`] applies it to the swapchain.
///
/// The surface borrows the window for `'w`; dropping the `Gpu` releases the
/// swapchain, device and queue before the window can go away.
pub struct Gpu<'w> {
    // Kept alive for the surface and adapter.
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'w>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    config: wgpu::SurfaceConfiguration,
    configured: bool,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,
}

impl<'w> Gpu<'w> {
    /// Creates the rendering context for `window`: instance, surface, adapter,
    /// device and queue. The surface is not configured yet.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("easel device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, prefer_srgb)
            .context("surface reports no supported formats")?;
        let alpha_mode = surface::choose_alpha_mode(&caps.alpha_modes, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        Ok(Self {
            _instance: instance,
            surface,
            adapter,
            device,
            queue,
            config,
            configured: false,
            size,
        })
    }

    /// Applies the chosen configuration to the swapchain.
    ///
    /// Fails while the window has no drawable area.
    pub fn configure_surface(&mut self) -> Result<()> {
        let (width, height) = surface::drawable_extent(self.size)
            .with_context(|| format!("window has zero drawable size ({}x{})", self.size.width, self.size.height))?;

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.configured = true;

        log::debug!(
            "surface configured: {width}x{height} {:?} {:?} on {:?}",
            self.config.format,
            self.config.present_mode,
            self.adapter.get_info().backend,
        );
        Ok(())
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Tracks a window resize. A zero-sized window (minimized) is remembered
    /// but reconfiguration waits until it has area again.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        let Some((width, height)) = surface::drawable_extent(new_size) else { return };
        if !self.configured {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Whether a frame can be acquired right now.
    pub fn can_render(&self) -> bool {
        self.configured && surface::drawable_extent(self.size).is_some()
    }

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("easel frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents the frame.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Maps a surface error to an action, reconfiguring the swapchain when
    /// it was lost or went out of date.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = SurfaceErrorAction::for_error(&err);
        if action == SurfaceErrorAction::Reconfigured && self.can_render() {
            self.surface.configure(&self.device, &self.config);
        }
        action
    }
}

impl Drop for Gpu<'_> {
    fn drop(&mut self) {
        log::debug!("releasing GPU context");
    }
}
