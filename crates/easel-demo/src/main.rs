//! `easel`: drag to draw rectangles under a spinning star. Escape quits.

mod app;
mod config;
mod events;
mod scene;
mod star;
mod state;

use std::process::ExitCode;

use anyhow::Result;
use winit::dpi::LogicalSize;

use easel_engine::device::GpuInit;
use easel_engine::logging::{init_logging, LoggingConfig};
use easel_engine::text::{FontId, FontSystem};
use easel_engine::window::{Runtime, RuntimeConfig};

use crate::app::DemoApp;
use crate::config::DemoConfig;
use crate::scene::SceneAssets;

/// Well-known locations of a sans-serif TrueType font.
const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let config = DemoConfig::default();
    let assets = match load_assets(&config) {
        Ok(a) => a,
        Err(e) => {
            log::error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let runtime_config = RuntimeConfig {
        title: config.title.clone(),
        initial_size: LogicalSize::new(config.window_size.0, config.window_size.1),
    };
    let gpu_init = GpuInit {
        present_mode: wgpu::PresentMode::AutoVsync,
        ..GpuInit::default()
    };

    match Runtime::run(runtime_config, gpu_init, DemoApp::new(config, assets)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn load_assets(config: &DemoConfig) -> Result<SceneAssets> {
    let mut fonts = FontSystem::new();
    let help_font = load_help_font(&mut fonts);
    let star = star::render_star_image(config.star_radius, config.star_image_size)?;
    Ok(SceneAssets { fonts, help_font, star })
}

/// Loads the first readable font in [`FONT_PATHS`].
fn load_help_font(fonts: &mut FontSystem) -> Option<FontId> {
    FONT_PATHS.iter().find_map(|path| {
        let bytes = std::fs::read(path).ok()?;
        match fonts.load_font(&bytes) {
            Ok(id) => {
                log::debug!("help text font: {path}");
                Some(id)
            }
            Err(e) => {
                log::warn!("skipping {path}: {e}");
                None
            }
        }
    })
}
