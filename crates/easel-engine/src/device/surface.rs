use winit::dpi::PhysicalSize;

/// Picks the swapchain format: an 8-bit sRGB format when preferred and
/// offered, otherwise the surface's first format. `None` if nothing is offered.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    formats.first().copied()
}

pub(crate) fn choose_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Surface extent for a window size; `None` while either side is zero
/// (wgpu rejects 0x0 configurations).
pub(crate) fn drawable_extent(size: PhysicalSize<u32>) -> Option<(u32, u32)> {
    (size.width > 0 && size.height > 0).then_some((size.width, size.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode as Alpha, TextureFormat as Fmt};

    #[test]
    fn srgb_preferred_when_offered() {
        let formats = [Fmt::Bgra8Unorm, Fmt::Rgba8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, true), Some(Fmt::Rgba8UnormSrgb));
        assert_eq!(choose_surface_format(&formats, false), Some(Fmt::Bgra8Unorm));
    }

    #[test]
    fn first_format_when_no_srgb() {
        assert_eq!(
            choose_surface_format(&[Fmt::Rgba16Float], true),
            Some(Fmt::Rgba16Float)
        );
    }

    #[test]
    fn no_formats_means_no_surface() {
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn unsupported_alpha_request_falls_back() {
        let modes = [Alpha::Opaque, Alpha::PreMultiplied];
        assert_eq!(choose_alpha_mode(&modes, Some(Alpha::PreMultiplied)), Alpha::PreMultiplied);
        assert_eq!(choose_alpha_mode(&modes, Some(Alpha::PostMultiplied)), Alpha::Opaque);
        assert_eq!(choose_alpha_mode(&[], None), Alpha::Auto);
    }

    #[test]
    fn zero_sized_window_has_no_extent() {
        assert_eq!(drawable_extent(PhysicalSize::new(0, 600)), None);
        assert_eq!(drawable_extent(PhysicalSize::new(800, 600)), Some((800, 600)));
    }
}
