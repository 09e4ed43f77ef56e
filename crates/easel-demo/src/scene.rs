use rand::Rng;

use easel_engine::coords::{Vec2, Viewport};
use easel_engine::paint::{Color, Image};
use easel_engine::scene::{DrawList, ZIndex};
use easel_engine::text::{FontId, FontSystem};

use crate::config::DemoConfig;
use crate::state::AppState;

const Z_HELP: ZIndex = ZIndex(0);
const Z_RECTS: ZIndex = ZIndex(1);
const Z_STAR: ZIndex = ZIndex(2);

/// Resources the scene draws with, loaded once at startup.
pub struct SceneAssets {
    pub fonts: FontSystem,
    /// `None` when no usable system font was found; the help text is skipped.
    pub help_font: Option<FontId>,
    pub star: Image,
}

/// Fill color for one rectangle: random RGB with every channel in the upper
/// half, at a fixed alpha.
pub fn rect_color<R: Rng + ?Sized>(rng: &mut R, alpha: u8) -> Color {
    let rgb = rng.r#gen::<u32>() | 0x0080_8080;
    Color::from_argb_u32((u32::from(alpha) << 24) | (rgb & 0x00FF_FFFF))
}

/// Records one frame: help text, every rectangle in insertion order, then
/// the star rotated by `rotation` degrees about the viewport center.
pub fn build_frame<R: Rng + ?Sized>(
    draw_list: &mut DrawList,
    state: &AppState,
    rotation: u64,
    viewport: Viewport,
    rng: &mut R,
    assets: &SceneAssets,
    config: &DemoConfig,
) {
    draw_list.clear();

    if let Some(font) = assets.help_font {
        draw_list.push_text(
            Z_HELP,
            config.help_text.as_str(),
            font,
            config.help_size,
            config.help_color,
            config.help_baseline,
        );
    }

    for rect in &state.rects {
        draw_list.push_solid_rect(Z_RECTS, rect.to_rect(), rect_color(rng, config.rect_alpha));
    }

    let center = viewport.center();
    let half = Vec2::new(
        assets.star.width() as f32 / 2.0,
        assets.star.height() as f32 / 2.0,
    );
    draw_list.save();
    draw_list.translate(center.x, center.y);
    draw_list.rotate_degrees((rotation % 360) as f32);
    draw_list.push_image(Z_STAR, &assets.star, -half);
    draw_list.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_engine::scene::DrawCmd;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::state::Rectangle;

    fn assets() -> SceneAssets {
        SceneAssets {
            fonts: FontSystem::new(),
            help_font: None,
            star: Image::from_premul_rgba8(100, 100, vec![0; 100 * 100 * 4]).expect("image"),
        }
    }

    #[test]
    fn rect_colors_are_light_and_translucent() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let c = rect_color(&mut rng, 0x44);
            let a = 0x44 as f32 / 255.0;
            assert!((c.a - a).abs() < 1e-6);
            for channel in [c.r, c.g, c.b] {
                // Premultiplied: straight channel >= 0x80.
                assert!(channel / a >= 128.0 / 255.0 - 1e-5, "{c:?}");
            }
        }
    }

    #[test]
    fn rect_color_bit_rule() {
        struct Fixed(u32);
        impl rand::RngCore for Fixed {
            fn next_u32(&mut self) -> u32 { self.0 }
            fn next_u64(&mut self) -> u64 { self.0 as u64 }
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                rand::RngCore::try_fill_bytes(self, dest).expect("infallible")
            }
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
                for (d, s) in dest.iter_mut().zip(self.0.to_le_bytes().iter().cycle()) {
                    *d = *s;
                }
                Ok(())
            }
        }

        // 0x00 channels are lifted to 0x80; alpha is replaced, not or-ed.
        let c = rect_color(&mut Fixed(0xFF00_0000), 0x44);
        assert_eq!(c, Color::from_argb_u32(0x4480_8080));
        let c = rect_color(&mut Fixed(0x0012_FF34), 0x44);
        assert_eq!(c, Color::from_argb_u32(0x4492_FFB4));
    }

    #[test]
    fn frame_draws_rects_in_order_then_star() {
        let state = AppState {
            rects: vec![
                Rectangle::at(1.0, 1.0),
                Rectangle { left: 50.0, top: 50.0, right: 10.0, bottom: 20.0 },
            ],
            quit: false,
        };
        let mut dl = DrawList::new();
        let mut rng = StdRng::seed_from_u64(1);

        build_frame(
            &mut dl,
            &state,
            0,
            Viewport::new(800.0, 600.0),
            &mut rng,
            &assets(),
            &DemoConfig::default(),
        );

        let cmds: Vec<_> = dl.iter_in_paint_order().map(|i| i.cmd.clone()).collect();
        assert_eq!(cmds.len(), 3, "no font loaded, so no text");
        match (&cmds[0], &cmds[1]) {
            (DrawCmd::Rect(a), DrawCmd::Rect(b)) => {
                assert_eq!(a.rect, state.rects[0].to_rect());
                assert_eq!(b.rect, state.rects[1].to_rect());
            }
            other => panic!("expected two rects, got {other:?}"),
        }
        assert!(matches!(cmds[2], DrawCmd::Image(_)));
    }

    #[test]
    fn star_is_centered_on_viewport_and_rotated() {
        let mut dl = DrawList::new();
        let mut rng = StdRng::seed_from_u64(1);
        build_frame(
            &mut dl,
            &AppState::default(),
            90,
            Viewport::new(800.0, 600.0),
            &mut rng,
            &assets(),
            &DemoConfig::default(),
        );

        let item = dl.items().last().expect("star item");
        let DrawCmd::Image(cmd) = &item.cmd else { panic!("expected image") };

        // The image's center maps to the viewport center.
        let mid = Vec2::new(
            cmd.dest.origin.x + cmd.dest.size.x / 2.0,
            cmd.dest.origin.y + cmd.dest.size.y / 2.0,
        );
        let c = item.transform.map_point(mid);
        assert!((c.x - 400.0).abs() < 1e-3 && (c.y - 300.0).abs() < 1e-3, "{c:?}");

        // 90°: the image's +x axis points down the screen.
        let x_axis = item.transform.map_vector(Vec2::new(1.0, 0.0));
        assert!(x_axis.x.abs() < 1e-5 && (x_axis.y - 1.0).abs() < 1e-5);

        // The transform stack is balanced again.
        assert!(dl.transform().is_identity());
    }

    #[test]
    fn large_rotation_counts_wrap() {
        let mut a = DrawList::new();
        let mut b = DrawList::new();
        let mut rng = StdRng::seed_from_u64(1);
        let vp = Viewport::new(800.0, 600.0);
        let cfg = DemoConfig::default();
        let assets = assets();

        build_frame(&mut a, &AppState::default(), 30, vp, &mut rng, &assets, &cfg);
        build_frame(&mut b, &AppState::default(), 30 + 360 * 1_000_000, vp, &mut rng, &assets, &cfg);

        assert_eq!(a.items()[0].transform, b.items()[0].transform);
    }
}
