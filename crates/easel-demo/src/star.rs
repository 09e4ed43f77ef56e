use anyhow::{Context, Result};
use resvg::tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Point, Transform};

use easel_engine::paint::Image;

const TIPS: usize = 5;

/// The star's tips, clockwise from straight up, centered on the origin.
pub fn star_points(radius: f32) -> [Point; TIPS] {
    let step = Transform::from_rotate(360.0 / TIPS as f32);
    let mut points = [Point::from_xy(0.0, -radius); TIPS];
    for i in 1..TIPS {
        let mut p = [points[i - 1]];
        step.map_points(&mut p);
        points[i] = p[0];
    }
    points
}

/// Closed pentagram through the tips, visiting every second one.
///
/// Filled even-odd, the inner pentagon (covered twice) stays empty.
pub fn star_path(radius: f32) -> Option<Path> {
    let points = star_points(radius);
    let mut pb = PathBuilder::new();
    pb.move_to(points[0].x, points[0].y);
    for i in 1..=TIPS {
        let p = points[(2 * i) % TIPS];
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

/// Rasterizes a black star centered in a `size`×`size` transparent image.
pub fn render_star_image(radius: f32, size: u32) -> Result<Image> {
    let mut pixmap = Pixmap::new(size, size)
        .with_context(|| format!("failed to allocate {size}x{size} star pixmap"))?;
    let path = star_path(radius).context("star path is empty")?;

    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = true;

    let center = size as f32 / 2.0;
    pixmap.fill_path(
        &path,
        &paint,
        FillRule::EvenOdd,
        Transform::from_translate(center, center),
        None,
    );

    let image = Image::from_premul_rgba8(size, size, pixmap.take())
        .context("failed to wrap star pixels")?;
    log::debug!("star image rasterized ({size}x{size}, radius {radius})");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha(image: &Image, x: u32, y: u32) -> u8 {
        image.pixels()[((y * image.width() + x) * 4 + 3) as usize]
    }

    #[test]
    fn five_distinct_tips_on_the_circle() {
        let pts = star_points(50.0);
        assert!((pts[0].x).abs() < 1e-4 && (pts[0].y + 50.0).abs() < 1e-4);

        for (i, p) in pts.iter().enumerate() {
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!((r - 50.0).abs() < 1e-3, "tip {i} at radius {r}");
            for q in &pts[i + 1..] {
                let d = ((p.x - q.x).powi(2) + (p.y - q.y).powi(2)).sqrt();
                assert!(d > 1.0, "tips {p:?} and {q:?} coincide");
            }
        }
    }

    #[test]
    fn tips_turn_clockwise_on_screen() {
        // 72° clockwise from straight up lands right of center, above it.
        let p = star_points(50.0)[1];
        assert!(p.x > 0.0 && p.y < 0.0, "{p:?}");
    }

    #[test]
    fn path_covers_the_tip_circle() {
        let bounds = star_path(50.0).expect("non-empty").bounds();
        assert!((bounds.top() + 50.0).abs() < 1e-3);
        assert!((bounds.width() - 2.0 * 50.0 * 72f32.to_radians().sin()).abs() < 1e-2);
    }

    #[test]
    fn raster_is_opaque_in_a_tip_and_hollow_in_the_middle() {
        let image = render_star_image(50.0, 100).expect("rasterize");
        assert_eq!((image.width(), image.height()), (100, 100));

        // Inside the top spike, well clear of its edges.
        assert_eq!(alpha(&image, 50, 15), 255);
        // Even-odd leaves the center pentagon empty.
        assert_eq!(alpha(&image, 50, 50), 0);
        // Outside the star entirely.
        assert_eq!(alpha(&image, 2, 2), 0);
    }

    #[test]
    fn star_pixels_are_black() {
        let image = render_star_image(50.0, 100).expect("rasterize");
        let i = ((15 * 100 + 50) * 4) as usize;
        assert_eq!(&image.pixels()[i..i + 4], &[0, 0, 0, 255]);
    }
}
