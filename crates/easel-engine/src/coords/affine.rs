use super::{Rect, Vec2};

/// 2D affine transform in logical pixels.
///
/// Maps `(x, y)` to `(a*x + c*y + tx, b*x + d*y + ty)`. With +Y pointing down,
/// a positive rotation turns clockwise on screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    #[inline]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx, ty }
    }

    /// Rotation about the origin. `degrees` is reduced modulo 360 first so
    /// large running counters keep full `f32` precision.
    #[inline]
    pub fn rotation_degrees(degrees: f32) -> Self {
        let (sin, cos) = (degrees % 360.0).to_radians().sin_cos();
        Self { a: cos, b: sin, c: -sin, d: cos, tx: 0.0, ty: 0.0 }
    }

    /// Returns the transform that applies `self` first, then `next`.
    #[inline]
    pub fn then(self, next: Affine) -> Affine {
        Affine {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            tx: next.a * self.tx + next.c * self.ty + next.tx,
            ty: next.b * self.tx + next.d * self.ty + next.ty,
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    #[inline]
    pub fn map_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Maps a direction (ignores translation).
    #[inline]
    pub fn map_vector(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    /// Maps a rectangle to a parallelogram `(origin, axis_x, axis_y)`.
    ///
    /// Corner `(u, v)` of the unit quad lands at `origin + u*axis_x + v*axis_y`,
    /// which is the form the GPU quad shaders consume.
    #[inline]
    pub fn map_rect(&self, rect: Rect) -> (Vec2, Vec2, Vec2) {
        (
            self.map_point(rect.origin),
            self.map_vector(Vec2::new(rect.size.x, 0.0)),
            self.map_vector(Vec2::new(0.0, rect.size.y)),
        )
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn identity_maps_point_to_itself() {
        let p = Vec2::new(3.0, -7.5);
        assert_eq!(Affine::IDENTITY.map_point(p), p);
    }

    #[test]
    fn translation_ignored_for_vectors() {
        let t = Affine::translation(10.0, 20.0);
        assert_eq!(t.map_point(Vec2::new(1.0, 1.0)), Vec2::new(11.0, 21.0));
        assert_eq!(t.map_vector(Vec2::new(1.0, 1.0)), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn quarter_turn_is_clockwise_on_screen() {
        let r = Affine::rotation_degrees(90.0);
        assert!(approx(r.map_point(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0)));
        assert!(approx(r.map_point(Vec2::new(0.0, 1.0)), Vec2::new(-1.0, 0.0)));
    }

    #[test]
    fn rotation_wraps_full_turns() {
        let a = Affine::rotation_degrees(45.0);
        let b = Affine::rotation_degrees(45.0 + 360.0 * 1000.0);
        let p = Vec2::new(5.0, 2.0);
        assert!(approx(a.map_point(p), b.map_point(p)));
    }

    #[test]
    fn then_applies_left_first() {
        // Rotate about the origin, then move to (100, 50).
        let m = Affine::rotation_degrees(90.0).then(Affine::translation(100.0, 50.0));
        assert!(approx(m.map_point(Vec2::new(10.0, 0.0)), Vec2::new(100.0, 60.0)));

        // Other order: move first, then rotate the moved point.
        let n = Affine::translation(100.0, 50.0).then(Affine::rotation_degrees(90.0));
        assert!(approx(n.map_point(Vec2::new(10.0, 0.0)), Vec2::new(-50.0, 110.0)));
    }

    #[test]
    fn map_rect_under_translation() {
        let t = Affine::translation(5.0, 5.0);
        let (o, ax, ay) = t.map_rect(Rect::new(1.0, 2.0, 10.0, 20.0));
        assert_eq!(o, Vec2::new(6.0, 7.0));
        assert_eq!(ax, Vec2::new(10.0, 0.0));
        assert_eq!(ay, Vec2::new(0.0, 20.0));
    }

    #[test]
    fn map_rect_under_rotation_spans_rotated_axes() {
        let r = Affine::rotation_degrees(90.0);
        let (o, ax, ay) = r.map_rect(Rect::new(0.0, 0.0, 4.0, 2.0));
        assert!(approx(o, Vec2::zero()));
        assert!(approx(ax, Vec2::new(0.0, 4.0)));
        assert!(approx(ay, Vec2::new(-2.0, 0.0)));
    }
}
