use crate::coords::Affine;

use super::{DrawCmd, SortKey, ZIndex};

/// A single draw item: sort key + command + transform.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
    /// Local-to-logical-pixel transform active when the item was pushed.
    pub transform: Affine,
}

/// Recorded draw stream for a frame.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - paint-order iteration reuses an internal index buffer; no per-frame allocation once warmed
///
/// # Transforms
///
/// [`save`] / [`restore`] bracket changes made with [`translate`] and
/// [`rotate_degrees`]. Each pushed item captures the current transform.
///
/// ```ignore
/// draw_list.save();
/// draw_list.translate(cx, cy);
/// draw_list.rotate_degrees(angle);
/// draw_list.push_image(z, &image, top_left);
/// draw_list.restore();
/// ```
///
/// [`save`]: DrawList::save
/// [`restore`]: DrawList::restore
/// [`translate`]: DrawList::translate
/// [`rotate_degrees`]: DrawList::rotate_degrees
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,

    transform: Affine,
    saved: Vec<Affine>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items and resets the transform state. Keeps allocated
    /// capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
        self.transform = Affine::IDENTITY;
        self.saved.clear();
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes a draw command with the given z-index under the current transform.
    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey::new(z, order),
            cmd,
            transform: self.transform,
        });

        self.sorted_dirty = true;
    }

    // ── transform stack ───────────────────────────────────────────────────

    /// Returns the transform applied to subsequently pushed items.
    #[inline]
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Saves the current transform. Calls must be balanced with [`restore`](Self::restore).
    #[inline]
    pub fn save(&mut self) {
        self.saved.push(self.transform);
    }

    /// Restores the transform saved by the matching [`save`](Self::save).
    ///
    /// An unbalanced call is ignored (debug builds assert).
    #[inline]
    pub fn restore(&mut self) {
        debug_assert!(!self.saved.is_empty(), "restore called without matching save");
        if let Some(t) = self.saved.pop() {
            self.transform = t;
        }
    }

    /// Moves the local origin by `(dx, dy)` in the current local space.
    #[inline]
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = Affine::translation(dx, dy).then(self.transform);
    }

    /// Rotates the local space about its origin (clockwise on screen).
    #[inline]
    pub fn rotate_degrees(&mut self, degrees: f32) {
        self.transform = Affine::rotation_degrees(degrees).then(self.transform);
    }

    // ── ordering ──────────────────────────────────────────────────────────

    /// Iterates items in paint order without cloning draw commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // Stable ordering is ensured by SortKey including insertion order.
        self.sorted_indices
            .sort_by(|&a, &b| self.items[a].key.cmp(&self.items[b].key));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Vec2};
    use crate::paint::Color;

    fn rect_at(x: f32) -> Rect {
        Rect::new(x, 0.0, 1.0, 1.0)
    }

    fn rect_x(item: &DrawItem) -> f32 {
        match &item.cmd {
            DrawCmd::Rect(cmd) => cmd.rect.origin.x,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn paint_order_is_z_then_insertion() {
        let mut dl = DrawList::new();
        dl.push_solid_rect(ZIndex(1), rect_at(0.0), Color::BLACK);
        dl.push_solid_rect(ZIndex(0), rect_at(1.0), Color::BLACK);
        dl.push_solid_rect(ZIndex(1), rect_at(2.0), Color::BLACK);
        dl.push_solid_rect(ZIndex(0), rect_at(3.0), Color::BLACK);

        let xs: Vec<f32> = dl.iter_in_paint_order().map(rect_x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 0.0, 2.0]);
    }

    #[test]
    fn items_capture_transform_at_push_time() {
        let mut dl = DrawList::new();
        dl.push_solid_rect(ZIndex(0), rect_at(0.0), Color::BLACK);

        dl.save();
        dl.translate(100.0, 50.0);
        dl.push_solid_rect(ZIndex(0), rect_at(0.0), Color::BLACK);
        dl.restore();

        dl.push_solid_rect(ZIndex(0), rect_at(0.0), Color::BLACK);

        let t: Vec<Affine> = dl.items().iter().map(|i| i.transform).collect();
        assert!(t[0].is_identity());
        assert_eq!(t[1], Affine::translation(100.0, 50.0));
        assert!(t[2].is_identity());
    }

    #[test]
    fn translate_then_rotate_rotates_about_translated_origin() {
        let mut dl = DrawList::new();
        dl.translate(100.0, 100.0);
        dl.rotate_degrees(90.0);

        let p = dl.transform().map_point(Vec2::new(10.0, 0.0));
        assert!((p.x - 100.0).abs() < 1e-4);
        assert!((p.y - 110.0).abs() < 1e-4);
    }

    #[test]
    fn nested_save_restore() {
        let mut dl = DrawList::new();
        dl.save();
        dl.translate(1.0, 0.0);
        dl.save();
        dl.translate(1.0, 0.0);
        assert_eq!(dl.transform(), Affine::translation(2.0, 0.0));
        dl.restore();
        assert_eq!(dl.transform(), Affine::translation(1.0, 0.0));
        dl.restore();
        assert!(dl.transform().is_identity());
    }

    #[test]
    fn clear_resets_items_and_transform() {
        let mut dl = DrawList::new();
        dl.save();
        dl.translate(5.0, 5.0);
        dl.push_solid_rect(ZIndex(0), rect_at(0.0), Color::BLACK);
        dl.clear();

        assert!(dl.is_empty());
        assert!(dl.transform().is_identity());
        assert_eq!(dl.iter_in_paint_order().count(), 0);
    }
}
