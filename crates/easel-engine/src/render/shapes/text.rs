use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::coords::{Affine, Rect};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontSystem;

use super::common::{
    create_linear_sampler, create_quad_pipeline, create_textured_bgl, create_textured_bind_group,
    create_viewport_ubo, write_viewport_ubo, InstanceBuffer, QuadBuffers,
};

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

// ── cached glyph ──────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq)]
struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// Shelf packer for the glyph atlas: fills rows left to right, opens a new
/// row when the current one runs out of width.
#[derive(Debug)]
struct ShelfPacker {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    fn new(size: u32) -> Self {
        Self {
            size,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
        }
    }

    /// Reserves a `w`×`h` slot and returns its top-left texel, or `None` once
    /// the atlas is exhausted.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }

        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_y + h + GLYPH_PADDING > self.size || w + 2 * GLYPH_PADDING > self.size {
            self.full = true;
            return None;
        }

        let slot = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(slot)
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Renderer for `DrawCmd::Text`.
///
/// Maintains a 1024 × 1024 R8Unorm glyph atlas. Glyphs are rasterized on
/// first use via fontdue and cached for the renderer's lifetime, keyed by
/// `GlyphRasterConfig` (font, glyph index, pixel size).
///
/// Layout happens in the item's local space; the item transform is applied
/// to each glyph quad afterwards.
pub struct TextRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    atlas_texture: Option<wgpu::Texture>,
    atlas_view: Option<wgpu::TextureView>,
    packer: ShelfPacker,
    warned_atlas_full: bool,

    glyph_cache: HashMap<GlyphRasterConfig, CachedGlyph>,

    quad: Option<QuadBuffers>,
    instances: InstanceBuffer,
    scratch: Vec<GlyphInstance>,

    layout: Layout<()>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            sampler: None,
            atlas_texture: None,
            atlas_view: None,
            packer: ShelfPacker::new(ATLAS_SIZE),
            warned_atlas_full: false,
            glyph_cache: HashMap::new(),
            quad: None,
            instances: InstanceBuffer::default(),
            scratch: Vec::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders all `DrawCmd::Text` entries in `draw_list`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        font_system: &FontSystem,
    ) {
        let text_cmds: Vec<_> = draw_list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Text(cmd) => Some((cmd.clone(), item.transform)),
                _ => None,
            })
            .collect();

        if text_cmds.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_atlas(ctx);
        self.ensure_bindings(ctx);

        // ── build glyph instance list ──────────────────────────────────────
        self.scratch.clear();

        for (cmd, transform) in &text_cmds {
            let Some(font) = font_system.get(cmd.font) else {
                log::warn!("TextRenderer: unknown FontId {:?}, skipping", cmd.font);
                continue;
            };

            // fontdue lays out from the top of the line.
            let top = cmd.baseline.y - font_system.ascent(cmd.font, cmd.size);
            self.layout.reset(&LayoutSettings {
                x: cmd.baseline.x,
                y: top,
                ..LayoutSettings::default()
            });
            self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size, 0));

            // Snapshot glyph positions so the borrow on `self.layout` ends
            // before `self.cache_glyph` (which needs `&mut self`).
            let glyph_snap: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
                .layout
                .glyphs()
                .iter()
                .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
                .map(|g| (g.key, g.x, g.y, g.width, g.height))
                .collect();

            for (key, x, y, w, h) in glyph_snap {
                let Some(cached) = self.cache_glyph(ctx, font, key) else { continue };
                self.scratch.push(glyph_instance(
                    transform,
                    Rect::new(x, y, w as f32, h as f32),
                    cached,
                    cmd.color.to_array(),
                ));
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        write_viewport_ubo(ctx, ubo);

        let Some(instance_vbo) = self.instances.upload(ctx, "easel text instances", &self.scratch)
        else {
            return;
        };

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad) = self.quad.as_ref() else { return };

        let mut rpass = target.begin_load_pass("easel text pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, 0..self.scratch.len() as u32);
    }

    // ── atlas helpers ──────────────────────────────────────────────────────

    /// Returns the atlas entry for `key`, rasterizing and uploading it on first use.
    fn cache_glyph(
        &mut self,
        ctx: &RenderCtx<'_>,
        font: &fontdue::Font,
        key: GlyphRasterConfig,
    ) -> Option<CachedGlyph> {
        if let Some(cached) = self.glyph_cache.get(&key) {
            return Some(*cached);
        }

        let (metrics, bitmap) = font.rasterize_config(key);
        let (w, h) = (metrics.width as u32, metrics.height as u32);
        if w == 0 || h == 0 {
            return None;
        }

        let Some((gx, gy)) = self.packer.place(w, h) else {
            if !self.warned_atlas_full {
                log::warn!(
                    "TextRenderer: glyph atlas is full ({ATLAS_SIZE}×{ATLAS_SIZE}); \
                     some glyphs will not be rendered"
                );
                self.warned_atlas_full = true;
            }
            return None;
        };

        let atlas = self.atlas_texture.as_ref()?;
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        let atlas_f = ATLAS_SIZE as f32;
        let cached = CachedGlyph {
            uv_min: [gx as f32 / atlas_f, gy as f32 / atlas_f],
            uv_max: [(gx + w) as f32 / atlas_f, (gy + h) as f32 / atlas_f],
        };
        self.glyph_cache.insert(key, cached);
        Some(cached)
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = create_textured_bgl(ctx, "easel text bgl");
        let pipeline = create_quad_pipeline(
            ctx,
            "easel text pipeline",
            include_str!("shaders/text.wgsl"),
            &bgl,
            GlyphInstance::layout(),
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas_texture.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("easel text atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.atlas_texture = Some(texture);
        self.packer = ShelfPacker::new(ATLAS_SIZE);
        self.glyph_cache.clear();
        self.bind_group = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx, "easel text quad"));
        }
        if self.sampler.is_none() {
            self.sampler = Some(create_linear_sampler(ctx, "easel text sampler"));
        }
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(atlas_view) = self.atlas_view.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        let viewport_ubo = create_viewport_ubo(ctx, "easel text viewport ubo");
        let bind_group = create_textured_bind_group(
            ctx,
            "easel text bind group",
            bgl,
            &viewport_ubo,
            atlas_view,
            sampler,
        );

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}

fn glyph_instance(
    transform: &Affine,
    dst: Rect,
    glyph: CachedGlyph,
    color: [f32; 4],
) -> GlyphInstance {
    let (origin, axis_x, axis_y) = transform.map_rect(dst);
    GlyphInstance {
        origin: origin.to_array(),
        axis_x: axis_x.to_array(),
        axis_y: axis_y.to_array(),
        uv_min: glyph.uv_min,
        uv_max: glyph.uv_max,
        color,
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (56 bytes):
///
///  offset  0  origin   [f32; 2]   loc 1
///  offset  8  axis_x   [f32; 2]   loc 2
///  offset 16  axis_y   [f32; 2]   loc 3
///  offset 24  uv_min   [f32; 2]   loc 4
///  offset 32  uv_max   [f32; 2]   loc 5
///  offset 40  color    [f32; 4]   loc 6
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct GlyphInstance {
    origin: [f32; 2],
    axis_x: [f32; 2],
    axis_y: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color:  [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // axis_x
        3 => Float32x2, // axis_y
        4 => Float32x2, // uv_min
        5 => Float32x2, // uv_max
        6 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packer_fills_rows_then_wraps() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(6, 4), Some((1, 1)));
        assert_eq!(p.place(6, 2), Some((8, 1)));
        // 15 + 6 + 1 > 16: next row starts below the tallest glyph (4) + padding.
        assert_eq!(p.place(6, 3), Some((1, 6)));
    }

    #[test]
    fn packer_reports_full_and_stays_full() {
        let mut p = ShelfPacker::new(8);
        assert_eq!(p.place(6, 6), Some((1, 1)));
        assert_eq!(p.place(6, 6), None);
        assert_eq!(p.place(1, 1), None);
    }

    #[test]
    fn glyph_instance_applies_transform() {
        let glyph = CachedGlyph { uv_min: [0.0, 0.0], uv_max: [0.5, 0.5] };
        let inst = glyph_instance(
            &Affine::translation(10.0, 20.0),
            Rect::new(1.0, 2.0, 8.0, 9.0),
            glyph,
            [0.0, 0.0, 0.0, 1.0],
        );
        assert_eq!(inst.origin, [11.0, 22.0]);
        assert_eq!(inst.axis_x, [8.0, 0.0]);
        assert_eq!(inst.axis_y, [0.0, 9.0]);
        assert_eq!(inst.uv_max, [0.5, 0.5]);
    }
}
