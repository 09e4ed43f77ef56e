use bytemuck::{Pod, Zeroable};

use crate::coords::Affine;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::shapes::RectCmd;
use crate::scene::{DrawCmd, DrawList};

use super::common::{
    create_quad_pipeline, create_viewport_ubo, viewport_ubo_layout_entry, write_viewport_ubo,
    InstanceBuffer, QuadBuffers,
};

/// Rectangle renderer (solid fill).
///
/// Geometry is provided as logical pixels and transformed on the CPU; the
/// vertex shader converts to NDC using the viewport.
/// Color is expected to be linear premultiplied RGBA (`paint::Color`).
#[derive(Default)]
pub struct RectRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad: Option<QuadBuffers>,
    instances: InstanceBuffer,
    scratch: Vec<RectInstance>,
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every `DrawCmd::Rect` in `draw_list`, in paint order, in one pass.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        self.scratch.clear();
        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Rect(cmd) = &item.cmd else { continue };
            if let Some(inst) = rect_instance(cmd, &item.transform) {
                self.scratch.push(inst);
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx, "easel rect quad"));
        }

        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        write_viewport_ubo(ctx, ubo);

        let Some(instance_vbo) = self.instances.upload(ctx, "easel rect instances", &self.scratch)
        else {
            return;
        };

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad) = self.quad.as_ref() else { return };

        let mut rpass = target.begin_load_pass("easel rect pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, 0..self.scratch.len() as u32);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("easel rect bgl"),
                    entries: &[viewport_ubo_layout_entry()],
                });

        let pipeline = create_quad_pipeline(
            ctx,
            "easel rect pipeline",
            include_str!("shaders/rect.wgsl"),
            &bind_group_layout,
            RectInstance::layout(),
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = create_viewport_ubo(ctx, "easel rect viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel rect bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}

/// Builds the GPU instance for one rect command, or `None` when nothing
/// would be visible (zero area, non-finite geometry).
fn rect_instance(cmd: &RectCmd, transform: &Affine) -> Option<RectInstance> {
    let r = cmd.rect.normalized();
    if r.is_empty() || !r.is_finite() {
        return None;
    }

    let (origin, axis_x, axis_y) = transform.map_rect(r);
    Some(RectInstance {
        origin: origin.to_array(),
        axis_x: axis_x.to_array(),
        axis_y: axis_y.to_array(),
        color: cmd.color.to_array(),
    })
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    axis_x: [f32; 2],
    axis_y: [f32; 2],
    color: [f32; 4],
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // axis_x
        3 => Float32x2, // axis_y
        4 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::Color;

    fn cmd(rect: Rect) -> RectCmd {
        RectCmd { rect, color: Color::BLACK }
    }

    #[test]
    fn zero_area_rect_is_skipped() {
        assert!(rect_instance(&cmd(Rect::from_ltrb(5.0, 5.0, 5.0, 5.0)), &Affine::IDENTITY).is_none());
    }

    #[test]
    fn inverted_rect_fills_spanned_area() {
        let inst = rect_instance(&cmd(Rect::from_ltrb(50.0, 60.0, 10.0, 10.0)), &Affine::IDENTITY)
            .expect("visible");
        assert_eq!(inst.origin, [10.0, 10.0]);
        assert_eq!(inst.axis_x, [40.0, 0.0]);
        assert_eq!(inst.axis_y, [0.0, 50.0]);
        assert_eq!(inst.color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn transform_is_baked_into_instance() {
        let inst = rect_instance(
            &cmd(Rect::new(1.0, 2.0, 3.0, 4.0)),
            &Affine::translation(100.0, 200.0),
        )
        .expect("visible");
        assert_eq!(inst.origin, [101.0, 202.0]);
        assert_eq!(inst.axis_x, [3.0, 0.0]);
        assert_eq!(inst.axis_y, [0.0, 4.0]);
    }

    #[test]
    fn non_finite_rect_is_skipped() {
        assert!(rect_instance(&cmd(Rect::new(f32::NAN, 0.0, 1.0, 1.0)), &Affine::IDENTITY).is_none());
    }
}
