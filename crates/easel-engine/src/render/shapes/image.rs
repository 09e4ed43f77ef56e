use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::coords::{Affine, Rect};
use crate::paint::{Image, ImageId};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{
    create_linear_sampler, create_quad_pipeline, create_textured_bgl, create_textured_bind_group,
    create_viewport_ubo, write_viewport_ubo, InstanceBuffer, QuadBuffers,
};

/// GPU copy of one [`Image`].
struct ImageTexture {
    // Kept alive for `view`.
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    bind_group: Option<wgpu::BindGroup>,
}

/// Renderer for `DrawCmd::Image`.
///
/// Each distinct [`ImageId`] is uploaded once into an `Rgba8UnormSrgb`
/// texture and reused on later frames. Images are drawn in paint order,
/// one instanced draw per item.
#[derive(Default)]
pub struct ImageRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    textures: HashMap<ImageId, ImageTexture>,

    quad: Option<QuadBuffers>,
    instances: InstanceBuffer,
    scratch: Vec<ImageInstance>,
    batches: Vec<ImageId>,
}

impl ImageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every `DrawCmd::Image` in `draw_list`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let cmds: Vec<(Image, Rect, Affine)> = draw_list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Image(cmd) => Some((cmd.image.clone(), cmd.dest, item.transform)),
                _ => None,
            })
            .collect();

        if cmds.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_shared(ctx);

        self.scratch.clear();
        self.batches.clear();
        for (image, dest, transform) in &cmds {
            let Some(inst) = image_instance(*dest, transform) else { continue };
            self.ensure_texture(ctx, image);
            self.scratch.push(inst);
            self.batches.push(image.id());
        }

        if self.scratch.is_empty() {
            return;
        }

        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        write_viewport_ubo(ctx, ubo);

        let Some(instance_vbo) =
            self.instances.upload(ctx, "easel image instances", &self.scratch)
        else {
            return;
        };

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(quad) = self.quad.as_ref() else { return };

        let mut rpass = target.begin_load_pass("easel image pass");
        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);

        for (i, id) in self.batches.iter().enumerate() {
            let Some(bind_group) = self.textures.get(id).and_then(|t| t.bind_group.as_ref())
            else {
                continue;
            };
            let i = i as u32;
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.draw_indexed(0..6, 0, i..i + 1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = create_textured_bgl(ctx, "easel image bgl");
        let pipeline = create_quad_pipeline(
            ctx,
            "easel image pipeline",
            include_str!("shaders/image.wgsl"),
            &bgl,
            ImageInstance::layout(),
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.viewport_ubo = None;

        // Bind groups reference the old layout.
        for tex in self.textures.values_mut() {
            tex.bind_group = None;
        }
    }

    fn ensure_shared(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx, "easel image quad"));
        }
        if self.sampler.is_none() {
            self.sampler = Some(create_linear_sampler(ctx, "easel image sampler"));
        }
        if self.viewport_ubo.is_none() {
            self.viewport_ubo = Some(create_viewport_ubo(ctx, "easel image viewport ubo"));
            for tex in self.textures.values_mut() {
                tex.bind_group = None;
            }
        }
    }

    /// Uploads `image` on first sight and (re)creates its bind group if needed.
    fn ensure_texture(&mut self, ctx: &RenderCtx<'_>, image: &Image) {
        let tex = self
            .textures
            .entry(image.id())
            .or_insert_with(|| upload_image(ctx, image));

        if tex.bind_group.is_some() {
            return;
        }
        let (Some(bgl), Some(ubo), Some(sampler)) = (
            self.bind_group_layout.as_ref(),
            self.viewport_ubo.as_ref(),
            self.sampler.as_ref(),
        ) else {
            return;
        };

        tex.bind_group = Some(create_textured_bind_group(
            ctx,
            "easel image bind group",
            bgl,
            ubo,
            &tex.view,
            sampler,
        ));
    }
}

fn upload_image(ctx: &RenderCtx<'_>, image: &Image) -> ImageTexture {
    let size = wgpu::Extent3d {
        width: image.width(),
        height: image.height(),
        depth_or_array_layers: 1,
    };

    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("easel image texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.pixels(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width()),
            rows_per_image: Some(image.height()),
        },
        size,
    );

    log::debug!(
        "ImageRenderer: uploaded image {:?} ({}x{})",
        image.id(),
        image.width(),
        image.height()
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    ImageTexture { _texture: texture, view, bind_group: None }
}

fn image_instance(dest: Rect, transform: &Affine) -> Option<ImageInstance> {
    if dest.is_empty() || !dest.is_finite() {
        return None;
    }
    let (origin, axis_x, axis_y) = transform.map_rect(dest);
    Some(ImageInstance {
        origin: origin.to_array(),
        axis_x: axis_x.to_array(),
        axis_y: axis_y.to_array(),
    })
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct ImageInstance {
    origin: [f32; 2],
    axis_x: [f32; 2],
    axis_y: [f32; 2],
}

impl ImageInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // axis_x
        3 => Float32x2  // axis_y
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ImageInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotated_image_quad_spans_rotated_axes() {
        let t = Affine::rotation_degrees(90.0).then(Affine::translation(200.0, 100.0));
        let inst = image_instance(Rect::new(-50.0, -50.0, 100.0, 100.0), &t).expect("visible");

        let close = |a: [f32; 2], b: [f32; 2]| (a[0] - b[0]).abs() < 1e-3 && (a[1] - b[1]).abs() < 1e-3;
        assert!(close(inst.origin, [250.0, 50.0]), "{:?}", inst.origin);
        assert!(close(inst.axis_x, [0.0, 100.0]), "{:?}", inst.axis_x);
        assert!(close(inst.axis_y, [-100.0, 0.0]), "{:?}", inst.axis_y);
    }

    #[test]
    fn empty_destination_is_skipped() {
        assert!(image_instance(Rect::new(0.0, 0.0, 0.0, 10.0), &Affine::IDENTITY).is_none());
    }
}
