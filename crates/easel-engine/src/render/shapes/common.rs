//! Shared GPU types and utilities used by all shape renderers.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::render::RenderCtx;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    pub(super) fn new(viewport: Viewport) -> Self {
        Self {
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            _pad: [0.0; 2],
        }
    }
}

/// Returns the `wgpu` minimum binding size for the viewport uniform buffer.
pub(super) fn viewport_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64)
        .expect("ViewportUniform has non-zero size by construction")
}

pub(super) fn viewport_ubo_layout_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: Some(viewport_ubo_min_binding_size()),
        },
        count: None,
    }
}

pub(super) fn create_viewport_ubo(ctx: &RenderCtx<'_>, label: &'static str) -> wgpu::Buffer {
    ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<ViewportUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub(super) fn write_viewport_ubo(ctx: &RenderCtx<'_>, ubo: &wgpu::Buffer) {
    let u = ViewportUniform::new(ctx.viewport);
    ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Unit quad vertex + index buffers shared by instanced renderers.
pub(super) struct QuadBuffers {
    pub vbo: wgpu::Buffer,
    pub ibo: wgpu::Buffer,
}

impl QuadBuffers {
    pub(super) fn new(ctx: &RenderCtx<'_>, label: &'static str) -> Self {
        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self { vbo, ibo }
    }
}

// ── instance buffer ───────────────────────────────────────────────────────

/// Growable per-instance vertex buffer (power-of-two capacity, min 64).
#[derive(Default)]
pub(super) struct InstanceBuffer {
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
}

impl InstanceBuffer {
    /// Uploads `instances`, growing the buffer first if needed.
    pub(super) fn upload<T: Pod>(
        &mut self,
        ctx: &RenderCtx<'_>,
        label: &'static str,
        instances: &[T],
    ) -> Option<&wgpu::Buffer> {
        if instances.len() > self.capacity || self.buffer.is_none() {
            let new_cap = instances.len().next_power_of_two().max(64);
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: (new_cap * std::mem::size_of::<T>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = new_cap;
        }

        let buffer = self.buffer.as_ref()?;
        ctx.queue.write_buffer(buffer, 0, bytemuck::cast_slice(instances));
        Some(buffer)
    }
}

// ── pipeline ──────────────────────────────────────────────────────────────

/// Creates an instanced unit-quad pipeline with premultiplied-alpha blending.
///
/// The shader must expose `vs_main` / `fs_main`; vertex buffer 0 is
/// [`QuadVertex`], buffer 1 is `instance_layout`.
pub(super) fn create_quad_pipeline(
    ctx: &RenderCtx<'_>,
    label: &'static str,
    shader_src: &'static str,
    bind_group_layout: &wgpu::BindGroupLayout,
    instance_layout: wgpu::VertexBufferLayout<'static>,
) -> wgpu::RenderPipeline {
    let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout(), instance_layout],
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Transforms may mirror or rotate quads; never cull.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Linear clamp-to-edge sampler used for glyph and image textures.
pub(super) fn create_linear_sampler(ctx: &RenderCtx<'_>, label: &'static str) -> wgpu::Sampler {
    ctx.device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

/// Bind group layout for `viewport ubo (0) + texture (1) + sampler (2)`.
pub(super) fn create_textured_bgl(
    ctx: &RenderCtx<'_>,
    label: &'static str,
) -> wgpu::BindGroupLayout {
    ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            viewport_ubo_layout_entry(),
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Bind group matching [`create_textured_bgl`].
pub(super) fn create_textured_bind_group(
    ctx: &RenderCtx<'_>,
    label: &'static str,
    layout: &wgpu::BindGroupLayout,
    viewport_ubo: &wgpu::Buffer,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
