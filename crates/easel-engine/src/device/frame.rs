/// One acquired swapchain image plus the encoder recording into it.
///
/// Short-lived: the surface texture blocks acquisition of the next frame
/// until it is presented via `Gpu::submit`.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
