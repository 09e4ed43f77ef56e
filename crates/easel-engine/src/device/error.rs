/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Unrecoverable (out of memory); the runtime shuts down.
    Fatal,
}

impl SurfaceErrorAction {
    /// Classifies a `wgpu::SurfaceError`. Reconfiguration itself is done by
    /// the caller, which owns the surface.
    pub(crate) fn for_error(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigured,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }
}
