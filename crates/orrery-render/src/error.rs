/// Failures while creating or driving a render backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    /// Failed to request GPU device.
    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// Surface lost and could not be recovered.
    #[error("surface lost and could not be recovered")]
    SurfaceLost,

    /// GPU ran out of memory.
    #[error("out of memory")]
    OutOfMemory,

    /// Frame acquisition timed out; the frame is skipped.
    #[error("timeout")]
    Timeout,

    /// The backend was used after `dispose`.
    #[error("render backend already disposed")]
    Disposed,
}

impl RenderError {
    /// Whether the render loop must stop after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::OutOfMemory | RenderError::Disposed)
    }
}
