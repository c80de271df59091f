//! Binds a [`Scene`] to a drawing surface and a render backend.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use orrery_render::{
    FrameInfo, ObserverHandle, PhysicalSize, RenderBackend, RenderError, Scene, Surface,
};
use tracing::{debug, error, info, warn};

/// Renderer surface adapter: owns the surface, the backend and the render
/// loop, and carries resize notifications from the surface to both the
/// backend and the scene camera.
pub struct RendererSurface {
    surface: Surface,
    backend: Box<dyn RenderBackend>,
    render_loop: crate::RenderLoop,
    pending_resize: Rc<Cell<Option<PhysicalSize>>>,
    resize_observer: Option<ObserverHandle>,
    disposed: bool,
}

impl RendererSurface {
    /// Attach to `surface`. Returns `None`, after logging, when there is no
    /// surface or it cannot be drawn to.
    pub fn initialize(surface: Option<Surface>, backend: Box<dyn RenderBackend>) -> Option<Self> {
        let Some(mut surface) = surface else {
            error!("Cannot initialize renderer: no drawing surface available");
            return None;
        };
        if !surface.is_drawable() {
            error!(
                ?surface,
                "Cannot initialize renderer: surface has no windowing system or was never sized"
            );
            return None;
        }

        let pending_resize = Rc::new(Cell::new(None));
        let pending = pending_resize.clone();
        let resize_observer = surface.on_resize().add(move |size: &PhysicalSize| {
            pending.set(Some(*size));
        });

        let size = surface.size();
        info!(
            width = size.width,
            height = size.height,
            "Renderer surface initialized"
        );

        let mut adapter = Self {
            surface,
            backend,
            render_loop: crate::RenderLoop::new(),
            pending_resize,
            resize_observer: Some(resize_observer),
            disposed: false,
        };
        adapter.backend.resize(size);
        Some(adapter)
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Start the continuous draw loop.
    pub fn start(&mut self, now: Instant) {
        if self.disposed {
            warn!("Ignoring start on a disposed renderer surface");
            return;
        }
        self.render_loop.start(now);
        self.request_redraw();
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    pub fn render_loop(&self) -> &crate::RenderLoop {
        &self.render_loop
    }

    /// Forward a host resize to the surface; the backend and camera pick it
    /// up before the next draw.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.surface.handle_resize(width, height);
    }

    pub fn handle_scale_factor_changed(&mut self, scale_factor: f64, width: u32, height: u32) {
        self.surface
            .handle_scale_factor_changed(scale_factor, width, height);
    }

    /// Draw one frame timed by the render loop, then ask the window for
    /// the next redraw. Does nothing once the loop has stopped.
    pub fn redraw(&mut self, scene: &mut Scene, now: Instant) -> Option<FrameInfo> {
        let dt = self.render_loop.tick(now)?;
        let info = self.render(scene, dt);
        self.request_redraw();
        info
    }

    /// Advance the scene by `dt` seconds and draw it. Draw failures are
    /// logged and absorbed; fatal ones stop the loop.
    pub fn render(&mut self, scene: &mut Scene, dt: f32) -> Option<FrameInfo> {
        if self.disposed {
            return None;
        }
        self.apply_pending_resize(scene);

        match scene.render(dt, self.backend.as_mut()) {
            Ok(info) => Some(info),
            Err(RenderError::SurfaceLost) => {
                warn!("Surface lost, reconfiguring");
                self.backend.resize(self.surface.size());
                None
            }
            Err(e) if e.is_fatal() => {
                error!("Render backend failed: {e}");
                self.render_loop.stop();
                None
            }
            Err(e) => {
                warn!("Skipping frame: {e}");
                None
            }
        }
    }

    fn apply_pending_resize(&mut self, scene: &mut Scene) {
        if let Some(size) = self.pending_resize.take() {
            debug!(width = size.width, height = size.height, "Applying surface resize");
            self.backend.resize(size);
            scene.resize(size.width, size.height);
        }
    }

    fn request_redraw(&self) {
        if self.render_loop.is_running()
            && let Some(window) = self.surface.window()
        {
            window.request_redraw();
        }
    }

    /// Stop drawing, unsubscribe from resize notifications and release the
    /// backend. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.resize_observer.take() {
            self.surface.on_resize().remove(handle);
        }
        if self.disposed {
            return;
        }
        self.render_loop.stop();
        self.backend.dispose();
        self.pending_resize.set(None);
        self.disposed = true;
        info!("Renderer surface disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether the adapter is still subscribed to surface resizes.
    pub fn is_subscribed(&self) -> bool {
        self.resize_observer.is_some()
    }
}

impl Drop for RendererSurface {
    fn drop(&mut self) {
        self.dispose();
    }
}
