//! Drawing surfaces: physical-size bookkeeping plus resize notification.
//!
//! Zero-size surfaces (Wayland before the compositor assigns a size) are
//! clamped to 1×1 and reported as not yet configured.

use std::sync::Arc;

use winit::window::Window;

use crate::Observable;

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

/// Produced when the surface dimensions or scale factor change.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceResizeEvent {
    pub physical: PhysicalSize,
    pub logical_width: f64,
    pub logical_height: f64,
    pub scale_factor: f64,
}

/// Tracks physical and logical dimensions across resizes and DPI changes.
#[derive(Clone, Debug)]
pub struct SurfaceWrapper {
    physical: PhysicalSize,
    scale_factor: f64,
    /// Whether a non-zero size has been seen at least once.
    configured: bool,
}

impl SurfaceWrapper {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical: clamp_size(physical_width, physical_height),
            scale_factor: sanitize_scale(scale_factor),
            configured: physical_width > 0 && physical_height > 0,
        }
    }

    /// Returns an event only if the clamped dimensions changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let size = clamp_size(physical_width, physical_height);
        if physical_width > 0 && physical_height > 0 {
            self.configured = true;
        }
        if size == self.physical {
            return None;
        }
        self.physical = size;
        Some(self.event())
    }

    /// Moving between displays changes the physical size even when the
    /// logical size stays put.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        self.scale_factor = sanitize_scale(new_scale_factor);
        self.handle_resize(new_physical_width, new_physical_height)
    }

    fn event(&self) -> SurfaceResizeEvent {
        SurfaceResizeEvent {
            physical: self.physical,
            logical_width: self.logical_width(),
            logical_height: self.logical_height(),
            scale_factor: self.scale_factor,
        }
    }

    pub fn physical_size(&self) -> PhysicalSize {
        self.physical
    }

    pub fn logical_width(&self) -> f64 {
        self.physical.width as f64 / self.scale_factor
    }

    pub fn logical_height(&self) -> f64 {
        self.physical.height as f64 / self.scale_factor
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }
}

fn clamp_size(width: u32, height: u32) -> PhysicalSize {
    PhysicalSize {
        width: width.max(MIN_SURFACE_DIMENSION),
        height: height.max(MIN_SURFACE_DIMENSION),
    }
}

fn sanitize_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// A drawing surface handed to the scene manager.
///
/// A surface is drawable once it belongs to a windowing system and has had
/// a non-zero size. Detached surfaces stand in for hosts without a display.
pub struct Surface {
    wrapper: SurfaceWrapper,
    window: Option<Arc<Window>>,
    windowing: bool,
    on_resize: Observable<PhysicalSize>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("size", &self.wrapper.physical_size())
            .field("window", &self.window.is_some())
            .field("drawable", &self.is_drawable())
            .finish()
    }
}

impl Surface {
    pub fn from_window(window: Arc<Window>) -> Self {
        let size = window.inner_size();
        let scale = window.scale_factor();
        Self {
            wrapper: SurfaceWrapper::new(size.width, size.height, scale),
            window: Some(window),
            windowing: true,
            on_resize: Observable::new(),
        }
    }

    /// Offscreen surface of the given size, drawn by a headless backend.
    pub fn headless(width: u32, height: u32) -> Self {
        Self {
            wrapper: SurfaceWrapper::new(width, height, 1.0),
            window: None,
            windowing: true,
            on_resize: Observable::new(),
        }
    }

    /// Surface from a host that has no windowing system; never drawable.
    pub fn detached() -> Self {
        Self {
            wrapper: SurfaceWrapper::new(0, 0, 1.0),
            window: None,
            windowing: false,
            on_resize: Observable::new(),
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.windowing && self.wrapper.is_configured()
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }

    pub fn size(&self) -> PhysicalSize {
        self.wrapper.physical_size()
    }

    pub fn wrapper(&self) -> &SurfaceWrapper {
        &self.wrapper
    }

    /// Observers notified with the new physical size after every change.
    pub fn on_resize(&mut self) -> &mut Observable<PhysicalSize> {
        &mut self.on_resize
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) -> Option<SurfaceResizeEvent> {
        let event = self.wrapper.handle_resize(width, height)?;
        log::debug!(
            "Surface resized to {}x{}",
            event.physical.width,
            event.physical.height
        );
        self.on_resize.notify(&event.physical);
        Some(event)
    }

    pub fn handle_scale_factor_changed(
        &mut self,
        scale_factor: f64,
        width: u32,
        height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let event = self
            .wrapper
            .handle_scale_factor_changed(scale_factor, width, height)?;
        self.on_resize.notify(&event.physical);
        Some(event)
    }
}
