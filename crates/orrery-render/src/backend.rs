//! Backends that turn a [`Scene`] into pixels.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use glam::{Vec3, Vec4};
use winit::window::Window;

use crate::{PhysicalSize, RenderContext, RenderError, Scene, init_render_context_blocking};

/// Consumes the scene once per frame.
pub trait RenderBackend {
    fn resize(&mut self, size: PhysicalSize);
    fn draw(&mut self, scene: &Scene) -> Result<(), RenderError>;
    /// Release GPU resources. Drawing afterwards fails with
    /// [`RenderError::Disposed`].
    fn dispose(&mut self);
}

/// Shared backends let the host keep inspecting a backend it handed over.
impl<B: RenderBackend + ?Sized> RenderBackend for Rc<RefCell<B>> {
    fn resize(&mut self, size: PhysicalSize) {
        self.borrow_mut().resize(size);
    }

    fn draw(&mut self, scene: &Scene) -> Result<(), RenderError> {
        self.borrow_mut().draw(scene)
    }

    fn dispose(&mut self) {
        self.borrow_mut().dispose();
    }
}

/// What the headless backend saw in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRecord {
    pub frame: u64,
    pub size: PhysicalSize,
    pub clear_color: Vec4,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub visible_meshes: usize,
    pub particles: usize,
}

/// Backend without a GPU. Records a summary of the last drawn frame.
#[derive(Debug)]
pub struct HeadlessBackend {
    size: PhysicalSize,
    frames_drawn: u64,
    last_frame: Option<FrameRecord>,
    disposed: bool,
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: PhysicalSize {
                width: width.max(1),
                height: height.max(1),
            },
            frames_drawn: 0,
            last_frame: None,
            disposed: false,
        }
    }

    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn last_frame(&self) -> Option<&FrameRecord> {
        self.last_frame.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl RenderBackend for HeadlessBackend {
    fn resize(&mut self, size: PhysicalSize) {
        self.size = size;
    }

    fn draw(&mut self, scene: &Scene) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        self.frames_drawn += 1;
        self.last_frame = Some(FrameRecord {
            frame: scene.clock().frame_count(),
            size: self.size,
            clear_color: scene.clear_color,
            camera_position: scene.camera.position(),
            camera_target: scene.camera.target,
            visible_meshes: scene.meshes().filter(|(_, m)| m.visible).count(),
            particles: scene.particle_count(),
        });
        Ok(())
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }
}

/// Presents to a window through wgpu. Clears to the scene's clear colour;
/// geometry shading belongs to the external shader programs.
pub struct WgpuBackend {
    context: Option<RenderContext>,
}

impl WgpuBackend {
    pub fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderError> {
        let context = init_render_context_blocking(window, vsync)?;
        Ok(Self {
            context: Some(context),
        })
    }

    pub fn context(&self) -> Option<&RenderContext> {
        self.context.as_ref()
    }
}

impl RenderBackend for WgpuBackend {
    fn resize(&mut self, size: PhysicalSize) {
        if let Some(context) = self.context.as_mut() {
            context.resize(size.width, size.height);
        }
    }

    fn draw(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let context = self.context.as_ref().ok_or(RenderError::Disposed)?;
        let c = scene.clear_color.as_dvec4();
        context.clear_and_present(wgpu::Color {
            r: c.x,
            g: c.y,
            b: c.z,
            a: c.w,
        })
    }

    fn dispose(&mut self) {
        if self.context.take().is_some() {
            log::info!("GPU context released");
        }
    }
}
