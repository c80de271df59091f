//! Window hosting via winit.
//!
//! [`OrreryApp`] implements winit's [`ApplicationHandler`]: it creates the
//! window on resume, initializes the [`SceneManager`] on it, forwards
//! resizes and pointer input, and draws a frame on every redraw.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use orrery_camera::CameraInput;
use orrery_config::Config;
use orrery_render::Surface;
use tracing::{error, info, instrument};
use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::SceneManager;

/// Pixels of trackpad scroll treated as one wheel notch.
const PIXELS_PER_NOTCH: f32 = 40.0;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Convert a winit scroll delta to wheel notches.
pub fn wheel_notches(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_NOTCH,
    }
}

/// Pointer state between redraws.
#[derive(Debug, Default)]
struct PointerState {
    dragging: bool,
    cursor: Option<Vec2>,
    pending: CameraInput,
}

impl PointerState {
    fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.dragging = state == ElementState::Pressed;
        }
    }

    fn on_cursor_moved(&mut self, position: Vec2) {
        if self.dragging
            && let Some(previous) = self.cursor
        {
            self.pending.add_drag(position - previous);
        }
        self.cursor = Some(position);
    }
}

/// Frame rate reporting, enabled by `debug.show_fps`.
#[derive(Debug)]
struct FpsLog {
    window_start: Instant,
    frames: u32,
}

impl FpsLog {
    fn record(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start).as_secs_f64();
        if elapsed >= 1.0 {
            let fps = self.frames as f64 / elapsed;
            info!(fps, "Frame rate");
            self.window_start = now;
            self.frames = 0;
        }
    }
}

pub struct OrreryApp {
    config: Config,
    follow: Option<String>,
    manager: SceneManager,
    window: Option<Arc<Window>>,
    pointer: PointerState,
    fps: Option<FpsLog>,
}

impl OrreryApp {
    /// `follow` names a body to track as soon as the scene is up.
    pub fn new(config: Config, follow: Option<String>) -> Self {
        let fps = config.debug.show_fps.then(|| FpsLog {
            window_start: Instant::now(),
            frames: 0,
        });
        Self {
            manager: SceneManager::new(config.clone()),
            config,
            follow,
            window: None,
            pointer: PointerState::default(),
            fps,
        }
    }

    pub fn manager(&self) -> &SceneManager {
        &self.manager
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.manager.dispose();
        event_loop.exit();
    }
}

impl ApplicationHandler for OrreryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.manager.init(Some(Surface::from_window(window.clone()))) {
            error!("Scene initialization failed: {e}");
            event_loop.exit();
            return;
        }
        if !self.manager.is_initialized() {
            event_loop.exit();
            return;
        }
        if let Some(name) = self.follow.take() {
            self.manager.follow_planet(&name);
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(new_size) => {
                self.manager.on_resize(new_size.width, new_size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let inner = window.inner_size();
                    self.manager
                        .on_scale_factor_changed(scale_factor, inner.width, inner.height);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer.on_button(button, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer
                    .on_cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.pointer.pending.add_wheel(wheel_notches(delta));
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::KeyR) => self.manager.reset_camera(),
                    PhysicalKey::Code(KeyCode::Escape) => self.shutdown(event_loop),
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => {
                if !self.manager.is_initialized() {
                    return;
                }
                let input = self.pointer.pending.take();
                self.manager.apply_input(&input);

                let now = Instant::now();
                if self.manager.redraw(now).is_some()
                    && let Some(fps) = self.fps.as_mut()
                {
                    fps.record(now);
                }
                if !self.manager.is_running() {
                    error!("Render loop stopped, exiting");
                    self.shutdown(event_loop);
                }
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the orrery until the window closes.
#[instrument(skip_all)]
pub fn run(config: Config, follow: Option<String>) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = OrreryApp::new(config, follow);
    event_loop.run_app(&mut app)
}
