//! Scene orchestrator: builds the solar-system scene on a surface and
//! exposes camera navigation, per-planet lighting and lifecycle control.

use std::cell::RefCell;
use std::time::Instant;

use glam::{Mat4, Vec3, Vec4};
use orrery_camera::{CameraInput, OrbitCamera, OrbitLimits};
use orrery_config::{CameraConfig, Config, LightingConfig};
use orrery_lighting::{LightingRegistry, ShadowCaster, ShadowConfig, ShadowMapHandle};
use orrery_render::{
    FrameInfo, HeadlessBackend, ObserverHandle, RenderBackend, RenderError, Scene, Surface,
    WgpuBackend,
};
use orrery_space::{
    CometHandle, StarfieldHandle, SunHandle, create_comet, create_starfield, create_sun,
};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::navigation::{CameraNavigator, NavigationSettings, NavigationState};
use crate::ready::{ReadyFuture, ReadySignal};
use crate::surface::RendererSurface;

/// Background colour of deep space.
pub const CLEAR_COLOR: Vec4 = Vec4::new(0.02, 0.02, 0.07, 1.0);

/// Errors from scene lifecycle operations.
#[derive(Debug, Error)]
pub enum SceneError {
    /// `init` was called while a scene is live.
    #[error("scene is already initialized")]
    AlreadyInitialized,
}

/// Bodies created at init, kept for inspection.
#[derive(Debug)]
pub struct SceneBodies {
    pub starfield: StarfieldHandle,
    pub sun: SunHandle,
    pub comet: Option<CometHandle>,
}

struct LiveScene {
    scene: Scene,
    surface: RendererSurface,
    navigator: CameraNavigator,
    lighting: LightingRegistry,
    bodies: SceneBodies,
    external_observer: Option<ObserverHandle>,
}

thread_local! {
    static INSTANCE: RefCell<SceneManager> = RefCell::new(SceneManager::new(Config::default()));
}

/// Owns the live scene, if any, plus the readiness signal.
pub struct SceneManager {
    config: Config,
    seed: u64,
    live: Option<LiveScene>,
    ready: ReadySignal,
}

impl SceneManager {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            seed: 0x5eed_0f_0e1e,
            live: None,
            ready: ReadySignal::new(),
        }
    }

    /// Seed for the particle systems' random streams.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run `f` against this thread's shared manager, created with default
    /// configuration on first use. Must not be called from inside `f`.
    pub fn with_instance<R>(f: impl FnOnce(&mut SceneManager) -> R) -> R {
        INSTANCE.with(|instance| f(&mut instance.borrow_mut()))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // --- Lifecycle ---

    /// Build the scene on `surface`, drawing through wgpu when the surface
    /// has a window and headlessly otherwise.
    ///
    /// A missing or undrawable surface is logged and leaves the manager
    /// uninitialized without failing.
    pub fn init(&mut self, surface: Option<Surface>) -> Result<(), SceneError> {
        if self.live.is_some() {
            return Err(SceneError::AlreadyInitialized);
        }
        let backend: Result<Box<dyn RenderBackend>, RenderError> = match surface.as_ref() {
            Some(s) if s.is_drawable() => match s.window() {
                Some(window) => WgpuBackend::new(window.clone(), self.config.window.vsync)
                    .map(|backend| Box::new(backend) as Box<dyn RenderBackend>),
                None => Ok(Box::new(HeadlessBackend::new(
                    s.size().width,
                    s.size().height,
                ))),
            },
            _ => Ok(Box::new(HeadlessBackend::new(1, 1))),
        };
        self.init_with_created_backend(surface, backend)
    }

    /// A backend that failed to come up means the surface cannot be drawn
    /// to: logged, and the manager stays uninitialized.
    fn init_with_created_backend(
        &mut self,
        surface: Option<Surface>,
        backend: Result<Box<dyn RenderBackend>, RenderError>,
    ) -> Result<(), SceneError> {
        match backend {
            Ok(backend) => self.init_with_backend(surface, backend),
            Err(e) => {
                error!("Cannot create a renderer for the surface: {e}");
                Ok(())
            }
        }
    }

    /// Build the scene on `surface`, drawing through `backend`.
    #[instrument(skip_all)]
    pub fn init_with_backend(
        &mut self,
        surface: Option<Surface>,
        backend: Box<dyn RenderBackend>,
    ) -> Result<(), SceneError> {
        if self.live.is_some() {
            return Err(SceneError::AlreadyInitialized);
        }
        let Some(mut surface) = RendererSurface::initialize(surface, backend) else {
            return Ok(());
        };

        let mut scene = Scene::new(orbit_camera(&self.config.camera));
        scene.clear_color = CLEAR_COLOR;
        let size = surface.surface().size();
        scene.resize(size.width, size.height);

        let starfield = create_starfield(&mut scene, &self.config.starfield);
        let sun = create_sun(&mut scene, &self.config.sun, self.seed);
        let sun_position = scene
            .world_position(sun.core)
            .unwrap_or_else(|| Vec3::from_array(self.config.sun.position));
        let comet = self.config.comet.enabled.then(|| {
            create_comet(
                &mut scene,
                &self.config.comet,
                sun_position,
                self.seed.wrapping_add(1),
            )
        });
        let lighting = LightingRegistry::new(
            sun_position,
            self.config.lighting.intensity,
            shadow_config(&self.config.lighting),
        );

        surface.start(Instant::now());
        info!(
            meshes = scene.mesh_count(),
            comet = comet.is_some(),
            "Scene initialized"
        );

        self.live = Some(LiveScene {
            scene,
            surface,
            navigator: CameraNavigator::new(NavigationSettings::from_config(&self.config.camera)),
            lighting,
            bodies: SceneBodies {
                starfield,
                sun,
                comet,
            },
            external_observer: None,
        });
        self.ready.resolve();
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.live.is_some()
    }

    /// Tear the scene down. Calling it again, or before `init`, does nothing.
    #[instrument(skip_all)]
    pub fn dispose(&mut self) {
        let Some(mut live) = self.live.take() else {
            debug!("Dispose called with no live scene");
            return;
        };
        live.navigator.stop_following(&mut live.scene);
        if let Some(handle) = live.external_observer.take() {
            live.scene.remove_before_render(handle);
        }
        live.surface.dispose();
        live.lighting.clear();
        info!("Scene disposed");
    }

    // --- Readiness ---

    /// Completes once the first `init` succeeds.
    pub fn ready(&self) -> ReadyFuture {
        self.ready.wait()
    }

    /// Wait for readiness.
    pub async fn wait_until_ready(&self) {
        self.ready.wait().await;
    }

    // --- Frame driving ---

    /// Replace the external per-frame callback.
    pub fn register_before_render(
        &mut self,
        callback: impl FnMut(&mut Scene, &FrameInfo) + 'static,
    ) -> Option<ObserverHandle> {
        let Some(live) = self.live_mut("register a before-render callback") else {
            return None;
        };
        if let Some(previous) = live.external_observer.take() {
            live.scene.remove_before_render(previous);
        }
        let handle = live.scene.on_before_render(callback);
        live.external_observer = Some(handle);
        Some(handle)
    }

    /// Advance and draw one frame of `dt` seconds.
    pub fn frame(&mut self, dt: f32) -> Option<FrameInfo> {
        let live = self.live.as_mut()?;
        live.surface.render(&mut live.scene, dt)
    }

    /// Draw the frame for a window redraw, timed by the render loop.
    pub fn redraw(&mut self, now: Instant) -> Option<FrameInfo> {
        let live = self.live.as_mut()?;
        live.surface.redraw(&mut live.scene, now)
    }

    /// Whether the render loop is still producing frames.
    pub fn is_running(&self) -> bool {
        self.live.as_ref().is_some_and(|l| l.surface.is_running())
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if let Some(live) = self.live.as_mut() {
            live.surface.handle_resize(width, height);
        }
    }

    pub fn on_scale_factor_changed(&mut self, scale_factor: f64, width: u32, height: u32) {
        if let Some(live) = self.live.as_mut() {
            live.surface
                .handle_scale_factor_changed(scale_factor, width, height);
        }
    }

    /// Apply pointer input to the orbit camera.
    pub fn apply_input(&mut self, input: &CameraInput) {
        if input.is_empty() {
            return;
        }
        if let Some(live) = self.live_mut("apply camera input") {
            live.scene.camera.apply_input(input);
        }
    }

    // --- Camera navigation ---

    pub fn zoom_to(&mut self, name: &str) {
        if let Some(live) = self.live_mut("zoom to a body") {
            live.navigator.zoom_to(&mut live.scene, name);
        }
    }

    pub fn follow_planet(&mut self, name: &str) {
        if let Some(live) = self.live_mut("follow a body") {
            live.navigator.follow_planet(&mut live.scene, name);
        }
    }

    pub fn reset_camera(&mut self) {
        if let Some(live) = self.live_mut("reset the camera") {
            live.navigator.reset_camera(&mut live.scene);
        }
    }

    pub fn navigation_state(&self) -> Option<NavigationState> {
        self.live
            .as_ref()
            .map(|live| live.navigator.state(&live.scene))
    }

    // --- Lighting ---

    /// Give `entity` a directional light and shadow caster from the sun.
    /// Returns `true` if a new entry was created.
    pub fn ensure_light(&mut self, entity: &str, position: Vec3) -> bool {
        match self.live_mut("create a light") {
            Some(live) => live.lighting.ensure_light(entity, position),
            None => false,
        }
    }

    /// Like [`ensure_light`](Self::ensure_light), using the current
    /// position of the mesh named `entity`.
    pub fn ensure_light_for_mesh(&mut self, entity: &str) -> bool {
        let Some(live) = self.live_mut("create a light") else {
            return false;
        };
        let Some(position) = live
            .scene
            .mesh_by_name(entity)
            .and_then(|mesh| live.scene.world_position(mesh))
        else {
            warn!("Cannot light \"{entity}\": no mesh with that name");
            return false;
        };
        live.lighting.ensure_light(entity, position)
    }

    pub fn shadow_caster(&self, entity: &str) -> Option<&ShadowCaster> {
        self.live.as_ref()?.lighting.shadow_caster(entity)
    }

    pub fn light_transform(&self, entity: &str) -> Option<Mat4> {
        self.live.as_ref()?.lighting.light_transform(entity)
    }

    pub fn shadow_map(&self, entity: &str) -> Option<ShadowMapHandle> {
        self.live.as_ref()?.lighting.shadow_map(entity)
    }

    pub fn lighting(&self) -> Option<&LightingRegistry> {
        self.live.as_ref().map(|live| &live.lighting)
    }

    // --- Accessors ---

    pub fn scene(&self) -> Option<&Scene> {
        self.live.as_ref().map(|live| &live.scene)
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.live.as_mut().map(|live| &mut live.scene)
    }

    pub fn bodies(&self) -> Option<&SceneBodies> {
        self.live.as_ref().map(|live| &live.bodies)
    }

    pub fn navigator(&self) -> Option<&CameraNavigator> {
        self.live.as_ref().map(|live| &live.navigator)
    }

    pub fn surface(&self) -> Option<&RendererSurface> {
        self.live.as_ref().map(|live| &live.surface)
    }

    fn live_mut(&mut self, action: &str) -> Option<&mut LiveScene> {
        if self.live.is_none() {
            error!("Cannot {action}: scene is not initialized");
        }
        self.live.as_mut()
    }
}

impl Drop for SceneManager {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn orbit_camera(config: &CameraConfig) -> OrbitCamera {
    let limits = OrbitLimits {
        min_radius: config.min_radius,
        max_radius: config.max_radius,
        ..OrbitLimits::default()
    };
    OrbitCamera::new(
        config.alpha,
        config.beta,
        config.default_radius,
        Vec3::from_array(config.default_target),
    )
    .with_limits(limits)
    .with_wheel_delta_percentage(config.wheel_delta_percentage)
    .with_angular_sensitivity(config.angular_sensitivity)
}

fn shadow_config(config: &LightingConfig) -> ShadowConfig {
    ShadowConfig {
        resolution: config.shadow_resolution,
        bias: config.bias,
        normal_bias: config.normal_bias,
        blur_kernel: config.blur_kernel,
        half_extent: config.shadow_half_extent,
    }
}
