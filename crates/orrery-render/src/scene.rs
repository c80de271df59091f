//! The scene: every object drawn in a frame plus the per-frame update order.

use glam::{Vec3, Vec4};
use orrery_camera::OrbitCamera;

use crate::{
    EmitterAnchor, FrameClock, FrameInfo, GlowLayer, GlowLayerId, Light, LightId, Material,
    MaterialId, Mesh, MeshId, ObserverHandle, ParticleSystem, ParticleSystemId, RenderBackend,
    RenderError, TrailId, TrailMesh,
};

/// Called once per frame before drawing, with mutable access to the scene.
pub type BeforeRenderCallback = Box<dyn FnMut(&mut Scene, &FrameInfo)>;

pub struct Scene {
    /// Background colour, RGBA.
    pub clear_color: Vec4,
    pub camera: OrbitCamera,
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    particle_systems: Vec<ParticleSystem>,
    trails: Vec<TrailMesh>,
    lights: Vec<Light>,
    glow_layers: Vec<GlowLayer>,
    clock: FrameClock,
    before_render: Vec<(ObserverHandle, BeforeRenderCallback)>,
    notifying: bool,
    in_flight: Vec<ObserverHandle>,
    deferred_removals: Vec<ObserverHandle>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("meshes", &self.meshes.len())
            .field("particle_systems", &self.particle_systems.len())
            .field("lights", &self.lights.len())
            .field("before_render", &self.before_render.len())
            .field("frame", &self.clock.frame_count())
            .finish()
    }
}

impl Scene {
    pub fn new(camera: OrbitCamera) -> Self {
        Self {
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            camera,
            meshes: Vec::new(),
            materials: Vec::new(),
            particle_systems: Vec::new(),
            trails: Vec::new(),
            lights: Vec::new(),
            glow_layers: Vec::new(),
            clock: FrameClock::new(),
            before_render: Vec::new(),
            notifying: false,
            in_flight: Vec::new(),
            deferred_removals: Vec::new(),
        }
    }

    // --- Meshes ---

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        if self.mesh_by_name(&mesh.name).is_some() {
            log::debug!("Mesh name '{}' is already in use; lookups return the first", mesh.name);
        }
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0)
    }

    /// First mesh registered under `name`.
    pub fn mesh_by_name(&self, name: &str) -> Option<MeshId> {
        self.meshes.iter().position(|m| m.name == name).map(MeshId)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter().enumerate().map(|(i, m)| (MeshId(i), m))
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Absolute position of a mesh, composing parent offsets.
    pub fn world_position(&self, id: MeshId) -> Option<Vec3> {
        let mut mesh = self.mesh(id)?;
        let mut position = mesh.position;
        // Parent chains longer than the mesh count must contain a cycle.
        for _ in 0..self.meshes.len() {
            let Some(parent) = mesh.parent else {
                return Some(position);
            };
            mesh = self.mesh(parent)?;
            position += mesh.position;
        }
        log::warn!("Parent cycle detected at mesh {:?}", id);
        Some(position)
    }

    // --- Materials ---

    pub fn add_material(&mut self, material: impl Into<Material>) -> MaterialId {
        self.materials.push(material.into());
        MaterialId(self.materials.len() - 1)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    // --- Particle systems ---

    pub fn add_particle_system(&mut self, system: ParticleSystem) -> ParticleSystemId {
        self.particle_systems.push(system);
        ParticleSystemId(self.particle_systems.len() - 1)
    }

    pub fn particle_system(&self, id: ParticleSystemId) -> Option<&ParticleSystem> {
        self.particle_systems.get(id.0)
    }

    pub fn particle_system_mut(&mut self, id: ParticleSystemId) -> Option<&mut ParticleSystem> {
        self.particle_systems.get_mut(id.0)
    }

    pub fn particle_system_by_name(&self, name: &str) -> Option<ParticleSystemId> {
        self.particle_systems
            .iter()
            .position(|p| p.name == name)
            .map(ParticleSystemId)
    }

    /// Live particles across all systems.
    pub fn particle_count(&self) -> usize {
        self.particle_systems.iter().map(|p| p.live_count()).sum()
    }

    // --- Trails ---

    pub fn add_trail(&mut self, trail: TrailMesh) -> TrailId {
        self.trails.push(trail);
        TrailId(self.trails.len() - 1)
    }

    pub fn trail(&self, id: TrailId) -> Option<&TrailMesh> {
        self.trails.get(id.0)
    }

    // --- Lights ---

    pub fn add_light(&mut self, light: impl Into<Light>) -> LightId {
        self.lights.push(light.into());
        LightId(self.lights.len() - 1)
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id.0)
    }

    pub fn light_by_name(&self, name: &str) -> Option<LightId> {
        self.lights.iter().position(|l| l.name() == name).map(LightId)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    // --- Glow ---

    pub fn add_glow_layer(&mut self, layer: GlowLayer) -> GlowLayerId {
        self.glow_layers.push(layer);
        GlowLayerId(self.glow_layers.len() - 1)
    }

    pub fn glow_layer(&self, id: GlowLayerId) -> Option<&GlowLayer> {
        self.glow_layers.get(id.0)
    }

    pub fn glow_layers(&self) -> &[GlowLayer] {
        &self.glow_layers
    }

    // --- Before-render observers ---

    /// Register a callback run every frame before drawing.
    pub fn on_before_render(
        &mut self,
        callback: impl FnMut(&mut Scene, &FrameInfo) + 'static,
    ) -> ObserverHandle {
        let handle = ObserverHandle::next();
        self.before_render.push((handle, Box::new(callback)));
        handle
    }

    /// Unregister a before-render callback. Removal requested while the
    /// callbacks are running takes effect when the pass ends; the removed
    /// callback is not called again in that pass.
    pub fn remove_before_render(&mut self, handle: ObserverHandle) -> bool {
        let before = self.before_render.len();
        self.before_render.retain(|(h, _)| *h != handle);
        if self.before_render.len() != before {
            return true;
        }
        if self.notifying
            && self.in_flight.contains(&handle)
            && !self.deferred_removals.contains(&handle)
        {
            self.deferred_removals.push(handle);
            return true;
        }
        false
    }

    pub fn has_before_render(&self, handle: ObserverHandle) -> bool {
        let pending_removal = self.deferred_removals.contains(&handle);
        !pending_removal
            && (self.before_render.iter().any(|(h, _)| *h == handle)
                || self.in_flight.contains(&handle))
    }

    pub fn before_render_count(&self) -> usize {
        let in_flight = self.in_flight.len() - self.deferred_removals.len();
        self.before_render.len() + in_flight
    }

    fn notify_before_render(&mut self, info: &FrameInfo) {
        let mut active = std::mem::take(&mut self.before_render);
        self.in_flight = active.iter().map(|(h, _)| *h).collect();
        self.notifying = true;

        for (handle, callback) in active.iter_mut() {
            if self.deferred_removals.contains(handle) {
                continue;
            }
            callback(self, info);
        }

        self.notifying = false;
        self.in_flight.clear();
        let removed = std::mem::take(&mut self.deferred_removals);
        active.retain(|(h, _)| !removed.contains(h));
        let added = std::mem::replace(&mut self.before_render, active);
        self.before_render.extend(added);
    }

    // --- Frame ---

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Run one frame of updates without drawing: clock, camera transition,
    /// before-render callbacks, trails, then particle systems.
    pub fn advance(&mut self, dt: f32) -> FrameInfo {
        let info = self.clock.tick(dt);
        self.camera.advance_transition(info.delta);
        self.notify_before_render(&info);

        let trail_sources: Vec<Option<Vec3>> = self
            .trails
            .iter()
            .map(|t| self.world_position(t.source))
            .collect();
        for (trail, source) in self.trails.iter_mut().zip(trail_sources) {
            if let Some(position) = source {
                trail.update(position);
            }
        }

        let origins: Vec<Vec3> = self
            .particle_systems
            .iter()
            .map(|p| match p.anchor {
                EmitterAnchor::Fixed(position) => position,
                EmitterAnchor::Mesh(mesh) => self.world_position(mesh).unwrap_or(Vec3::ZERO),
            })
            .collect();
        for (system, origin) in self.particle_systems.iter_mut().zip(origins) {
            system.update(info.delta, origin);
        }

        info
    }

    /// Advance one frame and hand the scene to the backend.
    pub fn render(
        &mut self,
        dt: f32,
        backend: &mut dyn RenderBackend,
    ) -> Result<FrameInfo, RenderError> {
        let info = self.advance(dt);
        backend.draw(self)?;
        Ok(info)
    }

    /// Propagate a surface resize to the camera projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect_ratio(width, height);
    }
}
