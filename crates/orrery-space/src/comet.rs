//! Comet on an elliptical path around the sun with a particle tail
//! streaming away from the sun and a ribbon trail behind it.

use std::cell::Cell;
use std::rc::Rc;

use glam::{Vec3, Vec4};
use orrery_config::CometConfig;
use orrery_render::{
    BlendMode, EmitterAnchor, Mesh, MeshId, ObserverHandle, ParticleSystem, ParticleSystemId,
    Scene, StandardMaterial, TrailId, TrailMesh,
};

pub const COMET_CORE: &str = "cometCore";

/// Spread applied either side of the anti-sun direction for the tail.
pub const COMET_TAIL_JITTER: Vec3 = Vec3::new(0.3, 0.1, 0.0);

const CORE_DIAMETER: f32 = 1.2;

/// Elliptical orbit in the XZ plane, advanced a fixed angle per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CometOrbit {
    pub angle: f32,
    pub angular_step: f32,
    pub radius_x: f32,
    pub radius_z: f32,
}

impl CometOrbit {
    pub fn from_config(config: &CometConfig) -> Self {
        Self {
            angle: 0.0,
            angular_step: config.angular_step,
            radius_x: config.radius_x,
            radius_z: config.radius_z,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.angle.cos() * self.radius_x,
            0.0,
            self.angle.sin() * self.radius_z,
        )
    }

    /// Step one frame along the orbit and return the new position.
    pub fn advance(&mut self) -> Vec3 {
        self.angle += self.angular_step;
        self.position()
    }
}

/// Tail emission bounds: the direction away from the sun, spread by
/// [`COMET_TAIL_JITTER`] either side and renormalized.
pub fn tail_directions(comet: Vec3, sun: Vec3) -> (Vec3, Vec3) {
    let away = (comet - sun).normalize_or(Vec3::X);
    (
        (away + COMET_TAIL_JITTER).normalize_or(away),
        (away - COMET_TAIL_JITTER).normalize_or(away),
    )
}

#[derive(Clone, Debug)]
pub struct CometHandle {
    pub root: MeshId,
    pub core: MeshId,
    pub trail: TrailId,
    pub tail: ParticleSystemId,
    pub observer: ObserverHandle,
    orbit: Rc<Cell<CometOrbit>>,
}

impl CometHandle {
    /// Orbit state after the most recent frame.
    pub fn orbit(&self) -> CometOrbit {
        self.orbit.get()
    }
}

/// Build the comet and its per-frame orbit observer. The tail directions are
/// refreshed by the observer, so they are current when the tail spawns.
pub fn create_comet(
    scene: &mut Scene,
    config: &CometConfig,
    sun_position: Vec3,
    seed: u64,
) -> CometHandle {
    let orbit = Rc::new(Cell::new(CometOrbit::from_config(config)));
    let start = orbit.get().position();

    let mut root = Mesh::empty("cometRoot").with_position(start);
    root.visible = false;
    let root = scene.add_mesh(root);

    let core_material = scene.add_material(StandardMaterial::emissive(
        "cometCoreMaterial",
        Vec3::new(0.8, 0.8, 1.0),
    ));
    let mut core = Mesh::sphere(COMET_CORE, CORE_DIAMETER, 16)
        .with_parent(root)
        .with_material(core_material);
    core.visible = false;
    let core = scene.add_mesh(core);

    let trail_material = scene.add_material(
        StandardMaterial::emissive("cometTrailMaterial", Vec3::new(0.6, 0.8, 1.0)).with_alpha(0.5),
    );
    let mut trail = TrailMesh::new(
        "cometTrail",
        core,
        config.trail_length,
        config.trail_diameter,
    );
    trail.material = Some(trail_material);
    let trail = scene.add_trail(trail);

    let mut tail = ParticleSystem::new("cometTail", config.tail_capacity, seed);
    tail.anchor = EmitterAnchor::Mesh(core);
    tail.color1 = Vec4::new(0.7, 0.8, 1.0, 1.0);
    tail.color2 = Vec4::new(0.4, 0.6, 1.0, 1.0);
    tail.color_dead = Vec4::new(0.0, 0.0, 0.2, 0.0);
    tail.min_size = 0.1;
    tail.max_size = 0.4;
    tail.min_lifetime = 0.3;
    tail.max_lifetime = 0.8;
    tail.emit_rate = config.tail_emit_rate;
    tail.blend_mode = BlendMode::Additive;
    tail.gravity = Vec3::ZERO;
    let (d1, d2) = tail_directions(start, sun_position);
    tail.set_directions(d1, d2);
    tail.start();
    let tail = scene.add_particle_system(tail);

    let state = orbit.clone();
    let observer = scene.on_before_render(move |scene, _| {
        let mut current = state.get();
        let position = current.advance();
        state.set(current);

        if let Some(root) = scene.mesh_mut(root) {
            root.position = position;
        }
        if let Some(tail) = scene.particle_system_mut(tail) {
            let (d1, d2) = tail_directions(position, sun_position);
            tail.set_directions(d1, d2);
        }
    });

    log::info!(
        "Created comet on {}x{} orbit",
        config.radius_x,
        config.radius_z
    );

    CometHandle {
        root,
        core,
        trail,
        tail,
        observer,
        orbit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scene;

    #[test]
    fn test_orbit_position_formula() {
        let orbit = CometOrbit {
            angle: 0.7,
            angular_step: 0.001,
            radius_x: 40.0,
            radius_z: 20.0,
        };
        let p = orbit.position();
        assert!((p.x - 0.7_f32.cos() * 40.0).abs() < 1e-5);
        assert_eq!(p.y, 0.0);
        assert!((p.z - 0.7_f32.sin() * 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_n_steps_advance_angle_linearly() {
        let mut orbit = CometOrbit::from_config(&CometConfig::default());
        for _ in 0..500 {
            orbit.advance();
        }
        assert!((orbit.angle - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_tail_points_away_from_sun() {
        let (d1, d2) = tail_directions(Vec3::new(40.0, 0.0, 0.0), Vec3::ZERO);
        assert!((d1.length() - 1.0).abs() < 1e-5);
        assert!((d2.length() - 1.0).abs() < 1e-5);
        assert!(d1.x > 0.9 && d2.x > 0.9);
        assert!(d1.y > 0.0 && d2.y < 0.0);
    }

    #[test]
    fn test_tail_direction_with_comet_on_sun() {
        let (d1, d2) = tail_directions(Vec3::ZERO, Vec3::ZERO);
        assert!(d1.is_finite() && d2.is_finite());
    }

    #[test]
    fn test_comet_moves_each_frame() {
        let mut scene = scene();
        let comet = create_comet(&mut scene, &CometConfig::default(), Vec3::ZERO, 5);
        for _ in 0..10 {
            scene.advance(0.016);
        }
        let orbit = comet.orbit();
        assert!((orbit.angle - 0.01).abs() < 1e-6);
        let root = scene.world_position(comet.root).unwrap();
        assert!((root - orbit.position()).length() < 1e-5);
        assert_eq!(scene.world_position(comet.core), Some(root));
    }

    #[test]
    fn test_tail_directions_refresh_before_spawn() {
        let mut scene = scene();
        let sun = Vec3::new(0.0, 0.0, 0.0);
        let comet = create_comet(&mut scene, &CometConfig::default(), sun, 5);
        scene.advance(0.1);
        let expected = tail_directions(comet.orbit().position(), sun);
        let tail = scene.particle_system(comet.tail).unwrap();
        assert_eq!((tail.direction1, tail.direction2), expected);
        assert!(tail.live_count() > 0);
    }

    #[test]
    fn test_trail_follows_core() {
        let mut scene = scene();
        let comet = create_comet(&mut scene, &CometConfig::default(), Vec3::ZERO, 5);
        for _ in 0..80 {
            scene.advance(0.016);
        }
        let trail = scene.trail(comet.trail).unwrap();
        assert_eq!(trail.len(), 60);
        assert_eq!(trail.head(), scene.world_position(comet.core));
    }

    #[test]
    fn test_tail_and_core_setup() {
        let mut scene = scene();
        let comet = create_comet(&mut scene, &CometConfig::default(), Vec3::ZERO, 5);
        let tail = scene.particle_system(comet.tail).unwrap();
        assert_eq!(tail.capacity, 2000);
        assert_eq!(tail.emit_rate, 300.0);
        assert_eq!(tail.blend_mode, BlendMode::Additive);
        assert_eq!(scene.mesh(comet.core).unwrap().bounding_radius(), 0.6);
        assert_eq!(scene.mesh_by_name(COMET_CORE), Some(comet.core));
    }

    #[test]
    fn test_two_comets_are_independent() {
        let mut scene = scene();
        let a = create_comet(&mut scene, &CometConfig::default(), Vec3::ZERO, 1);
        let b = create_comet(&mut scene, &CometConfig::default(), Vec3::ZERO, 2);
        assert_ne!(a.root, b.root);
        assert_ne!(a.tail, b.tail);
        scene.advance(0.016);
        assert_eq!(a.orbit().angle, b.orbit().angle);
    }
}
