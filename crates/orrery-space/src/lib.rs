//! Procedural bodies of the solar-system scene.
//!
//! Each factory adds its meshes, materials, particle systems and lights to a
//! [`Scene`](orrery_render::Scene), installs a before-render observer that
//! animates them, and returns handles to what it created. Calling a factory
//! twice creates two independent bodies.

mod comet;
mod starfield;
mod sun;

pub use comet::{
    COMET_CORE, COMET_TAIL_JITTER, CometHandle, CometOrbit, create_comet, tail_directions,
};
pub use starfield::{STARFIELD_MESH, StarfieldHandle, create_starfield};
pub use sun::{SUN_MESH, SunHandle, SunPulse, create_sun};

#[cfg(test)]
pub(crate) mod test_support {
    use glam::Vec3;
    use orrery_camera::OrbitCamera;
    use orrery_render::Scene;

    pub fn scene() -> Scene {
        Scene::new(OrbitCamera::new(
            std::f32::consts::FRAC_PI_2,
            std::f32::consts::PI / 2.5,
            40.0,
            Vec3::ZERO,
        ))
    }
}
