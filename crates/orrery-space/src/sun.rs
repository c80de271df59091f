//! The sun: emissive core, plasma shell, particle surface and flares,
//! point light plus ambient fill, and an optional glow layer.

use std::f32::consts::TAU;

use glam::{Vec3, Vec4};
use orrery_config::SunConfig;
use orrery_render::{
    BlendMode, BloomConfig, Emitter, EmitterAnchor, GlowLayer, GlowLayerId, HemisphericLight,
    LightId, MaterialId, Mesh, MeshId, ObserverHandle, ParticleSystem, ParticleSystemId,
    PointLight, Scene, ShaderMaterial, ShaderMaterialOptions, StandardMaterial,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const SUN_MESH: &str = "Sun";

/// Plasma shell diameter relative to the core.
const PLASMA_SCALE: f32 = 1.3;
const AMBIENT_INTENSITY: f32 = 0.2;

/// Surface particle colour over life: fade in, hold, fade out.
const SURFACE_GRADIENT: [(f32, [f32; 4]); 4] = [
    (0.0, [0.8509, 0.4784, 0.1019, 0.0]),
    (0.4, [0.6259, 0.3056, 0.0619, 0.5]),
    (0.5, [0.6039, 0.2887, 0.0579, 0.5]),
    (1.0, [0.3207, 0.0713, 0.0075, 0.0]),
];

/// Emissive intensity oscillating with scene time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunPulse {
    pub base: f32,
    pub amplitude: f32,
    /// Radians per second.
    pub speed: f32,
}

impl SunPulse {
    pub fn from_config(config: &SunConfig) -> Self {
        Self {
            base: config.pulse_base,
            amplitude: config.pulse_amplitude,
            speed: config.pulse_speed,
        }
    }

    pub fn intensity_at(&self, elapsed_secs: f32) -> f32 {
        self.base + self.amplitude * (elapsed_secs * self.speed).sin()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SunHandle {
    pub core: MeshId,
    pub core_material: MaterialId,
    pub plasma: MeshId,
    pub plasma_material: MaterialId,
    pub light: LightId,
    pub ambient: LightId,
    pub surface_particles: Option<ParticleSystemId>,
    pub flares: Option<ParticleSystemId>,
    pub glow: Option<GlowLayerId>,
    pub pulse: SunPulse,
    pub observer: ObserverHandle,
}

/// Build the sun at `config.position`. `seed` drives the particle systems
/// and flare jitter.
pub fn create_sun(scene: &mut Scene, config: &SunConfig, seed: u64) -> SunHandle {
    let position = Vec3::from(config.position);

    let core_material = scene.add_material(StandardMaterial::emissive(
        "sunMaterial",
        Vec3::from(config.emissive_color),
    ));
    let core = scene.add_mesh(
        Mesh::sphere(SUN_MESH, config.diameter, 64)
            .with_position(position)
            .with_material(core_material),
    );

    let plasma_material = scene.add_material(plasma_material(config));
    let plasma = scene.add_mesh(
        Mesh::sphere("sunPlasma", config.diameter * PLASMA_SCALE, 32)
            .with_parent(core)
            .with_material(plasma_material),
    );

    let light = scene.add_light(PointLight::new("SunLight", position, config.light_intensity));
    let ambient = scene.add_light(HemisphericLight::new(
        "ambientLight",
        Vec3::Y,
        AMBIENT_INTENSITY,
    ));

    let surface_particles = config
        .surface_particles
        .then(|| scene.add_particle_system(surface_particle_system(core, config, seed)));
    let flares = config.flares.then(|| {
        scene.add_particle_system(flare_particle_system(core, config, seed.wrapping_add(1)))
    });

    let glow = config.glow.then(|| {
        let glow_material = scene.add_material(StandardMaterial::emissive(
            "sunGlowMaterial",
            Vec3::from(config.emissive_color).normalize_or(Vec3::ONE),
        ));
        let mut layer = GlowLayer::new("sunGlow", config.glow_intensity);
        layer.bloom = BloomConfig {
            intensity: config.glow_intensity,
            threshold: 0.8,
            ..BloomConfig::default()
        };
        layer.reference_mesh_with_material(core, glow_material);
        scene.add_glow_layer(layer)
    });

    let pulse = SunPulse::from_config(config);
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(2));
    let observer = scene.on_before_render(move |scene, frame| {
        if let Some(core) = scene.material_mut(core_material).and_then(|m| m.as_standard_mut()) {
            core.emissive_intensity = pulse.intensity_at(frame.elapsed);
        }
        if let Some(shader) = scene.material_mut(plasma_material).and_then(|m| m.as_shader_mut())
        {
            shader.set_float("time", frame.elapsed);
        }
        if let Some(flares) = flares.and_then(|id| scene.particle_system_mut(id)) {
            let jitter = Vec3::new(
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
            )
            .normalize_or(Vec3::Y);
            flares.set_directions(jitter, jitter);
        }
    });

    log::info!(
        "Created sun at {:?} (flares: {}, glow: {})",
        position,
        flares.is_some(),
        glow.is_some()
    );

    SunHandle {
        core,
        core_material,
        plasma,
        plasma_material,
        light,
        ambient,
        surface_particles,
        flares,
        glow,
        pulse,
        observer,
    }
}

fn plasma_material(config: &SunConfig) -> ShaderMaterial {
    let mut material = ShaderMaterial::new(
        "solarPlasma",
        config.plasma_shader.clone(),
        ShaderMaterialOptions::new(
            &["position", "normal", "uv"],
            &["world", "worldViewProjection", "time"],
        ),
    );
    material.alpha = 0.8;
    material.blend = BlendMode::Alpha;
    material.back_face_culling = false;
    material.set_float("time", 0.0);
    material
}

fn surface_particle_system(core: MeshId, config: &SunConfig, seed: u64) -> ParticleSystem {
    let mut ps = ParticleSystem::new("surfaceParticles", 1600, seed);
    ps.emitter = Emitter::Sphere {
        radius: config.diameter * 0.5,
        radius_range: 0.0,
    };
    ps.anchor = EmitterAnchor::Mesh(core);
    ps.min_size = 0.4;
    ps.max_size = 0.7;
    ps.min_lifetime = 8.0;
    ps.max_lifetime = 8.0;
    ps.emit_rate = 200.0;
    ps.min_emit_power = 0.0;
    ps.max_emit_power = 0.0;
    ps.gravity = Vec3::ZERO;
    ps.blend_mode = BlendMode::Additive;
    ps.min_angular_speed = -0.4;
    ps.max_angular_speed = 0.4;
    ps.min_initial_rotation = -TAU;
    ps.max_initial_rotation = TAU;
    ps.time_scale = 0.5;
    ps.pre_warm_cycles = 100;
    ps.pre_warm_step_offset = 10.0;
    for (gradient, color) in SURFACE_GRADIENT {
        ps.add_color_gradient(gradient, Vec4::from(color));
    }
    ps.start();
    ps
}

fn flare_particle_system(core: MeshId, config: &SunConfig, seed: u64) -> ParticleSystem {
    let mut ps = ParticleSystem::new("sunFlares", 400, seed);
    ps.emitter = Emitter::Cone {
        radius: config.diameter * 0.55,
        angle: 0.35,
    };
    ps.anchor = EmitterAnchor::Mesh(core);
    ps.min_size = 0.3;
    ps.max_size = 0.9;
    ps.min_lifetime = 1.5;
    ps.max_lifetime = 3.0;
    ps.emit_rate = 40.0;
    ps.min_emit_power = 0.5;
    ps.max_emit_power = 1.5;
    ps.color1 = Vec4::new(1.0, 0.6, 0.2, 1.0);
    ps.color2 = Vec4::new(1.0, 0.3, 0.05, 1.0);
    ps.color_dead = Vec4::new(0.2, 0.02, 0.0, 0.0);
    ps.blend_mode = BlendMode::Additive;
    ps.start();
    ps
}
