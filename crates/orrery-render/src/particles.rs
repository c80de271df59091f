//! CPU-simulated particle systems.
//!
//! Each system spawns `emit_rate` particles per (scaled) second from its
//! emitter shape, ages them, and colours them either from a gradient over
//! their lifetime or by fading from their spawn colour to `color_dead`.

use std::f32::consts::TAU;

use glam::{Quat, Vec3, Vec4};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{BlendMode, MeshId};

/// Simulation step used for each pre-warm cycle before the step offset.
const PREWARM_BASE_STEP: f32 = 1.0 / 60.0;

/// Index of a particle system inside its [`Scene`](crate::Scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParticleSystemId(pub(crate) usize);

/// Shape particles are spawned from, relative to the anchor position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Emitter {
    Point,
    /// Uniformly inside an axis-aligned box.
    Box { min: Vec3, max: Vec3 },
    /// On or inside a sphere. `radius_range` 0 spawns on the surface only,
    /// 1 anywhere down to the centre. Particles head outward.
    Sphere { radius: f32, radius_range: f32 },
    /// Cone with the given half-angle, opening along `direction1`
    /// (+Y when that is zero).
    Cone { radius: f32, angle: f32 },
}

/// Where the emitter sits in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EmitterAnchor {
    Fixed(Vec3),
    /// Follows the world position of a mesh.
    Mesh(MeshId),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorGradientStop {
    /// Position in the particle's life, 0..=1.
    pub gradient: f32,
    pub color: Vec4,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Vec4,
    spawn_color: Vec4,
    pub size: f32,
    pub age: f32,
    pub lifetime: f32,
    pub angle: f32,
    pub angular_speed: f32,
}

impl Particle {
    /// Fraction of the lifetime already lived.
    pub fn life_ratio(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParticleSystem {
    pub name: String,
    /// Maximum number of live particles.
    pub capacity: usize,
    pub emitter: Emitter,
    pub anchor: EmitterAnchor,
    /// Spawn directions are picked per component between these two.
    pub direction1: Vec3,
    pub direction2: Vec3,
    pub min_size: f32,
    pub max_size: f32,
    pub min_lifetime: f32,
    pub max_lifetime: f32,
    /// Particles per second.
    pub emit_rate: f32,
    pub min_emit_power: f32,
    pub max_emit_power: f32,
    pub gravity: Vec3,
    pub color1: Vec4,
    pub color2: Vec4,
    pub color_dead: Vec4,
    pub blend_mode: BlendMode,
    pub min_angular_speed: f32,
    pub max_angular_speed: f32,
    pub min_initial_rotation: f32,
    pub max_initial_rotation: f32,
    /// Multiplier on frame time; below 1 slows the whole system down.
    pub time_scale: f32,
    pub pre_warm_cycles: u32,
    /// Multiplier on the pre-warm step.
    pub pre_warm_step_offset: f32,
    color_gradients: Vec<ColorGradientStop>,
    particles: Vec<Particle>,
    spawn_accumulator: f32,
    running: bool,
    needs_prewarm: bool,
    rng: ChaCha8Rng,
}

impl ParticleSystem {
    pub fn new(name: impl Into<String>, capacity: usize, seed: u64) -> Self {
        Self {
            name: name.into(),
            capacity,
            emitter: Emitter::Point,
            anchor: EmitterAnchor::Fixed(Vec3::ZERO),
            direction1: Vec3::Y,
            direction2: Vec3::Y,
            min_size: 1.0,
            max_size: 1.0,
            min_lifetime: 1.0,
            max_lifetime: 1.0,
            emit_rate: 10.0,
            min_emit_power: 1.0,
            max_emit_power: 1.0,
            gravity: Vec3::ZERO,
            color1: Vec4::ONE,
            color2: Vec4::ONE,
            color_dead: Vec4::new(0.0, 0.0, 0.0, 0.0),
            blend_mode: BlendMode::Alpha,
            min_angular_speed: 0.0,
            max_angular_speed: 0.0,
            min_initial_rotation: 0.0,
            max_initial_rotation: 0.0,
            time_scale: 1.0,
            pre_warm_cycles: 0,
            pre_warm_step_offset: 1.0,
            color_gradients: Vec::new(),
            particles: Vec::with_capacity(capacity.min(4096)),
            spawn_accumulator: 0.0,
            running: false,
            needs_prewarm: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Insert a gradient stop, keeping stops ordered by position.
    pub fn add_color_gradient(&mut self, gradient: f32, color: Vec4) {
        let stop = ColorGradientStop {
            gradient: gradient.clamp(0.0, 1.0),
            color,
        };
        let index = self
            .color_gradients
            .partition_point(|s| s.gradient <= stop.gradient);
        self.color_gradients.insert(index, stop);
    }

    pub fn color_gradients(&self) -> &[ColorGradientStop] {
        &self.color_gradients
    }

    pub fn set_directions(&mut self, direction1: Vec3, direction2: Vec3) {
        self.direction1 = direction1;
        self.direction2 = direction2;
    }

    /// Start emitting. Pre-warm runs on the first update after this.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.needs_prewarm = self.pre_warm_cycles > 0;
        }
    }

    /// Stop emitting; live particles keep ageing out.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn live_count(&self) -> usize {
        self.particles.len()
    }

    pub fn reset(&mut self) {
        self.particles.clear();
        self.spawn_accumulator = 0.0;
    }

    /// Advance the simulation by `dt` seconds with the emitter at `origin`.
    pub fn update(&mut self, dt: f32, origin: Vec3) {
        if self.needs_prewarm {
            self.needs_prewarm = false;
            let step = PREWARM_BASE_STEP * self.pre_warm_step_offset;
            for _ in 0..self.pre_warm_cycles {
                self.step(step, origin);
            }
            log::debug!(
                "Pre-warmed particle system '{}' with {} particles",
                self.name,
                self.particles.len()
            );
        }
        self.step(dt, origin);
    }

    fn step(&mut self, dt: f32, origin: Vec3) {
        let dt = dt.max(0.0) * self.time_scale;
        if dt <= 0.0 {
            return;
        }

        let gravity = self.gravity;
        for p in &mut self.particles {
            p.age += dt;
            p.velocity += gravity * dt;
            p.position += p.velocity * dt;
            p.angle += p.angular_speed * dt;
        }
        self.particles.retain(|p| p.age < p.lifetime);
        for i in 0..self.particles.len() {
            let ratio = self.particles[i].life_ratio();
            self.particles[i].color = self.color_at(ratio, self.particles[i].spawn_color);
        }

        if !self.running {
            return;
        }
        self.spawn_accumulator += self.emit_rate.max(0.0) * dt;
        let mut to_spawn = self.spawn_accumulator.floor() as usize;
        self.spawn_accumulator -= to_spawn as f32;
        to_spawn = to_spawn.min(self.capacity.saturating_sub(self.particles.len()));
        for _ in 0..to_spawn {
            let particle = self.spawn(origin);
            self.particles.push(particle);
        }
    }

    fn spawn(&mut self, origin: Vec3) -> Particle {
        let (offset, direction) = match self.emitter {
            Emitter::Point => (Vec3::ZERO, self.random_direction()),
            Emitter::Box { min, max } => (
                Vec3::new(
                    self.random_between(min.x, max.x),
                    self.random_between(min.y, max.y),
                    self.random_between(min.z, max.z),
                ),
                self.random_direction(),
            ),
            Emitter::Sphere {
                radius,
                radius_range,
            } => {
                let dir = self.random_unit_vector();
                let r = radius - self.random_between(0.0, radius * radius_range.clamp(0.0, 1.0));
                (dir * r, dir)
            }
            Emitter::Cone { radius, angle } => {
                let spread = self.random_between(0.0, angle.abs());
                let heading = self.random_between(0.0, TAU);
                let local = Vec3::new(
                    spread.sin() * heading.cos(),
                    spread.cos(),
                    spread.sin() * heading.sin(),
                );
                let axis = self.direction1.normalize_or(Vec3::Y);
                let dir = Quat::from_rotation_arc(Vec3::Y, axis) * local;
                let r = self.random_between(0.0, radius);
                (dir * r, dir)
            }
        };

        let power = self.random_between(self.min_emit_power, self.max_emit_power);
        let mix = self.rng.random::<f32>();
        let spawn_color = self.color1.lerp(self.color2, mix);
        Particle {
            position: origin + offset,
            velocity: direction * power,
            color: self.color_at(0.0, spawn_color),
            spawn_color,
            size: self.random_between(self.min_size, self.max_size),
            age: 0.0,
            lifetime: self.random_between(self.min_lifetime, self.max_lifetime),
            angle: self.random_between(self.min_initial_rotation, self.max_initial_rotation),
            angular_speed: self.random_between(self.min_angular_speed, self.max_angular_speed),
        }
    }

    fn color_at(&self, ratio: f32, spawn_color: Vec4) -> Vec4 {
        if self.color_gradients.is_empty() {
            spawn_color.lerp(self.color_dead, ratio)
        } else {
            sample_gradient(&self.color_gradients, ratio)
        }
    }

    fn random_between(&mut self, a: f32, b: f32) -> f32 {
        a + (b - a) * self.rng.random::<f32>()
    }

    fn random_direction(&mut self) -> Vec3 {
        let (d1, d2) = (self.direction1, self.direction2);
        Vec3::new(
            self.random_between(d1.x, d2.x),
            self.random_between(d1.y, d2.y),
            self.random_between(d1.z, d2.z),
        )
    }

    fn random_unit_vector(&mut self) -> Vec3 {
        let z = self.random_between(-1.0, 1.0);
        let theta = self.random_between(0.0, TAU);
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * theta.cos(), r * theta.sin(), z)
    }
}

/// Colour at `t` along ordered gradient stops, clamped at both ends.
pub(crate) fn sample_gradient(stops: &[ColorGradientStop], t: f32) -> Vec4 {
    let Some(first) = stops.first() else {
        return Vec4::ONE;
    };
    if t <= first.gradient {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.gradient {
            let span = b.gradient - a.gradient;
            if span <= f32::EPSILON {
                return b.color;
            }
            return a.color.lerp(b.color, (t - a.gradient) / span);
        }
    }
    stops[stops.len() - 1].color
}
