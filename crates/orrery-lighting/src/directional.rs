//! Directional light aimed from the primary source at one entity.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Direction used when the entity sits on top of the source.
pub(crate) const FALLBACK_DIRECTION: Vec3 = Vec3::NEG_Y;

#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub name: String,
    /// Where the light originates; shadows are cast from here.
    pub position: Vec3,
    /// Normalized direction the light travels.
    pub direction: Vec3,
    /// Linear RGB, not premultiplied by intensity.
    pub color: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Light at `source` shining toward `target`. Returns `None` when the two
    /// points coincide and no direction can be derived.
    pub fn aimed(
        name: impl Into<String>,
        source: Vec3,
        target: Vec3,
        intensity: f32,
    ) -> Option<Self> {
        let direction = (target - source).try_normalize()?;
        Some(Self {
            name: name.into(),
            position: source,
            direction,
            color: Vec3::ONE,
            intensity,
        })
    }

    /// Like [`aimed`](Self::aimed) but points straight down on coincident points.
    pub fn aimed_or_down(
        name: impl Into<String>,
        source: Vec3,
        target: Vec3,
        intensity: f32,
    ) -> Self {
        let name = name.into();
        Self::aimed(name.clone(), source, target, intensity).unwrap_or(Self {
            name,
            position: source,
            direction: FALLBACK_DIRECTION,
            color: Vec3::ONE,
            intensity,
        })
    }

    /// Set the direction; zero-length input is rejected and returns `false`.
    pub fn set_direction(&mut self, dir: Vec3) -> bool {
        match dir.try_normalize() {
            Some(d) => {
                self.direction = d;
                true
            }
            None => false,
        }
    }

    pub fn to_uniform(&self) -> DirectionalLightUniform {
        DirectionalLightUniform {
            direction_intensity: self.direction.extend(self.intensity).to_array(),
            color_padding: self.color.extend(0.0).to_array(),
        }
    }
}

/// GPU-side representation, 32 bytes, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    /// xyz = direction, w = intensity.
    pub direction_intensity: [f32; 4],
    /// xyz = color, w = padding.
    pub color_padding: [f32; 4],
}
