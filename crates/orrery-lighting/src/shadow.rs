//! Shadow casters: one shadow map per lit entity, rendered from the
//! entity's directional light with an orthographic frustum around it.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Closest allowed near plane for the light frustum.
const MIN_NEAR: f32 = 0.01;

/// Shadow quality settings shared by every caster in a registry.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowConfig {
    /// Shadow map resolution (width = height).
    pub resolution: u32,
    /// Constant depth bias against shadow acne.
    pub bias: f32,
    /// Offset along the surface normal.
    pub normal_bias: f32,
    /// Blur kernel for soft shadows; 0 disables blurring.
    pub blur_kernel: u32,
    /// Half-size of the orthographic frustum around the entity.
    pub half_extent: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            resolution: 1024,
            bias: 0.0005,
            normal_bias: 0.01,
            blur_kernel: 16,
            half_extent: 10.0,
        }
    }
}

/// Opaque reference to a shadow map texture owned by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShadowMapHandle {
    pub index: u32,
    pub resolution: u32,
}

/// Shadow generator bound to one directional light.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowCaster {
    /// Name of the light this caster renders from.
    pub light: String,
    pub map: ShadowMapHandle,
    pub bias: f32,
    pub normal_bias: f32,
    pub blur_kernel: u32,
    /// Light-space view-projection matrix.
    pub light_matrix: Mat4,
}

impl ShadowCaster {
    pub fn new(
        light: impl Into<String>,
        map: ShadowMapHandle,
        config: &ShadowConfig,
        light_matrix: Mat4,
    ) -> Self {
        Self {
            light: light.into(),
            map,
            bias: config.bias,
            normal_bias: config.normal_bias,
            blur_kernel: config.blur_kernel,
            light_matrix,
        }
    }

    pub fn uses_soft_shadows(&self) -> bool {
        self.blur_kernel > 0
    }

    pub fn to_uniform(&self) -> ShadowUniform {
        ShadowUniform {
            light_matrix: self.light_matrix.to_cols_array(),
            bias_normal_bias: [self.bias, self.normal_bias, self.blur_kernel as f32, 0.0],
        }
    }
}

/// GPU-side shadow parameters, 80 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ShadowUniform {
    pub light_matrix: [f32; 16],
    /// x = bias, y = normal bias, z = blur kernel, w = padding.
    pub bias_normal_bias: [f32; 4],
}

/// Orthographic light-space matrix for a light at `source` travelling along
/// `direction`, framing a cube of `half_extent` around `focus`.
pub fn light_space_matrix(source: Vec3, direction: Vec3, focus: Vec3, half_extent: f32) -> Mat4 {
    let up = if direction.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };
    let view = Mat4::look_to_rh(source, direction, up);
    let distance = (focus - source).dot(direction);
    let near = (distance - half_extent).max(MIN_NEAR);
    let far = (distance + half_extent).max(near + MIN_NEAR);
    let projection = Mat4::orthographic_rh(
        -half_extent,
        half_extent,
        -half_extent,
        half_extent,
        near,
        far,
    );
    projection * view
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_projects_to_centre() {
        let m = light_space_matrix(Vec3::ZERO, Vec3::X, Vec3::new(30.0, 0.0, 0.0), 5.0);
        let p = m.project_point3(Vec3::new(30.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!(p.z > 0.0 && p.z < 1.0);
    }

    #[test]
    fn test_points_outside_extent_fall_outside_clip() {
        let m = light_space_matrix(Vec3::ZERO, Vec3::X, Vec3::new(30.0, 0.0, 0.0), 5.0);
        let p = m.project_point3(Vec3::new(30.0, 6.0, 0.0));
        assert!(p.y.abs() > 1.0);
    }

    #[test]
    fn test_vertical_light_uses_alternate_up() {
        let m = light_space_matrix(Vec3::new(0.0, 50.0, 0.0), Vec3::NEG_Y, Vec3::ZERO, 5.0);
        assert!(m.is_finite());
        let p = m.project_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
    }

    #[test]
    fn test_caster_takes_config_values() {
        let config = ShadowConfig {
            blur_kernel: 0,
            ..Default::default()
        };
        let handle = ShadowMapHandle {
            index: 0,
            resolution: config.resolution,
        };
        let caster = ShadowCaster::new("EarthLight", handle, &config, Mat4::IDENTITY);
        assert_eq!(caster.bias, config.bias);
        assert!(!caster.uses_soft_shadows());
        assert_eq!(std::mem::size_of::<ShadowUniform>(), 80);
    }
}
