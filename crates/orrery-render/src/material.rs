//! Surface materials: lit/emissive standard materials and opaque shader
//! programs referenced by path.

use glam::Vec3;
use rustc_hash::FxHashMap;

/// Index of a material inside its [`Scene`](crate::Scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) usize);

/// How a surface or particle combines with what is already drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    Opaque,
    /// Standard alpha blending.
    Alpha,
    /// Colours add up; used for glowing effects.
    Additive,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StandardMaterial {
    pub name: String,
    pub diffuse: Vec3,
    /// Emissive colour; may exceed 1.0 for HDR glow.
    pub emissive: Vec3,
    /// Multiplier on `emissive`, animated by pulsing bodies.
    pub emissive_intensity: f32,
    pub alpha: f32,
    pub disable_lighting: bool,
    pub back_face_culling: bool,
    pub blend: BlendMode,
}

impl StandardMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diffuse: Vec3::ONE,
            emissive: Vec3::ZERO,
            emissive_intensity: 1.0,
            alpha: 1.0,
            disable_lighting: false,
            back_face_culling: true,
            blend: BlendMode::Opaque,
        }
    }

    /// Unlit material that only emits `color`.
    pub fn emissive(name: impl Into<String>, color: Vec3) -> Self {
        Self {
            diffuse: Vec3::ZERO,
            emissive: color,
            disable_lighting: true,
            ..Self::new(name)
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        if alpha < 1.0 && self.blend == BlendMode::Opaque {
            self.blend = BlendMode::Alpha;
        }
        self
    }

    /// Emissive colour after the intensity multiplier.
    pub fn effective_emissive(&self) -> Vec3 {
        self.emissive * self.emissive_intensity
    }
}

/// Attribute and uniform names a shader program expects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShaderMaterialOptions {
    pub attributes: Vec<String>,
    pub uniforms: Vec<String>,
}

impl ShaderMaterialOptions {
    pub fn new(attributes: &[&str], uniforms: &[&str]) -> Self {
        Self {
            attributes: attributes.iter().map(|s| s.to_string()).collect(),
            uniforms: uniforms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Material backed by an external shader program. Only the program path and
/// the float uniforms pushed each frame are tracked here.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderMaterial {
    pub name: String,
    pub shader_path: String,
    pub options: ShaderMaterialOptions,
    pub alpha: f32,
    pub blend: BlendMode,
    pub back_face_culling: bool,
    floats: FxHashMap<String, f32>,
}

impl ShaderMaterial {
    pub fn new(
        name: impl Into<String>,
        shader_path: impl Into<String>,
        options: ShaderMaterialOptions,
    ) -> Self {
        Self {
            name: name.into(),
            shader_path: shader_path.into(),
            options,
            alpha: 1.0,
            blend: BlendMode::Opaque,
            back_face_culling: true,
            floats: FxHashMap::default(),
        }
    }

    /// Set a float uniform. Names the program does not declare are logged
    /// and stored anyway.
    pub fn set_float(&mut self, uniform: &str, value: f32) {
        if !self.options.uniforms.iter().any(|u| u == uniform) {
            log::debug!(
                "Shader material '{}' has no declared uniform '{}'",
                self.name,
                uniform
            );
        }
        self.floats.insert(uniform.to_string(), value);
    }

    pub fn float(&self, uniform: &str) -> Option<f32> {
        self.floats.get(uniform).copied()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    Standard(StandardMaterial),
    Shader(ShaderMaterial),
}

impl Material {
    pub fn name(&self) -> &str {
        match self {
            Material::Standard(m) => &m.name,
            Material::Shader(m) => &m.name,
        }
    }

    pub fn as_standard(&self) -> Option<&StandardMaterial> {
        match self {
            Material::Standard(m) => Some(m),
            Material::Shader(_) => None,
        }
    }

    pub fn as_standard_mut(&mut self) -> Option<&mut StandardMaterial> {
        match self {
            Material::Standard(m) => Some(m),
            Material::Shader(_) => None,
        }
    }

    pub fn as_shader(&self) -> Option<&ShaderMaterial> {
        match self {
            Material::Shader(m) => Some(m),
            Material::Standard(_) => None,
        }
    }

    pub fn as_shader_mut(&mut self) -> Option<&mut ShaderMaterial> {
        match self {
            Material::Shader(m) => Some(m),
            Material::Standard(_) => None,
        }
    }
}

impl From<StandardMaterial> for Material {
    fn from(m: StandardMaterial) -> Self {
        Material::Standard(m)
    }
}

impl From<ShaderMaterial> for Material {
    fn from(m: ShaderMaterial) -> Self {
        Material::Shader(m)
    }
}
