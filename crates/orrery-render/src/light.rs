use glam::Vec3;

/// Index of a light inside its [`Scene`](crate::Scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LightId(pub(crate) usize);

/// Omnidirectional light, used for the sun.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub name: String,
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl PointLight {
    pub fn new(name: impl Into<String>, position: Vec3, intensity: f32) -> Self {
        Self {
            name: name.into(),
            position,
            color: Vec3::ONE,
            intensity,
        }
    }
}

/// Sky/ground ambient light.
#[derive(Clone, Debug, PartialEq)]
pub struct HemisphericLight {
    pub name: String,
    /// Direction of the sky colour.
    pub direction: Vec3,
    pub sky_color: Vec3,
    pub ground_color: Vec3,
    pub intensity: f32,
}

impl HemisphericLight {
    pub fn new(name: impl Into<String>, direction: Vec3, intensity: f32) -> Self {
        Self {
            name: name.into(),
            direction: direction.normalize_or(Vec3::Y),
            sky_color: Vec3::ONE,
            ground_color: Vec3::ZERO,
            intensity,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    Point(PointLight),
    Hemispheric(HemisphericLight),
}

impl Light {
    pub fn name(&self) -> &str {
        match self {
            Light::Point(l) => &l.name,
            Light::Hemispheric(l) => &l.name,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Point(l) => l.intensity,
            Light::Hemispheric(l) => l.intensity,
        }
    }
}

impl From<PointLight> for Light {
    fn from(l: PointLight) -> Self {
        Light::Point(l)
    }
}

impl From<HemisphericLight> for Light {
    fn from(l: HemisphericLight) -> Self {
        Light::Hemispheric(l)
    }
}
