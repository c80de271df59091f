//! Per-planet lighting: one directional light and one shadow caster for
//! each lit entity, all pointing away from a single primary light source.

mod directional;
mod registry;
mod shadow;

pub use directional::{DirectionalLight, DirectionalLightUniform};
pub use registry::{LightingEntry, LightingRegistry};
pub use shadow::{ShadowCaster, ShadowConfig, ShadowMapHandle, ShadowUniform, light_space_matrix};
