//! Glow layer: an additive bloom pass restricted to chosen meshes.

use rustc_hash::FxHashMap;

use crate::{MaterialId, MeshId};

/// Index of a glow layer inside its [`Scene`](crate::Scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlowLayerId(pub(crate) usize);

/// Bloom post-process parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomConfig {
    /// Only pixels brighter than this contribute.
    pub threshold: f32,
    /// Soft knee for the threshold curve, 0..=1.
    pub soft_knee: f32,
    pub intensity: f32,
    /// Downscale iterations; each doubles the blur radius.
    pub iterations: u32,
    pub radius: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            soft_knee: 0.5,
            intensity: 0.3,
            iterations: 5,
            radius: 1.0,
        }
    }
}

/// A glow layer only renders the meshes it includes, each optionally with
/// a dedicated material instead of its own.
#[derive(Clone, Debug)]
pub struct GlowLayer {
    pub name: String,
    pub intensity: f32,
    pub bloom: BloomConfig,
    included: Vec<MeshId>,
    referenced_materials: FxHashMap<MeshId, MaterialId>,
}

impl GlowLayer {
    pub fn new(name: impl Into<String>, intensity: f32) -> Self {
        Self {
            name: name.into(),
            intensity,
            bloom: BloomConfig::default(),
            included: Vec::new(),
            referenced_materials: FxHashMap::default(),
        }
    }

    pub fn add_included_mesh(&mut self, mesh: MeshId) {
        if !self.included.contains(&mesh) {
            self.included.push(mesh);
        }
    }

    /// Include `mesh`, drawing it with `material` in the glow pass.
    pub fn reference_mesh_with_material(&mut self, mesh: MeshId, material: MaterialId) {
        self.add_included_mesh(mesh);
        self.referenced_materials.insert(mesh, material);
    }

    pub fn includes(&self, mesh: MeshId) -> bool {
        self.included.contains(&mesh)
    }

    pub fn included_meshes(&self) -> &[MeshId] {
        &self.included
    }

    pub fn material_for(&self, mesh: MeshId) -> Option<MaterialId> {
        self.referenced_materials.get(&mesh).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_includes_mesh_once() {
        let mut layer = GlowLayer::new("sunGlow", 1.5);
        layer.add_included_mesh(MeshId(3));
        layer.reference_mesh_with_material(MeshId(3), MaterialId(1));
        assert_eq!(layer.included_meshes(), &[MeshId(3)]);
        assert_eq!(layer.material_for(MeshId(3)), Some(MaterialId(1)));
        assert_eq!(layer.material_for(MeshId(4)), None);
    }

    #[test]
    fn test_bloom_defaults() {
        let bloom = BloomConfig::default();
        assert_eq!(bloom.iterations, 5);
        assert!(bloom.threshold > 0.0);
    }
}
