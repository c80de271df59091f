//! Scene meshes: named, parentable, with a simple bounding sphere.

use glam::Vec3;

use crate::MaterialId;

/// Index of a mesh inside its [`Scene`](crate::Scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

/// Geometry of a mesh, as far as the scene needs to know it.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshShape {
    /// Transform-only node with no geometry.
    Empty,
    /// UV sphere.
    Sphere { diameter: f32, segments: u32 },
}

/// Which faces the renderer treats as the outside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SideOrientation {
    #[default]
    Front,
    /// Inverted; used for backdrops seen from inside.
    Back,
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    pub shape: MeshShape,
    /// Position relative to the parent, or world position without one.
    pub position: Vec3,
    /// Uniform scale applied to the shape.
    pub scaling: f32,
    pub parent: Option<MeshId>,
    pub material: Option<MaterialId>,
    pub visible: bool,
    pub pickable: bool,
    /// Drawn centred on the camera so it never gets closer.
    pub infinite_distance: bool,
    /// Lower groups are drawn first.
    pub rendering_group: u8,
    pub side_orientation: SideOrientation,
}

impl Mesh {
    pub fn new(name: impl Into<String>, shape: MeshShape) -> Self {
        Self {
            name: name.into(),
            shape,
            position: Vec3::ZERO,
            scaling: 1.0,
            parent: None,
            material: None,
            visible: true,
            pickable: true,
            infinite_distance: false,
            rendering_group: 1,
            side_orientation: SideOrientation::Front,
        }
    }

    pub fn sphere(name: impl Into<String>, diameter: f32, segments: u32) -> Self {
        Self::new(name, MeshShape::Sphere { diameter, segments })
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, MeshShape::Empty)
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_parent(mut self, parent: MeshId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    /// Radius of the bounding sphere around the mesh origin.
    pub fn bounding_radius(&self) -> f32 {
        match self.shape {
            MeshShape::Empty => 0.0,
            MeshShape::Sphere { diameter, .. } => diameter * 0.5 * self.scaling.abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_bounding_radius_follows_scaling() {
        let mut mesh = Mesh::sphere("Earth", 2.0, 32);
        assert_eq!(mesh.bounding_radius(), 1.0);
        mesh.scaling = 3.0;
        assert_eq!(mesh.bounding_radius(), 3.0);
    }

    #[test]
    fn test_empty_has_no_extent() {
        assert_eq!(Mesh::empty("root").bounding_radius(), 0.0);
    }

    #[test]
    fn test_defaults() {
        let mesh = Mesh::sphere("Mars", 1.0, 16);
        assert!(mesh.visible);
        assert!(mesh.pickable);
        assert!(!mesh.infinite_distance);
        assert_eq!(mesh.side_orientation, SideOrientation::Front);
        assert!(mesh.parent.is_none());
    }
}
