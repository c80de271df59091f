use std::collections::VecDeque;

use glam::Vec3;

use crate::{MaterialId, MeshId};

/// Index of a trail inside its [`Scene`](crate::Scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrailId(pub(crate) usize);

/// Ribbon that follows a source mesh, keeping its most recent positions.
#[derive(Clone, Debug)]
pub struct TrailMesh {
    pub name: String,
    pub source: MeshId,
    /// Number of positions kept.
    pub length: usize,
    /// Ribbon width.
    pub diameter: f32,
    pub material: Option<MaterialId>,
    points: VecDeque<Vec3>,
}

impl TrailMesh {
    pub fn new(name: impl Into<String>, source: MeshId, length: usize, diameter: f32) -> Self {
        let length = length.max(1);
        Self {
            name: name.into(),
            source,
            length,
            diameter,
            material: None,
            points: VecDeque::with_capacity(length),
        }
    }

    /// Record the source's current position, dropping the oldest sample
    /// once `length` positions are held.
    pub fn update(&mut self, position: Vec3) {
        if self.points.len() == self.length {
            self.points.pop_front();
        }
        self.points.push_back(position);
    }

    /// Positions from oldest to newest.
    pub fn points(&self) -> impl Iterator<Item = &Vec3> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn head(&self) -> Option<Vec3> {
        self.points.back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_most_recent_positions() {
        let mut trail = TrailMesh::new("t", MeshId(0), 3, 0.4);
        for i in 0..5 {
            trail.update(Vec3::splat(i as f32));
        }
        let points: Vec<f32> = trail.points().map(|p| p.x).collect();
        assert_eq!(points, vec![2.0, 3.0, 4.0]);
        assert_eq!(trail.head(), Some(Vec3::splat(4.0)));
    }

    #[test]
    fn test_zero_length_clamped() {
        let mut trail = TrailMesh::new("t", MeshId(0), 0, 0.4);
        trail.update(Vec3::X);
        trail.update(Vec3::Y);
        assert_eq!(trail.len(), 1);
    }
}
