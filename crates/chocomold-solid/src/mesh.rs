//! Solid mesh produced by the mold builder
//!
//! Wraps the boolean kernel's polygon mesh and exposes what render and
//! export collaborators need: triangles, bounds, and volume.

use csgrs::mesh::polygon::Polygon as MeshPolygon;
use csgrs::mesh::Mesh;
use csgrs::traits::CSG;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Axis-aligned 3-D bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Bounds3 {
    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// A closed triangulated boundary solid
#[derive(Debug, Clone)]
pub struct SolidMesh {
    mesh: Mesh<()>,
}

impl SolidMesh {
    pub fn new(mesh: Mesh<()>) -> Self {
        Self { mesh }
    }

    pub fn empty() -> Self {
        Self::from_polygons(Vec::new())
    }

    pub fn from_polygons(polygons: Vec<MeshPolygon<()>>) -> Self {
        Self::new(Mesh::from_polygons(&polygons, None))
    }

    /// Concatenate disjoint solids without a boolean union
    pub fn concat(parts: impl IntoIterator<Item = SolidMesh>) -> Self {
        Self::from_polygons(parts.into_iter().flat_map(|p| p.mesh.polygons).collect())
    }

    pub fn as_mesh(&self) -> &Mesh<()> {
        &self.mesh
    }

    pub fn into_mesh(self) -> Mesh<()> {
        self.mesh
    }

    pub fn translated(&self, x: f64, y: f64, z: f64) -> Self {
        Self::new(self.mesh.translate(x, y, z))
    }

    pub fn polygon_count(&self) -> usize {
        self.mesh.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    fn vertex_positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.mesh
            .polygons
            .iter()
            .flat_map(|p| p.vertices.iter().map(|v| &v.pos))
    }

    /// Fan-triangulate every polygon
    pub fn triangles(&self) -> Vec<[[f64; 3]; 3]> {
        let mut out = Vec::new();
        for polygon in &self.mesh.polygons {
            let verts = &polygon.vertices;
            if verts.len() < 3 {
                continue;
            }
            let a = verts[0].pos;
            for pair in verts[1..].windows(2) {
                let (b, c) = (pair[0].pos, pair[1].pos);
                out.push([[a.x, a.y, a.z], [b.x, b.y, b.z], [c.x, c.y, c.z]]);
            }
        }
        out
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh
            .polygons
            .iter()
            .map(|p| p.vertices.len().saturating_sub(2))
            .sum()
    }

    pub fn bounds(&self) -> Option<Bounds3> {
        let mut positions = self.vertex_positions();
        let first = positions.next()?;
        let mut bounds = Bounds3 {
            min: [first.x, first.y, first.z],
            max: [first.x, first.y, first.z],
        };
        for p in positions {
            for (axis, value) in [p.x, p.y, p.z].into_iter().enumerate() {
                bounds.min[axis] = bounds.min[axis].min(value);
                bounds.max[axis] = bounds.max[axis].max(value);
            }
        }
        Some(bounds)
    }

    /// Enclosed volume from the signed tetrahedra of every triangle
    pub fn volume(&self) -> f64 {
        let signed: f64 = self
            .triangles()
            .iter()
            .map(|[a, b, c]| {
                let (a, b, c) = (
                    Point3::from(*a).coords,
                    Point3::from(*b).coords,
                    Point3::from(*c).coords,
                );
                a.dot(&b.cross(&c))
            })
            .sum();
        (signed / 6.0).abs()
    }

    /// Same triangles in the same order
    pub fn same_geometry(&self, other: &SolidMesh) -> bool {
        self.triangles() == other.triangles()
    }
}

impl From<Mesh<()>> for SolidMesh {
    fn from(mesh: Mesh<()>) -> Self {
        Self::new(mesh)
    }
}
