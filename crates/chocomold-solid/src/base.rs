//! Parametric base solids
//!
//! Every base is centered on the origin in XY and spans z in [0, height].
//! The top face is the engrave face.

use crate::mesh::SolidMesh;
use chocomold_settings::{BaseStyle, MoldParameters};
use csgrs::mesh::polygon::Polygon as MeshPolygon;
use csgrs::mesh::vertex::Vertex;
use csgrs::mesh::Mesh;
use csgrs::traits::CSG;
use nalgebra::{Point3, Vector3};

/// Build the base solid described by `params`
pub fn build_base(params: &MoldParameters) -> SolidMesh {
    let (w, l, h) = (params.base_width, params.base_length, params.base_height);
    match params.base_style {
        BaseStyle::Block => block(w, l, h),
        BaseStyle::Frustum { top_inset } => frustum(w, l, h, top_inset),
    }
}

fn block(width: f64, length: f64, height: f64) -> SolidMesh {
    SolidMesh::new(
        Mesh::cuboid(width, length, height, None).translate(-width / 2.0, -length / 2.0, 0.0),
    )
}

/// Planar face from counter-clockwise (outward-facing) corners
fn face(corners: &[Point3<f64>]) -> MeshPolygon<()> {
    let normal = (corners[1] - corners[0])
        .cross(&(corners[2] - corners[0]))
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::z);
    MeshPolygon::new(
        corners.iter().map(|p| Vertex::new(*p, normal)).collect(),
        None,
    )
}

fn frustum(width: f64, length: f64, height: f64, top_inset: f64) -> SolidMesh {
    let (bx, by) = (width / 2.0, length / 2.0);
    let (tx, ty) = (bx - top_inset, by - top_inset);
    if tx <= 0.0 || ty <= 0.0 {
        tracing::warn!(
            "Frustum inset {} leaves no top face; using a block base",
            top_inset
        );
        return block(width, length, height);
    }

    let p = [
        Point3::new(-bx, -by, 0.0),
        Point3::new(bx, -by, 0.0),
        Point3::new(bx, by, 0.0),
        Point3::new(-bx, by, 0.0),
        Point3::new(-tx, -ty, height),
        Point3::new(tx, -ty, height),
        Point3::new(tx, ty, height),
        Point3::new(-tx, ty, height),
    ];
    let faces = [
        [0, 3, 2, 1], // bottom
        [4, 5, 6, 7], // top
        [0, 1, 5, 4],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
    ];
    SolidMesh::from_polygons(
        faces
            .iter()
            .map(|idx| face(&idx.map(|i| p[i])))
            .collect(),
    )
}
