// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile triangulation by incremental vertex insertion
//!
//! Hull vertices are inserted one at a time into a large seed triangle.
//! Each insertion removes the triangles whose circumcircle contains the new
//! vertex and fans the resulting cavity back to it, which keeps the
//! triangulation Delaunay. Seeds and everything outside the hull are
//! removed afterwards.

use crate::dump::DumpSink;
use crate::error::{Error, Result};
use crate::hull::SimpleHull;
use crate::mesh::Mesh;
use crate::primitives::{orientation, Simplex};
use nalgebra::Point3;
use smallvec::SmallVec;

/// Seed triangle enclosing every profile (profiles live in the unit square)
const SEED_TRIANGLE: [[f32; 2]; 3] = [[0.0, -10.0], [-10.0, 10.0], [10.0, 10.0]];

/// Triangulated profile ready for extrusion
///
/// Mesh vertices are the hull vertices in hull order, so ring `k` occupies
/// the index range following the first `k` entries of `ring_lengths`.
#[derive(Debug, Clone)]
pub struct Triangulation {
    pub mesh: Mesh,
    pub ring_lengths: Vec<usize>,
}

impl Triangulation {
    /// Vertex index ranges of each ring
    pub fn ring_ranges(&self) -> Vec<std::ops::Range<u32>> {
        let mut start = 0u32;
        self.ring_lengths
            .iter()
            .map(|&len| {
                let range = start..start + len as u32;
                start = range.end;
                range
            })
            .collect()
    }
}

/// Triangulate a profile hull
///
/// Every triangle of the result faces +Z.
pub fn triangulate(hull: &SimpleHull, dump: &DumpSink, prim_name: &str) -> Result<Triangulation> {
    let vertex_count = hull.vertex_count();
    if vertex_count < 3 {
        return Err(Error::TriangulationError(format!(
            "hull has {} vertices, need at least 3",
            vertex_count
        )));
    }

    let mut mesh = Mesh::with_capacity(vertex_count + 3, vertex_count * 2 + 1);
    let seeds = SEED_TRIANGLE.map(|[x, y]| mesh.add_vertex(Point3::new(x, y, 0.0)));
    mesh.add_triangle(seeds[0], seeds[1], seeds[2]);

    let first = mesh.add_hull(hull);
    for index in first..mesh.vertex_count() as u32 {
        insert_vertex(&mut mesh, index);
    }
    dump.dump_raw(&mesh, prim_name, "Proto first Mesh");

    for &seed in seeds.iter().rev() {
        mesh.remove_vertex(seed);
    }
    dump.dump_raw(&mesh, prim_name, "Proto seeds removed");

    mesh.remove_triangles_outside(hull);
    dump.dump_raw(&mesh, prim_name, "Proto outsides removed");

    if mesh.triangle_count() == 0 {
        return Err(Error::EmptyMesh(
            "profile triangulation produced no triangles".to_string(),
        ));
    }

    orient_up(&mut mesh);

    Ok(Triangulation {
        mesh,
        ring_lengths: hull.ring_lengths(),
    })
}

/// Insert an existing mesh vertex into the triangulation
fn insert_vertex(mesh: &mut Mesh, index: u32) {
    let point = mesh.vertex(index);

    let influenced: Vec<bool> = {
        let view: &Mesh = mesh;
        view.triangles()
            .map(|t| t.circumcircle_contains(view, &point))
            .collect()
    };
    // Coincident with an existing vertex
    if !influenced.iter().any(|&hit| hit) {
        return;
    }

    let mut cavity: SmallVec<[Simplex; 24]> = mesh
        .triangles()
        .zip(&influenced)
        .filter(|(_, &hit)| hit)
        .flat_map(|(t, _)| t.simplices())
        .collect();

    let mut flags = influenced.into_iter();
    mesh.retain_triangles(|_| !flags.next().unwrap_or(false));

    // Edges shared by two removed triangles are interior to the cavity
    cavity.sort_unstable();
    let mut i = 0;
    while i < cavity.len() {
        let edge = cavity[i];
        let mut run = 1;
        while i + run < cavity.len() && cavity[i + run] == edge {
            run += 1;
        }
        i += run;
        if run > 1 {
            continue;
        }

        let a = mesh.vertex(edge.v1);
        let b = mesh.vertex(edge.v2);
        if orientation(&a, &b, &point) != 0.0 {
            mesh.add_triangle(edge.v1, edge.v2, index);
        }
    }
}

/// Rewind triangles so their normals point to +Z
fn orient_up(mesh: &mut Mesh) {
    let flips: Vec<bool> = {
        let view: &Mesh = mesh;
        view.triangles()
            .map(|t| {
                let [a, b, c] = t.corners(view);
                orientation(&a, &b, &c) < 0.0
            })
            .collect()
    };
    for (chunk, flip) in mesh.indices.chunks_exact_mut(3).zip(flips) {
        if flip {
            chunk.swap(1, 2);
        }
    }
}

/// Sum of triangle areas in the XY plane
#[cfg(test)]
pub(crate) fn planar_area(mesh: &Mesh) -> f64 {
    mesh.triangles().map(|t| t.double_area(mesh) * 0.5).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{circle_hull, hole_hull_polygon, square_hull};
    use crate::primitives::Triangle;
    use approx::assert_relative_eq;
    use primmesh_core::HollowShape;

    fn triangulate_quiet(hull: &SimpleHull) -> Triangulation {
        triangulate(hull, &DumpSink::disabled(), "test").unwrap()
    }

    fn assert_faces_up(mesh: &Mesh) {
        for t in mesh.triangles() {
            let [a, b, c] = t.corners(mesh);
            assert!(orientation(&a, &b, &c) > 0.0, "triangle {:?} faces down", t);
        }
    }

    fn assert_empty_circumcircles(mesh: &Mesh) {
        for t in mesh.triangles() {
            for v in 0..mesh.vertex_count() as u32 {
                if t.references(v) {
                    continue;
                }
                assert!(
                    !t.circumcircle_contains(mesh, &mesh.vertex(v)),
                    "vertex {} inside circumcircle of {:?}",
                    v,
                    t
                );
            }
        }
    }

    #[test]
    fn test_triangulate_square() {
        let result = triangulate_quiet(&square_hull());

        assert_eq!(result.mesh.vertex_count(), 4);
        assert_eq!(result.mesh.triangle_count(), 2);
        assert_eq!(result.ring_lengths, vec![4]);
        assert_relative_eq!(planar_area(&result.mesh), 1.0, epsilon = 1e-6);
        assert_faces_up(&result.mesh);
    }

    #[test]
    fn test_vertex_order_matches_hull() {
        let hull = circle_hull();
        let result = triangulate_quiet(&hull);

        let hull_vertices: Vec<_> = hull.vertices().collect();
        let mesh_vertices: Vec<_> = result.mesh.vertices().collect();
        assert_eq!(hull_vertices, mesh_vertices);
    }

    #[test]
    fn test_triangulate_circle_is_delaunay() {
        let result = triangulate_quiet(&circle_hull());

        assert_eq!(result.mesh.vertex_count(), 24);
        assert_eq!(result.mesh.triangle_count(), 22);
        assert_faces_up(&result.mesh);
        assert_empty_circumcircles(&result.mesh);
    }

    #[test]
    fn test_triangulate_hollow_square() {
        let hole = hole_hull_polygon(HollowShape::Square, 0.5, primmesh_core::ProfileShape::Square);
        let hull = SimpleHull::subtract_hull(&square_hull(), &hole).unwrap();
        let result = triangulate_quiet(&hull);

        assert_eq!(result.ring_lengths, vec![4, 4]);
        assert_eq!(result.mesh.triangle_count(), 8);
        assert_relative_eq!(planar_area(&result.mesh), 0.75, epsilon = 1e-5);
        assert_faces_up(&result.mesh);
    }

    #[test]
    fn test_ring_ranges() {
        let tri = Triangulation {
            mesh: Mesh::new(),
            ring_lengths: vec![24, 4],
        };
        assert_eq!(tri.ring_ranges(), vec![0..24, 24..28]);
    }

    #[test]
    fn test_degenerate_hull_rejected() {
        let hull = SimpleHull::from_xy(&[[0.0, 0.0], [1.0, 0.0]]);
        let result = triangulate(&hull, &DumpSink::disabled(), "test");
        assert!(matches!(result, Err(Error::TriangulationError(_))));
    }

    #[test]
    fn test_duplicate_vertex_is_ignored() {
        let mut hull = square_hull();
        hull.add_vertex(nalgebra::Point3::new(0.5, 0.5, 0.0));
        let result = triangulate_quiet(&hull);
        assert_eq!(result.mesh.triangle_count(), 2);
        assert!(result
            .mesh
            .triangles()
            .all(|t: Triangle| !t.references(4)));
    }
}
