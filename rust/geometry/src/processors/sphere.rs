// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sphere processor - subdivided icosahedron.

use crate::{dump::DumpSink, primitives::Vertex, Mesh, Result};
use nalgebra::Point3;
use rustc_hash::FxHashMap;

use crate::router::{MeshRequest, PrimKind, PrimProcessor};

/// Radius of the unit sphere prim
const RADIUS: f32 = 0.5;

/// Faces are split until every edge is shorter than this
const MAX_EDGE_LENGTH: f32 = 0.2;

/// Icosahedron faces, 1-based into [`icosahedron_vertices`]
const FACES: [[usize; 3]; 20] = [
    [1, 2, 3],
    [4, 3, 2],
    [4, 5, 6],
    [4, 9, 5],
    [1, 7, 8],
    [1, 10, 7],
    [5, 11, 12],
    [7, 12, 11],
    [3, 6, 10],
    [12, 10, 6],
    [2, 8, 9],
    [11, 9, 8],
    [4, 6, 3],
    [4, 2, 9],
    [1, 3, 10],
    [1, 8, 2],
    [7, 10, 12],
    [7, 11, 8],
    [5, 12, 6],
    [5, 9, 11],
];

fn icosahedron_vertices() -> [Vertex; 12] {
    let phi = (1.0 + 5.0f32.sqrt()) * 0.5;
    let rat = (10.0 + 2.0 * 5.0f32.sqrt()).sqrt() / (4.0 * phi);
    let a = (RADIUS / rat) * 0.5;
    let b = (RADIUS / rat) / (2.0 * phi);

    [
        Point3::new(0.0, b, -a),
        Point3::new(b, a, 0.0),
        Point3::new(-b, a, 0.0),
        Point3::new(0.0, b, a),
        Point3::new(0.0, -b, a),
        Point3::new(-a, 0.0, b),
        Point3::new(0.0, -b, -a),
        Point3::new(a, 0.0, -b),
        Point3::new(a, 0.0, b),
        Point3::new(-a, 0.0, -b),
        Point3::new(b, -a, 0.0),
        Point3::new(-b, -a, 0.0),
    ]
}

/// Midpoint of `a` and `b` pushed back onto the sphere
fn radial_midpoint(a: &Vertex, b: &Vertex) -> Vertex {
    let mid = (a.coords + b.coords) * 0.5;
    Point3::from(mid.normalize() * RADIUS)
}

/// Accumulates sphere triangles, sharing vertices between faces
#[derive(Default)]
struct SphereBuilder {
    mesh: Mesh,
    index: FxHashMap<[i64; 3], u32>,
}

impl SphereBuilder {
    fn vertex(&mut self, v: Vertex) -> u32 {
        let key = [v.x, v.y, v.z].map(|c| (c as f64 * 1e6).round() as i64);
        if let Some(&existing) = self.index.get(&key) {
            return existing;
        }
        let index = self.mesh.add_vertex(v);
        self.index.insert(key, index);
        index
    }

    fn subdivide(&mut self, a: Vertex, b: Vertex, c: Vertex) {
        if (a - b).norm() < MAX_EDGE_LENGTH
            && (b - c).norm() < MAX_EDGE_LENGTH
            && (c - a).norm() < MAX_EDGE_LENGTH
        {
            let (ia, ib, ic) = (self.vertex(a), self.vertex(b), self.vertex(c));
            self.mesh.add_triangle(ia, ib, ic);
            return;
        }

        let ab = radial_midpoint(&a, &b);
        let bc = radial_midpoint(&b, &c);
        let ca = radial_midpoint(&c, &a);

        self.subdivide(a, ab, ca);
        self.subdivide(ab, b, bc);
        self.subdivide(ca, bc, c);
        self.subdivide(ab, bc, ca);
    }
}

/// Unit sphere of radius 0.5, facing outward, before scaling
pub(crate) fn unit_sphere() -> Mesh {
    let corners = icosahedron_vertices();
    let mut builder = SphereBuilder::default();
    for [i, j, k] in FACES {
        builder.subdivide(corners[i - 1], corners[j - 1], corners[k - 1]);
    }

    // The face table winds inward
    let mut mesh = builder.mesh;
    mesh.invert_normals();
    mesh
}

/// Sphere processor
///
/// Half-circle profiles on a circular path ignore cut, hollow and path
/// parameters and always mesh as a full ellipsoid.
pub struct SphereProcessor;

impl SphereProcessor {
    /// Create new processor
    pub fn new() -> Self {
        Self
    }
}

impl Default for SphereProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimProcessor for SphereProcessor {
    fn process(&self, _kind: PrimKind, request: &MeshRequest, dump: &DumpSink) -> Result<Mesh> {
        let mut mesh = unit_sphere();
        mesh.scale(&request.size);
        dump.dump_raw(&mesh, request.name, "Icosahedron");
        Ok(mesh)
    }

    fn supported_kinds(&self) -> Vec<PrimKind> {
        vec![PrimKind::Sphere]
    }
}
