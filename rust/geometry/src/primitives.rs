// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertex, triangle and edge primitives shared by the hull, triangulator
//! and extruder.

use crate::mesh::Mesh;
use nalgebra::{Point3, UnitQuaternion, Vector3};
use robust::{incircle, orient2d, Coord};

/// Mesh vertex; profile work happens in the Z=0 plane
pub type Vertex = Point3<f32>;

/// Relative collinearity tolerance: twice the area over the squared longest edge
const DEGENERATE_TOLERANCE: f64 = 1e-6;

/// Unit vector in the Z=0 plane at the given angle (radians)
#[inline]
pub fn vertex_from_angle(angle: f64) -> Vertex {
    Point3::new(angle.cos() as f32, angle.sin() as f32, 0.0)
}

/// Rotate a vertex about the Z axis
#[inline]
pub fn rotate_z(vertex: &Vertex, angle: f32) -> Vertex {
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle) * vertex
}

#[inline]
fn coord(v: &Vertex) -> Coord<f64> {
    Coord {
        x: v.x as f64,
        y: v.y as f64,
    }
}

/// Exact 2D orientation of three vertices (positive when counter-clockwise)
#[inline]
pub fn orientation(a: &Vertex, b: &Vertex, c: &Vertex) -> f64 {
    orient2d(coord(a), coord(b), coord(c))
}

/// Undirected edge between two mesh vertices
///
/// Stored with `v1 <= v2` so shared edges compare equal and sort next to
/// each other regardless of the winding they were taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Simplex {
    pub v1: u32,
    pub v2: u32,
}

impl Simplex {
    #[inline]
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Self { v1: a, v2: b }
        } else {
            Self { v1: b, v2: a }
        }
    }
}

/// Triangle referencing three vertices of a [`Mesh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub v1: u32,
    pub v2: u32,
    pub v3: u32,
}

impl Triangle {
    #[inline]
    pub fn new(v1: u32, v2: u32, v3: u32) -> Self {
        Self { v1, v2, v3 }
    }

    #[inline]
    pub fn indices(&self) -> [u32; 3] {
        [self.v1, self.v2, self.v3]
    }

    #[inline]
    pub fn references(&self, vertex: u32) -> bool {
        self.v1 == vertex || self.v2 == vertex || self.v3 == vertex
    }

    /// The three edges of this triangle
    pub fn simplices(&self) -> [Simplex; 3] {
        [
            Simplex::new(self.v1, self.v2),
            Simplex::new(self.v2, self.v3),
            Simplex::new(self.v3, self.v1),
        ]
    }

    /// Same triangle with reversed winding
    #[inline]
    pub fn inverted(&self) -> Self {
        Self::new(self.v1, self.v3, self.v2)
    }

    pub fn corners(&self, mesh: &Mesh) -> [Vertex; 3] {
        [mesh.vertex(self.v1), mesh.vertex(self.v2), mesh.vertex(self.v3)]
    }

    /// Unit normal `(v1 - v2) x (v1 - v3)`, zero for collapsed triangles
    pub fn normal(&self, mesh: &Mesh) -> Vector3<f32> {
        let [u, v, w] = self.corners(mesh);
        let e1 = u - v;
        let e2 = u - w;
        e1.cross(&e2)
            .try_normalize(f32::MIN_POSITIVE)
            .unwrap_or_else(Vector3::zeros)
    }

    pub fn centroid(&self, mesh: &Mesh) -> Vertex {
        let [a, b, c] = self.corners(mesh);
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Twice the area of the triangle
    pub fn double_area(&self, mesh: &Mesh) -> f64 {
        let [a, b, c] = self.corners(mesh).map(|v| v.cast::<f64>());
        (b - a).cross(&(c - a)).norm()
    }

    /// Whether the triangle has collapsed to a line or a point
    pub fn is_degenerate(&self, mesh: &Mesh) -> bool {
        if self.v1 == self.v2 || self.v2 == self.v3 || self.v3 == self.v1 {
            return true;
        }
        let [a, b, c] = self.corners(mesh).map(|v| v.cast::<f64>());
        let longest = (b - a)
            .norm_squared()
            .max((c - b).norm_squared())
            .max((a - c).norm_squared());
        if longest == 0.0 {
            return true;
        }
        (b - a).cross(&(c - a)).norm() <= DEGENERATE_TOLERANCE * longest
    }

    /// Whether `point` lies strictly inside the circumcircle (XY plane)
    pub fn circumcircle_contains(&self, mesh: &Mesh, point: &Vertex) -> bool {
        let [a, b, c] = self.corners(mesh);
        let winding = orientation(&a, &b, &c);
        if winding == 0.0 {
            return false;
        }
        let det = incircle(coord(&a), coord(&b), coord(&c), coord(point));
        det * winding.signum() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> (Mesh, Triangle) {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        (mesh, Triangle::new(a, b, c))
    }

    #[test]
    fn test_simplex_is_undirected() {
        assert_eq!(Simplex::new(4, 2), Simplex::new(2, 4));
        assert!(Simplex::new(1, 9) < Simplex::new(2, 3));
    }

    #[test]
    fn test_normal_follows_winding() {
        let (mesh, tri) = unit_triangle();
        assert_relative_eq!(tri.normal(&mesh).z, 1.0);
        assert_relative_eq!(tri.inverted().normal(&mesh).z, -1.0);
    }

    #[test]
    fn test_circumcircle_contains_either_winding() {
        let (mesh, tri) = unit_triangle();
        let inside = Point3::new(0.9, 0.9, 0.0);
        let outside = Point3::new(1.2, 1.2, 0.0);
        assert!(tri.circumcircle_contains(&mesh, &inside));
        assert!(tri.inverted().circumcircle_contains(&mesh, &inside));
        assert!(!tri.circumcircle_contains(&mesh, &outside));
        // (1, 1) is cocircular with the corners
        assert!(!tri.circumcircle_contains(&mesh, &Point3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_degenerate_detection() {
        let (mut mesh, tri) = unit_triangle();
        assert!(!tri.is_degenerate(&mesh));

        let d = mesh.add_vertex(Point3::new(2.0, 0.0, 0.0));
        assert!(Triangle::new(tri.v1, tri.v2, d).is_degenerate(&mesh));
        assert!(Triangle::new(tri.v1, tri.v1, tri.v2).is_degenerate(&mesh));
    }

    #[test]
    fn test_vertex_from_angle() {
        let v = vertex_from_angle(std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-7);
        assert_relative_eq!(v.y, 1.0);

        let r = rotate_z(&Point3::new(0.5, 0.0, 0.25), std::f32::consts::PI);
        assert_relative_eq!(r.x, -0.5, epsilon = 1e-6);
        assert_relative_eq!(r.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(r.z, 0.25);
    }
}
