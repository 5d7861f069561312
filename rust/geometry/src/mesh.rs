// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use crate::hull::SimpleHull;
use crate::primitives::{Triangle, Vertex};
use nalgebra::{Point3, Vector3};

/// Triangle mesh
///
/// Used both as the working structure of the profile pipeline and as the
/// final output. Normals are stored per triangle and are only valid after
/// [`Mesh::calculate_normals`]; any edit of the triangle list clears them.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Triangle normals (nx, ny, nz), parallel to the triangle list
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(triangle_count * 3),
            indices: Vec::with_capacity(triangle_count * 3),
        }
    }

    /// Add a vertex and return its index
    #[inline]
    pub fn add_vertex(&mut self, position: Vertex) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions.push(position.x);
        self.positions.push(position.y);
        self.positions.push(position.z);
        index
    }

    #[inline]
    pub fn vertex(&self, index: u32) -> Vertex {
        let i = index as usize * 3;
        Point3::new(self.positions[i], self.positions[i + 1], self.positions[i + 2])
    }

    #[inline]
    pub fn set_vertex(&mut self, index: u32, position: Vertex) {
        let i = index as usize * 3;
        self.positions[i] = position.x;
        self.positions[i + 1] = position.y;
        self.positions[i + 2] = position.z;
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|p| Point3::new(p[0], p[1], p[2]))
    }

    /// Add every vertex of a hull in hull order, skipping ring breaks
    ///
    /// Returns the index of the first added vertex.
    pub fn add_hull(&mut self, hull: &SimpleHull) -> u32 {
        let first = self.vertex_count() as u32;
        self.positions.reserve(hull.vertex_count() * 3);
        for vertex in hull.vertices() {
            self.add_vertex(vertex);
        }
        first
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    #[inline]
    pub fn push_triangle(&mut self, triangle: Triangle) {
        self.add_triangle(triangle.v1, triangle.v2, triangle.v3);
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| Triangle::new(t[0], t[1], t[2]))
    }

    /// Keep only the triangles accepted by `keep`
    pub fn retain_triangles<F: FnMut(&Triangle) -> bool>(&mut self, mut keep: F) {
        let mut kept = Vec::with_capacity(self.indices.len());
        for chunk in self.indices.chunks_exact(3) {
            let triangle = Triangle::new(chunk[0], chunk[1], chunk[2]);
            if keep(&triangle) {
                kept.extend_from_slice(chunk);
            }
        }
        self.indices = kept;
        self.normals.clear();
    }

    /// Remove a vertex together with every triangle using it
    ///
    /// Indices above the removed vertex shift down by one.
    pub fn remove_vertex(&mut self, index: u32) {
        self.retain_triangles(|t| !t.references(index));
        let i = index as usize * 3;
        self.positions.drain(i..i + 3);
        for v in &mut self.indices {
            if *v > index {
                *v -= 1;
            }
        }
    }

    /// Drop every triangle whose centroid lies outside the hull
    pub fn remove_triangles_outside(&mut self, hull: &SimpleHull) {
        let inside: Vec<bool> = self
            .triangles()
            .map(|t| hull.contains_point(&t.centroid(self)))
            .collect();
        let mut flags = inside.into_iter();
        self.retain_triangles(|_| flags.next().unwrap_or(false));
    }

    /// Drop triangles that collapsed to a line or a point
    ///
    /// Returns the number of triangles removed.
    pub fn remove_degenerate_triangles(&mut self) -> usize {
        let before = self.triangle_count();
        let valid: Vec<bool> = self.triangles().map(|t| !t.is_degenerate(self)).collect();
        let mut flags = valid.into_iter();
        self.retain_triangles(|_| flags.next().unwrap_or(false));
        before - self.triangle_count()
    }

    /// Compute one unit normal per triangle into [`Mesh::normals`]
    pub fn calculate_normals(&mut self) {
        let normals: Vec<Vector3<f32>> = self.triangles().map(|t| t.normal(self)).collect();
        self.normals.clear();
        self.normals.reserve(normals.len() * 3);
        for n in normals {
            self.normals.push(n.x);
            self.normals.push(n.y);
            self.normals.push(n.z);
        }
    }

    /// Flip the winding of every triangle
    pub fn invert_normals(&mut self) {
        for chunk in self.indices.chunks_exact_mut(3) {
            chunk.swap(1, 2);
        }
        for n in &mut self.normals {
            *n = -*n;
        }
    }

    /// Scale every vertex component-wise
    pub fn scale(&mut self, size: &Vector3<f32>) {
        for chunk in self.positions.chunks_exact_mut(3) {
            chunk[0] *= size.x;
            chunk[1] *= size.y;
            chunk[2] *= size.z;
        }
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Calculate bounds (min, max)
    #[inline]
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
