// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - sweeping 2D profiles into 3D meshes
//!
//! A triangulated profile is copied into a sequence of layers along the
//! path. Consecutive layers are stitched with side-wall quads along every
//! hull ring; the first and last layers receive caps unless the sweep closes
//! on itself.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::primitives::{rotate_z, Vertex};
use crate::triangulation::Triangulation;
use nalgebra::{Point3, UnitQuaternion, Vector2, Vector3};
use primmesh_core::params::{
    circular_path_scale, circular_twist, linear_taper, linear_twist, path_cut_begin, path_cut_end,
    revolutions, shear_offset, signed_percent,
};
use primmesh_core::PrimShape;
use std::f32::consts::{PI, TAU};

/// Angular step of circular sweeps and of twisted linear extrusions
const SWEEP_STEP: f32 = PI / 12.0;

/// Layers closer than this are welded when a sweep returns to its start
const WELD_TOLERANCE: f32 = 1e-5;

/// Slack when dividing a sweep into steps so rounding does not add a layer
const STEP_SLACK: f32 = 1e-4;

fn step_count(sweep: f32, step: f32) -> usize {
    ((sweep / step - STEP_SLACK).ceil() as usize).max(1)
}

/// Straight extrusion from z = -0.5 to z = +0.5
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPath {
    pub taper_top: Vector2<f32>,
    pub taper_bottom: Vector2<f32>,
    /// Offset of the top layer relative to the bottom one
    pub shear: Vector2<f32>,
    pub twist_top: f32,
    pub twist_bottom: f32,
}

impl Default for LinearPath {
    fn default() -> Self {
        Self {
            taper_top: Vector2::new(1.0, 1.0),
            taper_bottom: Vector2::new(1.0, 1.0),
            shear: Vector2::zeros(),
            twist_top: 0.0,
            twist_bottom: 0.0,
        }
    }
}

impl LinearPath {
    pub fn from_shape(shape: &PrimShape) -> Self {
        let taper_x = linear_taper(shape.path_scale_x);
        let taper_y = linear_taper(shape.path_scale_y);
        Self {
            taper_top: Vector2::new(taper_x.top, taper_y.top),
            taper_bottom: Vector2::new(taper_x.bottom, taper_y.bottom),
            shear: Vector2::new(
                shear_offset(shape.path_shear_x),
                shear_offset(shape.path_shear_y),
            ),
            twist_top: linear_twist(shape.path_twist),
            twist_bottom: linear_twist(shape.path_twist_begin),
        }
    }
}

/// Sweep around the X axis (torus, tube and ring families)
#[derive(Debug, Clone, PartialEq)]
pub struct CircularPath {
    /// Hole size of the sweep; Y also sets the profile thickness
    pub path_scale: Vector2<f32>,
    /// Start of the sweep as a fraction of one revolution set
    pub cut_begin: f32,
    pub cut_end: f32,
    pub skew: f32,
    pub revolutions: f32,
    pub taper: Vector2<f32>,
    pub radius: f32,
    pub shear_y: f32,
    pub twist_top: f32,
    pub twist_bottom: f32,
}

impl CircularPath {
    pub fn from_shape(shape: &PrimShape) -> Self {
        Self {
            path_scale: Vector2::new(
                circular_path_scale(shape.path_scale_x),
                circular_path_scale(shape.path_scale_y),
            ),
            cut_begin: path_cut_begin(shape.path_begin),
            cut_end: path_cut_end(shape.path_end),
            skew: signed_percent(shape.path_skew),
            revolutions: revolutions(shape.path_revolutions),
            taper: Vector2::new(
                signed_percent(shape.path_taper_x),
                signed_percent(shape.path_taper_y),
            ),
            radius: signed_percent(shape.path_radius_offset),
            shear_y: shear_offset(shape.path_shear_y),
            twist_top: circular_twist(shape.path_twist),
            twist_bottom: circular_twist(shape.path_twist_begin),
        }
    }

    /// Scale applied to the flat profile before sweeping
    pub fn profile_scale(&self) -> Vector2<f32> {
        Vector2::new(
            self.path_scale.x * (1.0 - self.skew.abs()),
            self.path_scale.y,
        )
    }
}

/// Path a profile is swept along
#[derive(Debug, Clone, PartialEq)]
pub enum PathSpec {
    Linear(LinearPath),
    Circular(CircularPath),
}

/// Sweeps triangulated profiles into prim meshes of a given size
#[derive(Debug, Clone)]
pub struct Extruder {
    size: Vector3<f32>,
}

impl Extruder {
    pub fn new(size: Vector3<f32>) -> Self {
        Self { size }
    }

    pub fn extrude(&self, profile: &Triangulation, path: &PathSpec) -> Result<Mesh> {
        let profile_vertices: Vec<Vertex> = profile.mesh.vertices().collect();
        if profile_vertices.is_empty() {
            return Err(Error::InvalidExtrusion("profile has no vertices".to_string()));
        }

        let layers = match path {
            PathSpec::Linear(linear) => linear_layers(&profile_vertices, linear),
            PathSpec::Circular(circular) => circular_layers(&profile_vertices, circular),
        };

        let mut mesh = assemble(profile, layers);
        mesh.scale(&self.size);
        Ok(mesh)
    }
}

fn linear_layers(profile: &[Vertex], path: &LinearPath) -> Vec<Vec<Vertex>> {
    let twist_total = path.twist_top - path.twist_bottom;
    let steps = if twist_total.abs() > f32::EPSILON {
        step_count(twist_total.abs(), SWEEP_STEP)
    } else {
        1
    };

    (0..=steps)
        .map(|k| {
            let t = k as f32 / steps as f32;
            let z = -0.5 + t;
            let taper = path.taper_bottom + (path.taper_top - path.taper_bottom) * t;
            let twist = path.twist_bottom + twist_total * t;
            let offset = path.shear * t;

            profile
                .iter()
                .map(|v| {
                    let mut p = Point3::new(v.x * taper.x, v.y * taper.y, 0.0);
                    if twist != 0.0 {
                        p = rotate_z(&p, twist);
                    }
                    Point3::new(p.x + offset.x, p.y + offset.y, z)
                })
                .collect()
        })
        .collect()
}

fn circular_layers(profile: &[Vertex], path: &CircularPath) -> Vec<Vec<Vertex>> {
    let (cut_begin, cut_end) = if path.cut_end > path.cut_begin {
        (path.cut_begin, path.cut_end)
    } else {
        tracing::warn!(
            cut_begin = path.cut_begin,
            cut_end = path.cut_end,
            "empty path cut, sweeping the whole path"
        );
        (path_cut_begin(0), path_cut_end(0))
    };
    let twist_total = path.twist_top - path.twist_bottom;

    let mut step = SWEEP_STEP;
    if twist_total.abs() > 1.5 {
        step *= 0.5;
    }
    if twist_total.abs() > 3.0 {
        step *= 0.5;
    }

    let y_path_scale = path.path_scale.y * 0.5;
    let path_length = cut_end - cut_begin;
    let total_skew = path.skew * 2.0 * path_length;
    let skew_start = -path.skew + cut_begin * 2.0 * path.skew;

    let start_angle = TAU * cut_begin * path.revolutions - path.shear_y * 0.9;
    let end_angle = TAU * cut_end * path.revolutions - path.shear_y * 0.9;
    let sweep = end_angle - start_angle;

    let steps = step_count(sweep, step);

    (0..=steps)
        .map(|k| {
            let percent = k as f32 / steps as f32;
            let angle = start_angle + sweep * percent;

            let mut profile_scale = Vector2::new(1.0f32, 1.0);
            for axis in 0..2 {
                let taper = path.taper[axis];
                if taper > 0.001 {
                    profile_scale[axis] = 1.0 - percent * taper;
                } else if taper < -0.001 {
                    profile_scale[axis] = 1.0 + (1.0 - percent) * taper;
                }
            }

            let radius_scale = if path.radius > 0.001 {
                1.0 - path.radius * percent
            } else if path.radius < -0.001 {
                1.0 + path.radius * (1.0 - percent)
            } else {
                1.0
            };

            let twist = path.twist_bottom + twist_total * percent;
            let path_radius = (0.5 - y_path_scale) * radius_scale;
            let offset = Vector3::new(
                0.5 * (skew_start + total_skew * percent),
                (angle + path.shear_y * 0.9).cos() * path_radius,
                (angle + path.shear_y * 0.9).sin() * path_radius,
            );
            let about_path = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angle);

            profile
                .iter()
                .map(|v| {
                    let mut p = Point3::new(v.x * profile_scale.x, v.y * profile_scale.y, 0.0);
                    if twist != 0.0 {
                        p = rotate_z(&p, twist);
                    }
                    about_path * p + offset
                })
                .collect()
        })
        .collect()
}

/// Whether two layers coincide vertex by vertex
fn layers_coincide(a: &[Vertex], b: &[Vertex]) -> bool {
    a.iter()
        .zip(b)
        .all(|(p, q)| (p - q).amax() <= WELD_TOLERANCE)
}

/// Stitch profile layers into a mesh
fn assemble(profile: &Triangulation, mut layers: Vec<Vec<Vertex>>) -> Mesh {
    let closed = layers.len() > 2
        && match (layers.first(), layers.last()) {
            (Some(first), Some(last)) => layers_coincide(first, last),
            _ => false,
        };
    if closed {
        layers.pop();
    }

    let n = profile.mesh.vertex_count() as u32;
    let layer_count = layers.len() as u32;
    let segments = if closed { layer_count } else { layer_count - 1 };
    let ring_ranges = profile.ring_ranges();
    let side_triangles: usize = profile.ring_lengths.iter().sum::<usize>() * 2;

    let mut mesh = Mesh::with_capacity(
        (n * layer_count) as usize,
        side_triangles * segments as usize + profile.mesh.triangle_count() * 2,
    );
    for layer in &layers {
        for v in layer {
            mesh.add_vertex(*v);
        }
    }

    for k in 0..segments {
        let lower = k * n;
        let upper = ((k + 1) % layer_count) * n;
        for ring in &ring_ranges {
            for a in ring.clone() {
                let b = if a + 1 == ring.end { ring.start } else { a + 1 };
                mesh.add_triangle(lower + a, lower + b, upper + b);
                mesh.add_triangle(lower + a, upper + b, upper + a);
            }
        }
    }

    if !closed {
        let top = (layer_count - 1) * n;
        for t in profile.mesh.triangles() {
            let bottom = t.inverted();
            mesh.add_triangle(bottom.v1, bottom.v2, bottom.v3);
            mesh.add_triangle(top + t.v1, top + t.v2, top + t.v3);
        }
    }

    mesh
}
