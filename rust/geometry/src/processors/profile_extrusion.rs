// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile extrusion processor - every prim built from a swept profile.

use crate::{
    dump::DumpSink,
    extrusion::{CircularPath, Extruder, LinearPath, PathSpec},
    hull::SimpleHull,
    profile::{
        circle_hull, circular_hollow_shape, circular_triangle_hole_hull, cut_hull, hole_hull,
        prism_hull, ring_hull, square_hull,
    },
    triangulation::triangulate,
    Error, Mesh, Result,
};
use primmesh_core::params::CUT_QUANTA;
use primmesh_core::{HollowShape, PrimShape, ProfileShape};
use std::f32::consts::PI;

use crate::router::{MeshRequest, PrimKind, PrimProcessor};

/// Rotation of the box cut frame relative to the profile, in degrees
const BOX_CUT_OFFSET: f64 = 135.0;

/// How one prim kind builds its profile and path
#[derive(Debug, Clone, Copy)]
struct Family {
    profile: ProfileShape,
    outer: fn() -> SimpleHull,
    cut_offset: f64,
    circular: bool,
}

impl Family {
    fn new(profile: ProfileShape, outer: fn() -> SimpleHull, cut_offset: f64, circular: bool) -> Self {
        Self {
            profile,
            outer,
            cut_offset,
            circular,
        }
    }

    fn of(kind: PrimKind) -> Option<Self> {
        let family = match kind {
            PrimKind::Box => Self::new(ProfileShape::Square, square_hull, BOX_CUT_OFFSET, false),
            PrimKind::Cylinder => Self::new(ProfileShape::Circle, circle_hull, 0.0, false),
            PrimKind::Prism => Self::new(ProfileShape::EquilateralTriangle, prism_hull, 0.0, false),
            PrimKind::Tube => Self::new(ProfileShape::Square, square_hull, 0.0, true),
            PrimKind::Torus => Self::new(ProfileShape::Circle, circle_hull, 0.0, true),
            PrimKind::Ring => Self::new(ProfileShape::EquilateralTriangle, ring_hull, 0.0, true),
            PrimKind::Sphere | PrimKind::Sculpt => return None,
        };
        Some(family)
    }
}

/// Box, cylinder, prism, tube, torus and ring processor
///
/// The outer profile hull has its profile cut and hollow subtracted, is
/// triangulated and then swept along a linear or circular path.
pub struct ProfileExtrusionProcessor;

impl ProfileExtrusionProcessor {
    /// Create new processor
    pub fn new() -> Self {
        Self
    }

    /// Profile hull after cut and hollow subtraction
    fn build_hull(&self, kind: PrimKind, family: &Family, shape: &PrimShape, name: &str) -> SimpleHull {
        let mut hull = (family.outer)();

        if let Some(cut) = cut_hull(shape.profile_begin, shape.profile_end, family.cut_offset) {
            match SimpleHull::subtract_hull(&hull, &cut) {
                Ok(result) => {
                    hull = result;
                    if kind == PrimKind::Torus {
                        hull.rotate_z(PI);
                    }
                }
                Err(e) => tracing::warn!(prim = name, error = %e, "skipping profile cut"),
            }
        }

        if shape.profile_hollow > CUT_QUANTA {
            tracing::warn!(
                prim = name,
                hollow = shape.profile_hollow,
                "skipping oversized hollow"
            );
        } else if let Some(hole) = self.hole(family, shape) {
            match SimpleHull::subtract_hull(&hull, &hole) {
                Ok(result) => hull = result,
                Err(e) => tracing::warn!(prim = name, error = %e, "skipping hollow"),
            }
        }

        hull
    }

    fn hole(&self, family: &Family, shape: &PrimShape) -> Option<SimpleHull> {
        if !family.circular {
            return hole_hull(family.profile, shape.hollow_shape(), shape.profile_hollow, true);
        }
        if shape.profile_hollow == 0 {
            return None;
        }
        match circular_hollow_shape(family.profile, shape.hollow_shape()) {
            HollowShape::Triangle => Some(circular_triangle_hole_hull(
                family.profile,
                shape.profile_hollow,
            )),
            resolved => hole_hull(family.profile, resolved, shape.profile_hollow, false),
        }
    }
}

impl Default for ProfileExtrusionProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimProcessor for ProfileExtrusionProcessor {
    fn process(&self, kind: PrimKind, request: &MeshRequest, dump: &DumpSink) -> Result<Mesh> {
        let family = Family::of(kind)
            .ok_or_else(|| Error::InvalidShape(format!("{:?} is not a profile extrusion", kind)))?;
        let shape = request.shape;

        let hull = self.build_hull(kind, &family, shape, request.name);
        let mut profile = triangulate(&hull, dump, request.name)?;

        let path = if family.circular {
            let path = CircularPath::from_shape(shape);
            let scale = path.profile_scale();
            for index in 0..profile.mesh.vertex_count() as u32 {
                let mut v = profile.mesh.vertex(index);
                v.x *= scale.x;
                v.y *= scale.y;
                profile.mesh.set_vertex(index, v);
            }
            PathSpec::Circular(path)
        } else {
            PathSpec::Linear(LinearPath::from_shape(shape))
        };

        tracing::debug!(
            prim = request.name,
            kind = ?kind,
            profile_vertices = profile.mesh.vertex_count(),
            profile_triangles = profile.mesh.triangle_count(),
            "extruding profile"
        );

        let mesh = Extruder::new(request.size).extrude(&profile, &path)?;
        dump.dump_raw(&mesh, request.name, "Z extruded");
        Ok(mesh)
    }

    fn supported_kinds(&self) -> Vec<PrimKind> {
        vec![
            PrimKind::Box,
            PrimKind::Cylinder,
            PrimKind::Prism,
            PrimKind::Tube,
            PrimKind::Torus,
            PrimKind::Ring,
        ]
    }
}
