// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Prim Router - Dynamic dispatch to prim processors
//!
//! Classifies prim descriptors into a [`PrimKind`] and routes them to the
//! processor registered for that kind, then finalises the resulting mesh.

#[cfg(test)]
mod tests;

use crate::config::MesherConfig;
use crate::dump::DumpSink;
use crate::processors::{ProfileExtrusionProcessor, SculptProcessor, SphereProcessor};
use crate::{Error, Mesh, Result};
use nalgebra::Vector3;
use primmesh_core::params::unpack_path_scale;
use primmesh_core::{PathCurve, PrimShape, ProfileShape};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Largest unpacked path scale Y that still meshes as a torus
const TORUS_MAX_PATH_SCALE_Y: f32 = 0.75;

/// Kind of mesh a prim descriptor produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimKind {
    Box,
    Cylinder,
    Prism,
    Tube,
    Torus,
    Ring,
    Sphere,
    Sculpt,
}

/// Decide which kind of mesh a descriptor produces
///
/// Combinations of profile and path without a dedicated mesher fall back to
/// a box.
pub fn classify(shape: &PrimShape) -> Result<PrimKind> {
    shape.validate()?;

    if shape.is_sculpted() {
        return Ok(PrimKind::Sculpt);
    }

    let profile = shape.profile_shape();
    let path = shape.path();
    let kind = match (profile, path) {
        (Some(ProfileShape::Square), Some(PathCurve::Linear)) => Some(PrimKind::Box),
        (Some(ProfileShape::Square), Some(PathCurve::Circle)) => Some(PrimKind::Tube),
        (Some(ProfileShape::Circle), Some(PathCurve::Linear)) => Some(PrimKind::Cylinder),
        (Some(ProfileShape::Circle), Some(PathCurve::Circle))
            if unpack_path_scale(shape.path_scale_y) <= TORUS_MAX_PATH_SCALE_Y =>
        {
            Some(PrimKind::Torus)
        }
        (Some(ProfileShape::HalfCircle), Some(PathCurve::Circle | PathCurve::Curve2)) => {
            Some(PrimKind::Sphere)
        }
        (Some(ProfileShape::EquilateralTriangle), Some(PathCurve::Linear)) => Some(PrimKind::Prism),
        (Some(ProfileShape::EquilateralTriangle), Some(PathCurve::Circle)) => Some(PrimKind::Ring),
        _ => None,
    };

    Ok(kind.unwrap_or_else(|| {
        tracing::debug!(?profile, ?path, "no mesher for this prim, meshing as a box");
        PrimKind::Box
    }))
}

/// Prim processor trait
/// Each processor meshes one or more kinds of prim
pub trait PrimProcessor: Send + Sync {
    /// Mesh a classified prim at its final size
    fn process(&self, kind: PrimKind, request: &MeshRequest, dump: &DumpSink) -> Result<Mesh>;

    /// Get supported prim kinds
    fn supported_kinds(&self) -> Vec<PrimKind>;
}

/// One prim to mesh
#[derive(Debug, Clone, Copy)]
pub struct MeshRequest<'a> {
    /// Name used for logs and raw dump file names
    pub name: &'a str,
    pub shape: &'a PrimShape,
    pub size: Vector3<f32>,
    /// Level of detail; only sculpt maps use it
    pub lod: f32,
}

impl<'a> MeshRequest<'a> {
    pub fn new(name: &'a str, shape: &'a PrimShape, size: Vector3<f32>, lod: f32) -> Self {
        Self {
            name,
            shape,
            size,
            lod,
        }
    }
}

/// Prim mesher - routes descriptors to processors
pub struct Mesher {
    config: MesherConfig,
    dump: DumpSink,
    processors: FxHashMap<PrimKind, Arc<dyn PrimProcessor>>,
}

impl Mesher {
    /// Create new mesher with default processors, configured from the environment
    pub fn new() -> Self {
        Self::with_config(MesherConfig::from_env())
    }

    /// Create new mesher with default processors
    pub fn with_config(config: MesherConfig) -> Self {
        let mut mesher = Self {
            dump: DumpSink::from_dir(config.dump_dir.as_deref()),
            config,
            processors: FxHashMap::default(),
        };

        mesher.register(Box::new(ProfileExtrusionProcessor::new()));
        mesher.register(Box::new(SphereProcessor::new()));
        mesher.register(Box::new(SculptProcessor::new()));

        mesher
    }

    /// Register a prim processor, replacing any earlier one for the same kinds
    pub fn register(&mut self, processor: Box<dyn PrimProcessor>) {
        let processor_arc: Arc<dyn PrimProcessor> = Arc::from(processor);
        for kind in processor_arc.supported_kinds() {
            self.processors.insert(kind, Arc::clone(&processor_arc));
        }
    }

    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    /// Mesh one prim
    ///
    /// The result is scaled to `size`, free of degenerate triangles and
    /// carries one outward normal per triangle.
    pub fn create_mesh(
        &self,
        name: &str,
        shape: &PrimShape,
        size: Vector3<f32>,
        lod: f32,
    ) -> Result<Mesh> {
        self.process(&MeshRequest::new(name, shape, size, lod))
    }

    /// Mesh many prims in parallel
    ///
    /// Results are returned in request order.
    pub fn create_meshes(&self, requests: &[MeshRequest]) -> Vec<Result<Mesh>> {
        requests
            .par_iter()
            .map(|request| self.process(request))
            .collect()
    }

    fn process(&self, request: &MeshRequest) -> Result<Mesh> {
        if !request.size.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidShape(format!(
                "prim {} has non-finite size {:?}",
                request.name, request.size
            )));
        }
        if !request.lod.is_finite() {
            return Err(Error::InvalidShape(format!(
                "prim {} has non-finite level of detail {}",
                request.name, request.lod
            )));
        }

        if self.config.report_shapes {
            report_shape(request);
        }

        let kind = classify(request.shape)?;
        let processor = self.processors.get(&kind).ok_or_else(|| {
            Error::InvalidShape(format!("no processor registered for {:?}", kind))
        })?;
        tracing::debug!(prim = request.name, ?kind, "meshing prim");

        let mut mesh = processor.process(kind, request, &self.dump)?;
        // An odd number of negative size components mirrors the mesh
        if request.size.x * request.size.y * request.size.z < 0.0 {
            mesh.invert_normals();
        }

        let dropped = mesh.remove_degenerate_triangles();
        if dropped > 0 {
            tracing::debug!(prim = request.name, dropped, "dropped degenerate triangles");
        }
        mesh.calculate_normals();

        if mesh.triangle_count() == 0 {
            tracing::warn!(prim = request.name, ?kind, "prim produced an empty mesh");
        }

        Ok(mesh)
    }
}

impl Default for Mesher {
    fn default() -> Self {
        Self::new()
    }
}

/// Mesh one prim with a quiet default mesher
pub fn build_mesh(shape: &PrimShape, size: Vector3<f32>, lod: f32) -> Result<Mesh> {
    Mesher::with_config(MesherConfig::quiet()).create_mesh("prim", shape, size, lod)
}

fn report_shape(request: &MeshRequest) {
    let shape = request.shape;
    tracing::trace!(
        prim = request.name,
        size = ?request.size,
        lod = request.lod,
        profile_curve = shape.profile_curve,
        profile_begin = shape.profile_begin,
        profile_end = shape.profile_end,
        profile_hollow = shape.profile_hollow,
        path_curve = shape.path_curve,
        path_begin = shape.path_begin,
        path_end = shape.path_end,
        path_scale_x = shape.path_scale_x,
        path_scale_y = shape.path_scale_y,
        path_shear_x = shape.path_shear_x,
        path_shear_y = shape.path_shear_y,
        path_twist = shape.path_twist,
        path_twist_begin = shape.path_twist_begin,
        path_radius_offset = shape.path_radius_offset,
        path_taper_x = shape.path_taper_x,
        path_taper_y = shape.path_taper_y,
        path_revolutions = shape.path_revolutions,
        path_skew = shape.path_skew,
        sculpt_type = shape.sculpt_type,
        sculpt_bytes = shape.sculpt_data.len(),
        "prim parameters"
    );
}
