// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sculpt processor - meshes decoded from sculpt map images.
//!
//! Every pixel of the sculpt map is a vertex whose RGB channels hold its
//! X, Y and Z position. Neighbouring pixels are joined into a quad grid.

use crate::{dump::DumpSink, Error, Mesh, Result};
use image::imageops::{self, FilterType};
use image::RgbImage;
use nalgebra::Point3;
use primmesh_core::SculptType;

use crate::router::{MeshRequest, PrimKind, PrimProcessor};

const MIN_LOD: u32 = 2;
const MAX_LOD: u32 = 64;

/// Decode the sculpt map and shrink it to at most `lod * lod` pixels
fn load_sculpt_map(data: &[u8], lod: f32) -> Result<RgbImage> {
    let image = image::load_from_memory(data).map_err(|e| Error::InvalidSculpt(e.to_string()))?;
    let mut map = image.to_rgb8();

    let (width, height) = map.dimensions();
    if width < 2 || height < 2 {
        return Err(Error::InvalidSculpt(format!(
            "sculpt map is {}x{}, need at least 2x2",
            width, height
        )));
    }

    let lod = (lod as u32).clamp(MIN_LOD, MAX_LOD);
    let budget = lod * lod;
    while map.width() * map.height() > budget && (map.width() > 2 || map.height() > 2) {
        let w = (map.width() / 2).max(2);
        let h = (map.height() / 2).max(2);
        map = imageops::resize(&map, w, h, FilterType::Nearest);
    }

    Ok(map)
}

/// Quad grid over the sculpt map pixels, wrapping where the sculpt type is closed
fn sculpt_grid(map: &RgbImage, kind: SculptType) -> Mesh {
    let (width, height) = map.dimensions();
    let wrap_u = kind.wraps_u() && width > 2;
    let wrap_v = kind.wraps_v() && height > 2;

    let columns = if wrap_u { width } else { width - 1 };
    let rows = if wrap_v { height } else { height - 1 };
    let mut mesh = Mesh::with_capacity(
        (width * height) as usize,
        (columns * rows * 2) as usize,
    );

    for pixel in map.pixels() {
        let [r, g, b] = pixel.0;
        mesh.add_vertex(Point3::new(
            r as f32 / 255.0 * 2.0 - 1.0,
            g as f32 / 255.0 * 2.0 - 1.0,
            b as f32 / 255.0 * 2.0 - 1.0,
        ));
    }

    let index = |x: u32, y: u32| (y % height) * width + (x % width);
    for y in 0..rows {
        for x in 0..columns {
            let p00 = index(x, y);
            let p01 = index(x + 1, y);
            let p10 = index(x, y + 1);
            let p11 = index(x + 1, y + 1);
            mesh.add_triangle(p00, p01, p11);
            mesh.add_triangle(p00, p11, p10);
        }
    }

    mesh
}

/// Sculpted prim processor
pub struct SculptProcessor;

impl SculptProcessor {
    /// Create new processor
    pub fn new() -> Self {
        Self
    }
}

impl Default for SculptProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimProcessor for SculptProcessor {
    fn process(&self, _kind: PrimKind, request: &MeshRequest, dump: &DumpSink) -> Result<Mesh> {
        let shape = request.shape;
        let map = load_sculpt_map(&shape.sculpt_data, request.lod)?;
        tracing::debug!(
            prim = request.name,
            width = map.width(),
            height = map.height(),
            sculpt_type = ?shape.sculpt_kind(),
            "meshing sculpt map"
        );

        let mut mesh = sculpt_grid(&map, shape.sculpt_kind());
        mesh.scale(&(request.size * 0.5));
        mesh.invert_normals();

        dump.dump_raw(&mesh, request.name, "Sculpt");
        Ok(mesh)
    }

    fn supported_kinds(&self) -> Vec<PrimKind> {
        vec![PrimKind::Sculpt]
    }
}
