// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw triangle dumps for inspecting intermediate meshes
//!
//! Each dump is an ASCII file with one triangle per line: the three corner
//! positions as nine space separated floats with six decimals. Dumps are
//! only written when a base directory is configured.

use crate::mesh::Mesh;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination of raw mesh dumps
#[derive(Debug, Clone, Default)]
pub struct DumpSink {
    base_dir: Option<PathBuf>,
}

impl DumpSink {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { base_dir: None }
    }

    pub fn from_dir(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.base_dir.is_some()
    }

    /// Write `<base_dir>/<prim_name>_<stage>.raw`
    ///
    /// Failures are logged and otherwise ignored.
    pub fn dump_raw(&self, mesh: &Mesh, prim_name: &str, stage: &str) {
        let Some(dir) = &self.base_dir else {
            return;
        };

        let path = dir.join(format!("{}_{}.raw", sanitize(prim_name), stage));
        let result = File::create(&path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            write_raw(mesh, &mut writer)?;
            writer.flush()
        });

        match result {
            Ok(()) => tracing::trace!(path = %path.display(), "wrote raw mesh dump"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to write raw mesh dump"),
        }
    }
}

/// Write every triangle of `mesh` in the raw dump format
pub fn write_raw<W: Write>(mesh: &Mesh, writer: &mut W) -> io::Result<()> {
    for triangle in mesh.triangles() {
        let [a, b, c] = triangle.corners(mesh);
        writeln!(
            writer,
            "{:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
            a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z
        )?;
    }
    Ok(())
}

/// Keep prim names from escaping the dump directory
fn sanitize(prim_name: &str) -> String {
    prim_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect()
}
