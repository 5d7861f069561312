// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesher configuration loaded from environment variables.

use std::path::PathBuf;

/// Mesher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MesherConfig {
    /// Directory receiving raw dumps of intermediate meshes, if any.
    pub dump_dir: Option<PathBuf>,
    /// Log every shape's decoded parameters before meshing.
    pub report_shapes: bool,
}

impl MesherConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            dump_dir: std::env::var("PRIMMESH_DUMP_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            report_shapes: std::env::var("PRIMMESH_REPORT_SHAPES")
                .map(|value| parse_flag(&value))
                .unwrap_or(false),
        }
    }

    /// Configuration with dumps and shape reports turned off.
    pub fn quiet() -> Self {
        Self {
            dump_dir: None,
            report_shapes: false,
        }
    }
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
