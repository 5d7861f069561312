// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during mesh generation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Invalid extrusion parameters: {0}")]
    InvalidExtrusion(String),

    #[error("Invalid sculpt map: {0}")]
    InvalidSculpt(String),

    #[error("Empty mesh: {0}")]
    EmptyMesh(String),

    #[error("Shape descriptor error: {0}")]
    CoreError(#[from] primmesh_core::Error),
}

impl Error {
    pub(crate) fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }
}
