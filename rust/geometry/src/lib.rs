// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Primmesh Geometry Processing
//!
//! Turns parametric prim descriptors into triangle meshes: profile hulls
//! are cut and hollowed with i_overlay, triangulated by incremental
//! Delaunay insertion with exact predicates from `robust`, and swept along
//! linear or circular paths. Spheres and sculpt maps have their own
//! processors.
//!
//! ```
//! use primmesh_core::PrimShape;
//! use primmesh_geometry::{build_mesh, Vector3};
//!
//! let mesh = build_mesh(&PrimShape::box_shape(), Vector3::new(1.0, 2.0, 3.0), 32.0).unwrap();
//! assert_eq!(mesh.triangle_count(), 12);
//! ```

pub mod config;
pub mod dump;
pub mod error;
pub mod extrusion;
pub mod hull;
pub mod mesh;
pub mod primitives;
pub mod processors;
pub mod profile;
pub mod router;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector2, Vector3};

pub use config::MesherConfig;
pub use dump::DumpSink;
pub use error::{Error, Result};
pub use extrusion::{CircularPath, Extruder, LinearPath, PathSpec};
pub use hull::{HullPoint, SimpleHull};
pub use mesh::Mesh;
pub use primitives::{Simplex, Triangle, Vertex};
pub use processors::{ProfileExtrusionProcessor, SculptProcessor, SphereProcessor};
pub use router::{build_mesh, classify, MeshRequest, Mesher, PrimKind, PrimProcessor};
pub use triangulation::{triangulate, Triangulation};
