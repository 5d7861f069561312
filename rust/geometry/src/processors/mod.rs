// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Prim processors
//!
//! Each sub-module turns one family of prim descriptors into a mesh:
//!
//! - `profile_extrusion`: box, cylinder, prism, tube, torus and ring
//!   (profile hull, cut, hollow, triangulation, sweep)
//! - `sphere`: subdivided icosahedron
//! - `sculpt`: grid meshes decoded from sculpt map images

mod profile_extrusion;
mod sculpt;
mod sphere;


pub use profile_extrusion::ProfileExtrusionProcessor;
pub use sculpt::SculptProcessor;
pub use sphere::SphereProcessor;
