// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # primmesh Core
//!
//! Shape descriptors for parametric prims and the fixed-point conventions
//! used to decode them.
//!
//! ## Overview
//!
//! - **Shape descriptor**: [`PrimShape`] carries the packed profile, path and
//!   sculpt parameters exactly as they travel on the wire
//! - **Shape enums**: [`ProfileShape`], [`HollowShape`], [`PathCurve`] and
//!   [`SculptType`] decode the packed curve bytes
//! - **Parameter decoding**: [`params`] turns the integer encodings into the
//!   floats consumed by the mesher (taper, shear, twist, cuts, revolutions)
//!
//! ## Quick Start
//!
//! ```rust
//! use primmesh_core::{PrimShape, ProfileShape, PathCurve};
//!
//! let shape = PrimShape::cylinder().with_hollow(25_000);
//! assert_eq!(shape.profile_shape(), Some(ProfileShape::Circle));
//! assert_eq!(shape.path(), Some(PathCurve::Linear));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: derive `Serialize`/`Deserialize` for the descriptor types

pub mod error;
pub mod params;
pub mod shape;

pub use error::{Error, Result};
pub use shape::{HollowShape, PathCurve, PrimShape, ProfileShape, SculptType};
