// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Prim shape descriptor and the enums packed into its curve bytes

use crate::error::{Error, Result};
use crate::params::{CUT_QUANTA, PATH_SCALE_MAX, PATH_SCALE_NEUTRAL};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Profile (cross-section) shape, stored in the low bits of `profile_curve`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ProfileShape {
    Circle = 0,
    Square = 1,
    IsometricTriangle = 2,
    EquilateralTriangle = 3,
    RightTriangle = 4,
    HalfCircle = 5,
}

impl ProfileShape {
    const MASK: u8 = 0x07;

    /// Decode the profile shape from a packed profile curve byte
    pub fn from_profile_curve(profile_curve: u8) -> Option<Self> {
        match profile_curve & Self::MASK {
            0 => Some(Self::Circle),
            1 => Some(Self::Square),
            2 => Some(Self::IsometricTriangle),
            3 => Some(Self::EquilateralTriangle),
            4 => Some(Self::RightTriangle),
            5 => Some(Self::HalfCircle),
            _ => None,
        }
    }
}

/// Hollow (hole) shape, stored in the high nibble of `profile_curve`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum HollowShape {
    /// Hole follows the profile shape
    #[default]
    Same = 0x00,
    Circle = 0x10,
    Square = 0x20,
    Triangle = 0x30,
}

impl HollowShape {
    const MASK: u8 = 0xf0;

    /// Decode the hollow shape; unknown values read as [`HollowShape::Same`]
    pub fn from_profile_curve(profile_curve: u8) -> Self {
        match profile_curve & Self::MASK {
            0x10 => Self::Circle,
            0x20 => Self::Square,
            0x30 => Self::Triangle,
            _ => Self::Same,
        }
    }
}

/// Extrusion path type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PathCurve {
    /// Straight extrusion along Z
    Linear = 0x10,
    /// Circular sweep (torus, tube, ring, sphere)
    Circle = 0x20,
    Curve2 = 0x30,
    Test = 0x40,
    Flexible = 0x80,
}

impl PathCurve {
    pub fn from_path_curve(path_curve: u8) -> Option<Self> {
        match path_curve {
            0x10 => Some(Self::Linear),
            0x20 => Some(Self::Circle),
            0x30 => Some(Self::Curve2),
            0x40 => Some(Self::Test),
            0x80 => Some(Self::Flexible),
            _ => None,
        }
    }
}

/// Sculpt map stitching type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum SculptType {
    #[default]
    None = 0,
    Sphere = 1,
    Torus = 2,
    Plane = 3,
    Cylinder = 4,
}

impl SculptType {
    const MASK: u8 = 0x07;

    /// Decode the stitching type; values outside the known range stitch as a plane
    pub fn from_sculpt_type(sculpt_type: u8) -> Self {
        match sculpt_type & Self::MASK {
            0 => Self::None,
            1 => Self::Sphere,
            2 => Self::Torus,
            4 => Self::Cylinder,
            _ => Self::Plane,
        }
    }

    /// Whether the sculpt grid wraps around in U
    pub fn wraps_u(self) -> bool {
        matches!(self, Self::Sphere | Self::Torus | Self::Cylinder)
    }

    /// Whether the sculpt grid wraps around in V
    pub fn wraps_v(self) -> bool {
        matches!(self, Self::Torus)
    }
}

/// Packed description of a parametric prim
///
/// Field encodings follow the wire format: cut and hollow ranges are
/// quantised to `0..=50000`, scales and tapers are percent-like bytes with
/// `100` as neutral, shear bytes carry signed semantics above `127`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrimShape {
    /// Low 3 bits: profile shape, high nibble: hollow shape
    pub profile_curve: u8,
    pub profile_begin: u16,
    pub profile_end: u16,
    pub profile_hollow: u16,
    pub path_curve: u8,
    pub path_begin: u16,
    pub path_end: u16,
    pub path_scale_x: u8,
    pub path_scale_y: u8,
    pub path_shear_x: u8,
    pub path_shear_y: u8,
    pub path_twist: i16,
    pub path_twist_begin: i16,
    pub path_radius_offset: i8,
    pub path_taper_x: i8,
    pub path_taper_y: i8,
    pub path_revolutions: u8,
    pub path_skew: i8,
    pub sculpt_entry: bool,
    pub sculpt_type: u8,
    /// Encoded sculpt map image
    pub sculpt_data: Vec<u8>,
}

impl Default for PrimShape {
    fn default() -> Self {
        Self::box_shape()
    }
}

impl PrimShape {
    fn with_curves(profile: ProfileShape, path: PathCurve) -> Self {
        Self {
            profile_curve: profile as u8,
            profile_begin: 0,
            profile_end: 0,
            profile_hollow: 0,
            path_curve: path as u8,
            path_begin: 0,
            path_end: 0,
            path_scale_x: PATH_SCALE_NEUTRAL,
            path_scale_y: PATH_SCALE_NEUTRAL,
            path_shear_x: 0,
            path_shear_y: 0,
            path_twist: 0,
            path_twist_begin: 0,
            path_radius_offset: 0,
            path_taper_x: 0,
            path_taper_y: 0,
            path_revolutions: 0,
            path_skew: 0,
            sculpt_entry: false,
            sculpt_type: 0,
            sculpt_data: Vec::new(),
        }
    }

    pub fn box_shape() -> Self {
        Self::with_curves(ProfileShape::Square, PathCurve::Linear)
    }

    pub fn cylinder() -> Self {
        Self::with_curves(ProfileShape::Circle, PathCurve::Linear)
    }

    pub fn prism() -> Self {
        Self::with_curves(ProfileShape::EquilateralTriangle, PathCurve::Linear)
    }

    pub fn sphere() -> Self {
        Self::with_curves(ProfileShape::HalfCircle, PathCurve::Circle)
    }

    /// Circle profile on a circular path with the default 0.25 hole size
    pub fn torus() -> Self {
        Self {
            path_scale_y: 175,
            ..Self::with_curves(ProfileShape::Circle, PathCurve::Circle)
        }
    }

    /// Square profile on a circular path
    pub fn tube() -> Self {
        Self {
            path_scale_y: 175,
            ..Self::with_curves(ProfileShape::Square, PathCurve::Circle)
        }
    }

    /// Triangle profile on a circular path
    pub fn ring() -> Self {
        Self {
            path_scale_y: 175,
            ..Self::with_curves(ProfileShape::EquilateralTriangle, PathCurve::Circle)
        }
    }

    /// Sculpted prim backed by an encoded sculpt map
    pub fn sculpt(sculpt_type: SculptType, data: Vec<u8>) -> Self {
        Self {
            sculpt_entry: true,
            sculpt_type: sculpt_type as u8,
            sculpt_data: data,
            ..Self::sphere()
        }
    }

    pub fn with_profile_cut(mut self, begin: u16, end: u16) -> Self {
        self.profile_begin = begin;
        self.profile_end = end;
        self
    }

    pub fn with_hollow(mut self, hollow: u16) -> Self {
        self.profile_hollow = hollow;
        self
    }

    pub fn with_hollow_shape(mut self, hollow_shape: HollowShape) -> Self {
        self.profile_curve = (self.profile_curve & ProfileShape::MASK) | hollow_shape as u8;
        self
    }

    pub fn with_path_cut(mut self, begin: u16, end: u16) -> Self {
        self.path_begin = begin;
        self.path_end = end;
        self
    }

    pub fn profile_shape(&self) -> Option<ProfileShape> {
        ProfileShape::from_profile_curve(self.profile_curve)
    }

    pub fn hollow_shape(&self) -> HollowShape {
        HollowShape::from_profile_curve(self.profile_curve)
    }

    pub fn path(&self) -> Option<PathCurve> {
        PathCurve::from_path_curve(self.path_curve)
    }

    pub fn sculpt_kind(&self) -> SculptType {
        SculptType::from_sculpt_type(self.sculpt_type)
    }

    /// Whether this descriptor should be meshed from its sculpt map
    pub fn is_sculpted(&self) -> bool {
        self.sculpt_entry && self.sculpt_type != 0 && !self.sculpt_data.is_empty()
    }

    /// Reject descriptors that cannot describe any prim
    ///
    /// Cut ranges above [`CUT_QUANTA`], path scales above [`PATH_SCALE_MAX`]
    /// and sculpt entries without a sculpt map are errors. Everything else
    /// is meshed: an oversized hollow is skipped and combinations the
    /// mesher does not recognise fall back to a box.
    pub fn validate(&self) -> Result<()> {
        if self.sculpt_entry && self.sculpt_data.is_empty() {
            return Err(Error::EmptySculptData);
        }

        let ranges = [
            ("profile_begin", self.profile_begin),
            ("profile_end", self.profile_end),
            ("path_begin", self.path_begin),
            ("path_end", self.path_end),
        ];
        for (name, value) in ranges {
            if value > CUT_QUANTA {
                return Err(Error::InvalidParameter(format!(
                    "{} {} exceeds {}",
                    name, value, CUT_QUANTA
                )));
            }
        }

        let scales = [
            ("path_scale_x", self.path_scale_x),
            ("path_scale_y", self.path_scale_y),
        ];
        for (name, value) in scales {
            if value > PATH_SCALE_MAX {
                return Err(Error::InvalidParameter(format!(
                    "{} {} exceeds {}",
                    name, value, PATH_SCALE_MAX
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_curve_packing() {
        let shape = PrimShape::box_shape().with_hollow_shape(HollowShape::Triangle);
        assert_eq!(shape.profile_curve, 0x31);
        assert_eq!(shape.profile_shape(), Some(ProfileShape::Square));
        assert_eq!(shape.hollow_shape(), HollowShape::Triangle);
    }

    #[test]
    fn test_unknown_profile_shape() {
        assert_eq!(ProfileShape::from_profile_curve(0x06), None);
        assert_eq!(ProfileShape::from_profile_curve(0x25), Some(ProfileShape::HalfCircle));
    }

    #[test]
    fn test_path_curve_decoding() {
        assert_eq!(PathCurve::from_path_curve(0x10), Some(PathCurve::Linear));
        assert_eq!(PathCurve::from_path_curve(0x30), Some(PathCurve::Curve2));
        assert_eq!(PathCurve::from_path_curve(0x11), None);
    }

    #[test]
    fn test_sculpt_type_stitching() {
        assert!(SculptType::Torus.wraps_u());
        assert!(SculptType::Torus.wraps_v());
        assert!(SculptType::Cylinder.wraps_u());
        assert!(!SculptType::Cylinder.wraps_v());
        assert!(!SculptType::Plane.wraps_u());
        assert_eq!(SculptType::from_sculpt_type(5), SculptType::Plane);
    }

    #[test]
    fn test_validate_rejects_empty_sculpt() {
        let mut shape = PrimShape::sculpt(SculptType::Sphere, Vec::new());
        assert_eq!(shape.validate(), Err(Error::EmptySculptData));
        assert!(!shape.is_sculpted());

        shape.sculpt_data = vec![1, 2, 3];
        assert!(shape.validate().is_ok());
        assert!(shape.is_sculpted());
    }

    #[test]
    fn test_validate_ranges() {
        let shape = PrimShape::cylinder().with_profile_cut(60_000, 0);
        assert!(matches!(shape.validate(), Err(Error::InvalidParameter(_))));

        let shape = PrimShape::torus().with_path_cut(0, 50_001);
        assert!(matches!(shape.validate(), Err(Error::InvalidParameter(_))));

        let mut shape = PrimShape::torus();
        shape.path_scale_y = 201;
        assert!(matches!(shape.validate(), Err(Error::InvalidParameter(_))));
        shape.path_scale_y = 200;
        assert!(shape.validate().is_ok());

        // Oversized hollows are left to the mesher
        assert!(PrimShape::cylinder().with_hollow(60_000).validate().is_ok());
    }
}
