// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-point parameter decoding
//!
//! Converts the integer encodings of a [`crate::PrimShape`] into the floats
//! used by the mesher. The arithmetic here is part of the wire contract:
//! clients render prims from the same bytes, so each formula keeps its
//! operation order and precision.

use std::f32::consts::PI;

/// Quantisation of cut and hollow ranges (`50000` = full range)
pub const CUT_QUANTA: u16 = 50_000;

/// Neutral value of path scale and taper bytes
pub const PATH_SCALE_NEUTRAL: u8 = 100;

/// Largest meaningful path scale byte
pub const PATH_SCALE_MAX: u8 = 200;

/// Profile cut start angle in degrees
#[inline]
pub fn profile_begin_degrees(profile_begin: u16) -> f64 {
    profile_begin as f64 / CUT_QUANTA as f64 * 360.0
}

/// Profile cut end angle in degrees
#[inline]
pub fn profile_end_degrees(profile_end: u16) -> f64 {
    360.0 - profile_end as f64 / CUT_QUANTA as f64 * 360.0
}

/// Hollow size as a fraction of the profile
#[inline]
pub fn hollow_fraction(profile_hollow: u16) -> f32 {
    profile_hollow as f32 / CUT_QUANTA as f32
}

/// Hollow size for triangle profiles, which shrink the hole to stay inside
/// the narrower cross-section
#[inline]
pub fn triangle_hollow_fraction(profile_hollow: u16) -> f32 {
    (profile_hollow as f32 / 1.9) / CUT_QUANTA as f32
}

/// Top and bottom scale factors of a linear extrusion along one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTaper {
    pub top: f32,
    pub bottom: f32,
}

impl Default for LinearTaper {
    fn default() -> Self {
        Self { top: 1.0, bottom: 1.0 }
    }
}

/// Decode a linear path scale byte into taper factors
///
/// Values above 100 narrow the top, values below 100 narrow the bottom.
pub fn linear_taper(path_scale: u8) -> LinearTaper {
    let mut taper = LinearTaper::default();
    if path_scale > PATH_SCALE_NEUTRAL {
        taper.top = 1.0 - ((path_scale - PATH_SCALE_NEUTRAL) as f32 / 100.0);
    } else if path_scale < PATH_SCALE_NEUTRAL {
        taper.bottom = 1.0 - ((100.0 - path_scale as f32) / 100.0);
    }
    taper
}

/// Decode a shear byte; bytes of 128 and above are negative
pub fn shear_offset(path_shear: u8) -> f32 {
    if path_shear == 0 {
        0.0
    } else if path_shear >= 128 {
        ((256 - path_shear as u16) as f32 / 100.0) * -1.0
    } else {
        path_shear as f32 / 100.0
    }
}

/// Twist in radians for a linear path
#[inline]
pub fn linear_twist(path_twist: i16) -> f32 {
    path_twist as f32 * PI * 0.01
}

/// Twist in radians for a circular path
#[inline]
pub fn circular_twist(path_twist: i16) -> f32 {
    path_twist as f32 * PI * 0.02
}

/// Number of turns of a circular path
#[inline]
pub fn revolutions(path_revolutions: u8) -> f32 {
    1.0 + path_revolutions as f32 * 3.0 / 200.0
}

/// Fraction of the path where the sweep starts
#[inline]
pub fn path_cut_begin(path_begin: u16) -> f32 {
    0.00002 * path_begin as f32
}

/// Fraction of the path where the sweep ends
#[inline]
pub fn path_cut_end(path_end: u16) -> f32 {
    0.00002 * (CUT_QUANTA as i32 - path_end as i32) as f32
}

/// Path scale of a circular path (hole size)
#[inline]
pub fn circular_path_scale(path_scale: u8) -> f32 {
    (200 - path_scale as i32) as f32 * 0.01
}

/// Unpacked path scale used to tell a torus from other circle sweeps
#[inline]
pub fn unpack_path_scale(path_scale: u8) -> f32 {
    (200 - path_scale as i32) as f32 / 100.0
}

/// Signed percent byte (skew, radius offset, path taper) as a fraction
#[inline]
pub fn signed_percent(value: i8) -> f32 {
    0.01 * value as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_profile_angles() {
        assert_relative_eq!(profile_begin_degrees(12_500), 90.0);
        assert_relative_eq!(profile_end_degrees(0), 360.0);
        assert_relative_eq!(profile_end_degrees(25_000), 180.0);
    }

    #[test]
    fn test_linear_taper() {
        assert_eq!(linear_taper(100), LinearTaper::default());

        let top = linear_taper(150);
        assert_relative_eq!(top.top, 0.5);
        assert_relative_eq!(top.bottom, 1.0);

        let bottom = linear_taper(25);
        assert_relative_eq!(bottom.top, 1.0);
        assert_relative_eq!(bottom.bottom, 0.25);

        assert_relative_eq!(linear_taper(200).top, 0.0);
    }

    #[test]
    fn test_shear_sign_wrap() {
        assert_eq!(shear_offset(0), 0.0);
        assert_relative_eq!(shear_offset(50), 0.5);
        assert_relative_eq!(shear_offset(127), 1.27);
        assert_relative_eq!(shear_offset(206), -0.5);
        assert_relative_eq!(shear_offset(128), -1.28);
    }

    #[test]
    fn test_twist_scales() {
        assert_relative_eq!(linear_twist(100), PI, epsilon = 1e-6);
        assert_relative_eq!(circular_twist(50), PI, epsilon = 1e-6);
        assert_relative_eq!(linear_twist(-50), -PI * 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_path_ranges() {
        assert_relative_eq!(revolutions(0), 1.0);
        assert_relative_eq!(revolutions(200), 4.0);
        assert_relative_eq!(path_cut_begin(0), 0.0);
        assert_relative_eq!(path_cut_end(0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(path_cut_begin(25_000), 0.5, epsilon = 1e-6);
        assert_relative_eq!(circular_path_scale(175), 0.25, epsilon = 1e-6);
        assert_relative_eq!(unpack_path_scale(175), 0.25);
        assert_relative_eq!(signed_percent(-50), -0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_hollow_fractions() {
        assert_relative_eq!(hollow_fraction(25_000), 0.5);
        assert_relative_eq!(triangle_hollow_fraction(19_000), 0.2, epsilon = 1e-6);
    }
}
