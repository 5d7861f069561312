// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile hull construction
//!
//! Outer hulls of every prim family plus the cut wedge and hollow hulls
//! that are subtracted from them. All profiles live in the unit square
//! centred on the origin; coordinates below are part of the shared look of
//! prims and are kept as published.

use crate::hull::SimpleHull;
use crate::primitives::vertex_from_angle;
use nalgebra::Point3;
use primmesh_core::params::{
    hollow_fraction, profile_begin_degrees, profile_end_degrees, triangle_hollow_fraction,
};
use primmesh_core::{HollowShape, ProfileShape};
use std::f64::consts::PI;

/// 24-gon of radius 0.5, counter-clockwise from 0 degrees in 15 degree steps
const CIRCLE_POINTS: [[f32; 2]; 24] = [
    [0.500000, 0.000000],
    [0.482963, 0.129410],
    [0.433013, 0.250000],
    [0.353553, 0.353553],
    [0.250000, 0.433013],
    [0.129410, 0.482963],
    [0.000000, 0.500000],
    [-0.129410, 0.482963],
    [-0.250000, 0.433013],
    [-0.353553, 0.353553],
    [-0.433013, 0.250000],
    [-0.482963, 0.129410],
    [-0.500000, 0.000000],
    [-0.482963, -0.129410],
    [-0.433013, -0.250000],
    [-0.353553, -0.353553],
    [-0.250000, -0.433013],
    [-0.129410, -0.482963],
    [0.000000, -0.500000],
    [0.129410, -0.482963],
    [0.250000, -0.433013],
    [0.353553, -0.353553],
    [0.433013, -0.250000],
    [0.482963, -0.129410],
];

/// Index of the 45 degree sample, where circle hulls start
const CIRCLE_START: usize = 3;

/// Wedge step used to approximate the cut arc
const CUT_STEP_DEGREES: f64 = 45.0;

/// Box profile: PP, MP, MM, PM
pub fn square_hull() -> SimpleHull {
    SimpleHull::from_xy(&[[0.5, 0.5], [-0.5, 0.5], [-0.5, -0.5], [0.5, -0.5]])
}

/// Cylinder and torus profile, counter-clockwise from 45 degrees
pub fn circle_hull() -> SimpleHull {
    let coords: Vec<[f32; 2]> = (0..CIRCLE_POINTS.len())
        .map(|i| CIRCLE_POINTS[(CIRCLE_START + i) % CIRCLE_POINTS.len()])
        .collect();
    SimpleHull::from_xy(&coords)
}

/// Prism profile
pub fn prism_hull() -> SimpleHull {
    SimpleHull::from_xy(&[[-0.25, 0.45], [-0.25, -0.45], [0.5, 0.0]])
}

/// Triangle profile swept along a circular path
pub fn ring_hull() -> SimpleHull {
    SimpleHull::from_xy(&[[0.255, -0.375], [0.25, 0.375], [-0.5, 0.0]])
}

/// Wedge removing the profile cut range
///
/// Angles count from +X; `angle_offset` (degrees) rotates the cut into the
/// frame of the profile. The wedge reaches radius 1 so it always leaves the
/// profile. Returns `None` when nothing is cut.
pub fn cut_hull(profile_begin: u16, profile_end: u16, angle_offset: f64) -> Option<SimpleHull> {
    if profile_begin == 0 && profile_end == 0 {
        return None;
    }

    let begin = profile_begin_degrees(profile_begin) - angle_offset;
    let mut end = profile_end_degrees(profile_end) - angle_offset;
    if begin < end {
        end -= 360.0;
    }

    let sweep = begin - end;
    if sweep <= 0.0 {
        return None;
    }

    let steps = ((sweep / CUT_STEP_DEGREES + 0.5) as i32).max(1);
    let step = sweep / steps as f64;

    // Walks clockwise, against the winding of the outer hulls
    let mut hull = SimpleHull::new();
    hull.add_vertex(Point3::origin());
    for i in 0..steps {
        let angle = begin - i as f64 * step;
        hull.add_vertex(vertex_from_angle(angle * PI / 180.0));
    }
    hull.add_vertex(vertex_from_angle(end * PI / 180.0));
    Some(hull)
}

/// Hole hull of a prim on a linear path
///
/// A [`HollowShape::Same`] hole follows the profile: squares and triangles
/// keep their shape, circles only stay round on a linear path, everything
/// else gets a square hole. Returns `None` when no hole applies.
pub fn hole_hull(
    profile: ProfileShape,
    hollow: HollowShape,
    profile_hollow: u16,
    linear_path: bool,
) -> Option<SimpleHull> {
    if profile_hollow == 0 {
        return None;
    }

    let mut fraction = hollow_fraction(profile_hollow);
    let mut shape = hollow;
    match profile {
        ProfileShape::Square => {
            if shape == HollowShape::Same {
                shape = HollowShape::Square;
            }
        }
        ProfileShape::EquilateralTriangle => {
            fraction = triangle_hollow_fraction(profile_hollow);
            if shape == HollowShape::Same {
                shape = HollowShape::Triangle;
            }
        }
        ProfileShape::HalfCircle | ProfileShape::Circle => {
            if linear_path && shape == HollowShape::Same {
                shape = HollowShape::Circle;
            }
        }
        _ => {
            if shape == HollowShape::Same {
                shape = HollowShape::Square;
            }
        }
    }

    if shape == HollowShape::Same {
        return None;
    }
    Some(hole_hull_polygon(shape, fraction, profile))
}

/// Hole polygon of the given shape scaled by `fraction`
///
/// Square holes turn into diamonds inside circle and triangle profiles so
/// they stay within the profile.
pub fn hole_hull_polygon(shape: HollowShape, fraction: f32, profile: ProfileShape) -> SimpleHull {
    let f = fraction;
    match shape {
        HollowShape::Circle => {
            let coords: Vec<[f32; 2]> = (0..CIRCLE_POINTS.len())
                .map(|i| {
                    let n = CIRCLE_POINTS.len();
                    let [x, y] = CIRCLE_POINTS[(CIRCLE_START + n - i) % n];
                    [x * f, y * f]
                })
                .collect();
            SimpleHull::from_xy(&coords)
        }
        HollowShape::Triangle => {
            let (mm, pm, pp) = if profile == ProfileShape::Square {
                // corners at 345, 105 and 225 degrees
                (
                    [0.48296 * f, -0.12941 * f],
                    [-0.12941 * f, 0.48296 * f],
                    [-0.35355 * f, -0.35355 * f],
                )
            } else {
                ([-0.25 * f, -0.45 * f], [0.5 * f, 0.0], [-0.25 * f, 0.45 * f])
            };
            SimpleHull::from_xy(&[mm, pp, pm])
        }
        HollowShape::Square | HollowShape::Same => {
            let (mm, pm, pp, mp) = match profile {
                ProfileShape::Circle => (
                    [0.0, -0.707 * f],
                    [0.707 * f, 0.0],
                    [0.0, 0.707 * f],
                    [-0.707 * f, 0.0],
                ),
                ProfileShape::EquilateralTriangle => (
                    [0.0, -0.667 * f],
                    [0.667 * f, 0.0],
                    [0.0, 0.667 * f],
                    [-0.667 * f, 0.0],
                ),
                _ => (
                    [-0.5 * f, -0.5 * f],
                    [0.5 * f, -0.5 * f],
                    [0.5 * f, 0.5 * f],
                    [-0.5 * f, 0.5 * f],
                ),
            };
            SimpleHull::from_xy(&[mm, mp, pp, pm])
        }
    }
}

/// Hollow shape of a circular-path prim: `Same` follows the profile
pub fn circular_hollow_shape(profile: ProfileShape, hollow: HollowShape) -> HollowShape {
    if hollow != HollowShape::Same {
        return hollow;
    }
    match profile {
        ProfileShape::Circle => HollowShape::Circle,
        ProfileShape::EquilateralTriangle => HollowShape::Triangle,
        _ => HollowShape::Square,
    }
}

/// Triangular hole of a circular-path prim
///
/// Oriented to match the ring profile, which points along -X.
pub fn circular_triangle_hole_hull(profile: ProfileShape, profile_hollow: u16) -> SimpleHull {
    let f = hollow_fraction(profile_hollow);
    if profile == ProfileShape::EquilateralTriangle {
        SimpleHull::from_xy(&[[0.125 * f, -0.1875 * f], [-0.25 * f, 0.0], [0.125 * f, 0.1875 * f]])
    } else {
        SimpleHull::from_xy(&[[0.25 * f, -0.45 * f], [-0.5 * f, 0.0], [0.25 * f, 0.45 * f]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn max_radius(hull: &SimpleHull) -> f32 {
        hull.vertices()
            .map(|v| (v.x * v.x + v.y * v.y).sqrt())
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_circle_hull_starts_at_45_degrees() {
        let hull = circle_hull();
        assert_eq!(hull.vertex_count(), 24);
        let first = hull.vertices().next().unwrap();
        assert_relative_eq!(first.x, 0.353553);
        assert_relative_eq!(first.y, 0.353553);
        let second = hull.vertices().nth(1).unwrap();
        assert_relative_eq!(second.x, 0.25);
    }

    #[test]
    fn test_no_cut() {
        assert!(cut_hull(0, 0, 0.0).is_none());
        // begin meets end: nothing left to cut
        assert!(cut_hull(25_000, 25_000, 0.0).is_none());
    }

    #[test]
    fn test_quarter_cut_wedge() {
        let hull = cut_hull(12_500, 0, 0.0).unwrap();
        let vertices: Vec<_> = hull.vertices().collect();

        // origin, 90, 45, then the end leg at 0 degrees
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0], Point3::origin());
        assert_relative_eq!(vertices[1].y, 1.0);
        assert_relative_eq!(vertices[2].x, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_relative_eq!(vertices[3].x, 1.0);
        assert_relative_eq!(vertices[3].y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_box_cut_offset() {
        let hull = cut_hull(12_500, 0, 135.0).unwrap();
        let vertices: Vec<_> = hull.vertices().collect();

        // -45, -90 and the end leg at -135 degrees
        assert_eq!(vertices.len(), 4);
        assert_relative_eq!(vertices[1].x, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_relative_eq!(vertices[1].y, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_relative_eq!(vertices[3].x, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
    }

    #[test]
    fn test_cut_removes_quadrant() {
        let cut = cut_hull(12_500, 0, 0.0).unwrap();
        let result = SimpleHull::subtract_hull(&circle_hull(), &cut).unwrap();
        assert!(!result.contains_point(&Point3::new(0.2, 0.2, 0.0)));
        assert!(result.contains_point(&Point3::new(-0.2, 0.2, 0.0)));
        assert!(result.contains_point(&Point3::new(0.2, -0.2, 0.0)));
    }

    #[test]
    fn test_hole_follows_profile() {
        let square = hole_hull(ProfileShape::Square, HollowShape::Same, 25_000, true).unwrap();
        assert_eq!(square.vertex_count(), 4);
        assert_relative_eq!(max_radius(&square), 0.25 * 2f32.sqrt(), epsilon = 1e-6);

        let circle = hole_hull(ProfileShape::Circle, HollowShape::Same, 25_000, true).unwrap();
        assert_eq!(circle.vertex_count(), 24);
        assert_relative_eq!(max_radius(&circle), 0.25, epsilon = 1e-5);

        let triangle =
            hole_hull(ProfileShape::EquilateralTriangle, HollowShape::Same, 19_000, true).unwrap();
        assert_eq!(triangle.vertex_count(), 3);
        let corner = (0.25f32 * 0.25 + 0.45 * 0.45).sqrt();
        assert_relative_eq!(max_radius(&triangle), corner * 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_round_hole_needs_linear_path() {
        assert!(hole_hull(ProfileShape::Circle, HollowShape::Same, 25_000, false).is_none());
        assert!(hole_hull(ProfileShape::Circle, HollowShape::Square, 0, true).is_none());
    }

    #[test]
    fn test_square_hole_in_circle_is_diamond() {
        let hole = hole_hull(ProfileShape::Circle, HollowShape::Square, 50_000, true).unwrap();
        let first = hole.vertices().next().unwrap();
        assert_relative_eq!(first.x, 0.0);
        assert_relative_eq!(first.y, -0.707);
    }

    #[test]
    fn test_circular_hollow_resolution() {
        assert_eq!(
            circular_hollow_shape(ProfileShape::Circle, HollowShape::Same),
            HollowShape::Circle
        );
        assert_eq!(
            circular_hollow_shape(ProfileShape::EquilateralTriangle, HollowShape::Same),
            HollowShape::Triangle
        );
        assert_eq!(
            circular_hollow_shape(ProfileShape::Square, HollowShape::Circle),
            HollowShape::Circle
        );
    }

    #[test]
    fn test_circular_triangle_hole_fits_ring() {
        let hole = circular_triangle_hole_hull(ProfileShape::EquilateralTriangle, 50_000);
        let result = SimpleHull::subtract_hull(&ring_hull(), &hole).unwrap();
        assert_eq!(result.ring_lengths(), vec![3, 3]);
    }
}
