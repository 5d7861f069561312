// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile hulls and 2D boolean subtraction
//!
//! A [`SimpleHull`] is the ordered boundary of a prim profile in the Z=0
//! plane. Cuts and hollows are applied by subtracting a second polygon with
//! the i_overlay crate; the result keeps its outer ring first
//! (counter-clockwise) followed by hole rings (clockwise), each ring
//! separated by [`HullPoint::Break`].

use crate::error::{Error, Result};
use crate::primitives::{rotate_z, Vertex};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point3;

/// Rings smaller than this are considered degenerate
const MIN_RING_AREA: f64 = 1e-10;

/// Entry of a hull sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HullPoint {
    Vertex(Vertex),
    /// End of one ring, start of the next
    Break,
}

/// Ordered polygon boundary, possibly made of several rings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleHull {
    points: Vec<HullPoint>,
}

impl SimpleHull {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Single-ring hull from planar coordinates
    pub fn from_xy(coords: &[[f32; 2]]) -> Self {
        let mut hull = Self::new();
        for &[x, y] in coords {
            hull.add_vertex(Point3::new(x, y, 0.0));
        }
        hull
    }

    /// Append a vertex to the current ring
    ///
    /// A vertex equal to the previous one is ignored.
    pub fn add_vertex(&mut self, vertex: Vertex) {
        if let Some(HullPoint::Vertex(last)) = self.points.last() {
            if *last == vertex {
                return;
            }
        }
        self.points.push(HullPoint::Vertex(vertex));
    }

    /// Close the current ring
    pub fn add_break(&mut self) {
        if matches!(self.points.last(), Some(HullPoint::Vertex(_))) {
            self.points.push(HullPoint::Break);
        }
    }

    pub fn points(&self) -> &[HullPoint] {
        &self.points
    }

    /// Vertices in hull order, breaks skipped
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.points.iter().filter_map(|p| match p {
            HullPoint::Vertex(v) => Some(*v),
            HullPoint::Break => None,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().count()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Rings in hull order
    pub fn rings(&self) -> Vec<Vec<Vertex>> {
        let mut rings = Vec::new();
        let mut current = Vec::new();
        for point in &self.points {
            match point {
                HullPoint::Vertex(v) => current.push(*v),
                HullPoint::Break => {
                    if !current.is_empty() {
                        rings.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            rings.push(current);
        }
        rings
    }

    /// Number of vertices in each ring, in hull order
    pub fn ring_lengths(&self) -> Vec<usize> {
        self.rings().iter().map(Vec::len).collect()
    }

    /// Even-odd point containment over all rings (XY plane)
    pub fn contains_point(&self, point: &Vertex) -> bool {
        self.rings()
            .iter()
            .filter(|ring| point_in_ring(point, ring))
            .count()
            % 2
            == 1
    }

    /// Rotate every vertex about the Z axis
    pub fn rotate_z(&mut self, angle: f32) {
        for point in &mut self.points {
            if let HullPoint::Vertex(v) = point {
                *v = rotate_z(v, angle);
            }
        }
    }

    /// Subtract `inner` from `outer`
    ///
    /// `inner` is read as a single polygon (its breaks are ignored). The
    /// difference must leave exactly one connected shape; an empty result,
    /// a split into several pieces, or a ring that collapses is reported as
    /// [`Error::Geometry`].
    pub fn subtract_hull(outer: &SimpleHull, inner: &SimpleHull) -> Result<SimpleHull> {
        let subject = outer.to_paths();
        if subject.is_empty() {
            return Err(Error::geometry("outer hull has no ring"));
        }

        let clip: Vec<[f64; 2]> = inner
            .vertices()
            .map(|v| [v.x as f64, v.y as f64])
            .collect();
        if clip.len() < 3 {
            return Err(Error::geometry("inner hull needs at least 3 vertices"));
        }

        let clip = vec![clip];

        // Result is Vec<Vec<Vec<[f64; 2]>>> - Vec of shapes, each shape is Vec of contours
        let result = subject.overlay(&clip, OverlayRule::Difference, FillRule::EvenOdd);

        match result.as_slice() {
            [] => Err(Error::geometry("subtraction removed the whole hull")),
            [shape] => Self::from_shape(shape),
            shapes => Err(Error::geometry(format!(
                "subtraction split the hull into {} pieces",
                shapes.len()
            ))),
        }
    }

    fn to_paths(&self) -> Vec<Vec<[f64; 2]>> {
        self.rings()
            .into_iter()
            .filter(|ring| ring.len() >= 3)
            .map(|ring| ring.iter().map(|v| [v.x as f64, v.y as f64]).collect())
            .collect()
    }

    fn from_shape(shape: &[Vec<[f64; 2]>]) -> Result<SimpleHull> {
        let (outer, holes) = shape
            .split_first()
            .ok_or_else(|| Error::geometry("subtraction produced a shape without contours"))?;

        let mut hull = SimpleHull::new();
        hull.push_ring(outer, true)?;
        for hole in holes {
            hull.add_break();
            hull.push_ring(hole, false)?;
        }
        Ok(hull)
    }

    fn push_ring(&mut self, contour: &[[f64; 2]], counter_clockwise: bool) -> Result<()> {
        let area = signed_area(contour);
        if contour.len() < 3 || area.abs() < MIN_RING_AREA {
            return Err(Error::geometry("subtraction produced a degenerate ring"));
        }

        let mut ring: Vec<Vertex> = contour
            .iter()
            .map(|p| Point3::new(p[0] as f32, p[1] as f32, 0.0))
            .collect();
        if (area > 0.0) != counter_clockwise {
            ring.reverse();
        }
        for vertex in ring {
            self.add_vertex(vertex);
        }
        Ok(())
    }
}

/// Shoelace area, positive for counter-clockwise contours
fn signed_area(contour: &[[f64; 2]]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i][0] * contour[j][1];
        area -= contour[j][0] * contour[i][1];
    }

    area * 0.5
}

/// Ray-casting containment test against one ring
fn point_in_ring(point: &Vertex, ring: &[Vertex]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = ring.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &ring[i];
        let pj = &ring[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(half: f32) -> SimpleHull {
        SimpleHull::from_xy(&[[half, half], [-half, half], [-half, -half], [half, -half]])
    }

    fn ring_area(ring: &[Vertex]) -> f64 {
        let coords: Vec<[f64; 2]> = ring.iter().map(|v| [v.x as f64, v.y as f64]).collect();
        signed_area(&coords)
    }

    #[test]
    fn test_add_vertex_skips_repeats() {
        let mut hull = SimpleHull::new();
        hull.add_vertex(Point3::new(1.0, 0.0, 0.0));
        hull.add_vertex(Point3::new(1.0, 0.0, 0.0));
        hull.add_break();
        hull.add_break();
        assert_eq!(hull.points().len(), 2);
        assert_eq!(hull.vertex_count(), 1);
    }

    #[test]
    fn test_subtract_contained_hole() {
        let result = SimpleHull::subtract_hull(&square(0.5), &square(0.25)).unwrap();

        let rings = result.rings();
        assert_eq!(rings.len(), 2);
        assert_eq!(result.ring_lengths(), vec![4, 4]);
        assert!(ring_area(&rings[0]) > 0.0, "outer ring should be counter-clockwise");
        assert!(ring_area(&rings[1]) < 0.0, "hole ring should be clockwise");

        assert!(result.contains_point(&Point3::new(0.4, 0.4, 0.0)));
        assert!(!result.contains_point(&Point3::new(0.0, 0.0, 0.0)));
        assert!(!result.contains_point(&Point3::new(0.6, 0.0, 0.0)));
    }

    #[test]
    fn test_subtract_corner_notch() {
        let notch = SimpleHull::from_xy(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let result = SimpleHull::subtract_hull(&square(0.5), &notch).unwrap();

        assert_eq!(result.rings().len(), 1);
        assert_eq!(result.vertex_count(), 6);
        assert!(!result.contains_point(&Point3::new(0.25, 0.25, 0.0)));
        assert!(result.contains_point(&Point3::new(-0.25, 0.25, 0.0)));
    }

    #[test]
    fn test_subtract_everything_fails() {
        let result = SimpleHull::subtract_hull(&square(0.25), &square(0.5));
        assert!(matches!(result, Err(Error::Geometry(_))));
    }

    #[test]
    fn test_subtract_split_fails() {
        let bar = SimpleHull::from_xy(&[[-0.1, -1.0], [0.1, -1.0], [0.1, 1.0], [-0.1, 1.0]]);
        let result = SimpleHull::subtract_hull(&square(0.5), &bar);
        assert!(matches!(result, Err(Error::Geometry(_))));
    }

    #[test]
    fn test_rotate_z_half_turn() {
        let mut hull = SimpleHull::from_xy(&[[0.5, 0.0], [0.0, 0.5], [-0.5, -0.5]]);
        hull.rotate_z(std::f32::consts::PI);
        let first = hull.vertices().next().unwrap();
        assert!((first.x + 0.5).abs() < 1e-6);
        assert!(first.y.abs() < 1e-6);
    }
}
