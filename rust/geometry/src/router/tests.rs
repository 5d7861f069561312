// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;
use primmesh_core::SculptType;

fn quiet_mesher() -> Mesher {
    Mesher::with_config(MesherConfig::quiet())
}

#[test]
fn test_mesher_creation() {
    let mesher = quiet_mesher();
    // Every kind has a processor
    for kind in [
        PrimKind::Box,
        PrimKind::Cylinder,
        PrimKind::Prism,
        PrimKind::Tube,
        PrimKind::Torus,
        PrimKind::Ring,
        PrimKind::Sphere,
        PrimKind::Sculpt,
    ] {
        assert!(mesher.processors.contains_key(&kind), "{:?} unregistered", kind);
    }
}

#[test]
fn test_classify_builtin_shapes() {
    assert_eq!(classify(&PrimShape::box_shape()).unwrap(), PrimKind::Box);
    assert_eq!(classify(&PrimShape::cylinder()).unwrap(), PrimKind::Cylinder);
    assert_eq!(classify(&PrimShape::prism()).unwrap(), PrimKind::Prism);
    assert_eq!(classify(&PrimShape::sphere()).unwrap(), PrimKind::Sphere);
    assert_eq!(classify(&PrimShape::torus()).unwrap(), PrimKind::Torus);
    assert_eq!(classify(&PrimShape::tube()).unwrap(), PrimKind::Tube);
    assert_eq!(classify(&PrimShape::ring()).unwrap(), PrimKind::Ring);
}

#[test]
fn test_classify_ignores_hollow_bits() {
    let shape = PrimShape::cylinder().with_hollow_shape(primmesh_core::HollowShape::Triangle);
    assert_eq!(classify(&shape).unwrap(), PrimKind::Cylinder);
}

#[test]
fn test_classify_sphere_on_curve2() {
    let mut shape = PrimShape::sphere();
    shape.path_curve = PathCurve::Curve2 as u8;
    assert_eq!(classify(&shape).unwrap(), PrimKind::Sphere);
}

#[test]
fn test_wide_circle_sweep_falls_back_to_box() {
    let mut shape = PrimShape::torus();
    shape.path_scale_y = 100;
    assert_eq!(classify(&shape).unwrap(), PrimKind::Box);
}

#[test]
fn test_unknown_combinations_fall_back_to_box() {
    let mut right_triangle = PrimShape::box_shape();
    right_triangle.profile_curve = ProfileShape::RightTriangle as u8;
    assert_eq!(classify(&right_triangle).unwrap(), PrimKind::Box);

    let mut flexible = PrimShape::cylinder();
    flexible.path_curve = PathCurve::Flexible as u8;
    assert_eq!(classify(&flexible).unwrap(), PrimKind::Box);

    let mut half_circle_line = PrimShape::sphere();
    half_circle_line.path_curve = PathCurve::Linear as u8;
    assert_eq!(classify(&half_circle_line).unwrap(), PrimKind::Box);
}

#[test]
fn test_classify_sculpt() {
    let shape = PrimShape::sculpt(SculptType::Sphere, vec![1, 2, 3]);
    assert_eq!(classify(&shape).unwrap(), PrimKind::Sculpt);

    // Sculpt type zero is an ordinary prim
    let mut plain = shape.clone();
    plain.sculpt_type = 0;
    assert_eq!(classify(&plain).unwrap(), PrimKind::Sphere);
}

#[test]
fn test_classify_rejects_empty_sculpt() {
    let shape = PrimShape::sculpt(SculptType::Plane, Vec::new());
    assert!(matches!(
        classify(&shape),
        Err(Error::CoreError(primmesh_core::Error::EmptySculptData))
    ));
}

#[test]
fn test_non_finite_size_rejected() {
    let mesher = quiet_mesher();
    let result = mesher.create_mesh(
        "nan",
        &PrimShape::box_shape(),
        Vector3::new(f32::NAN, 1.0, 1.0),
        32.0,
    );
    assert!(matches!(result, Err(Error::InvalidShape(_))));

    let result = mesher.create_mesh(
        "inf",
        &PrimShape::box_shape(),
        Vector3::new(1.0, 1.0, 1.0),
        f32::INFINITY,
    );
    assert!(matches!(result, Err(Error::InvalidShape(_))));
}

#[test]
fn test_create_mesh_finalises() {
    let mesh = quiet_mesher()
        .create_mesh("box", &PrimShape::box_shape(), Vector3::new(1.0, 1.0, 1.0), 32.0)
        .unwrap();
    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.normals.len(), mesh.indices.len());
}

#[test]
fn test_create_meshes_preserves_order() {
    let shapes = [PrimShape::box_shape(), PrimShape::sphere(), PrimShape::cylinder()];
    let size = Vector3::new(1.0, 1.0, 1.0);
    let requests: Vec<_> = shapes
        .iter()
        .map(|shape| MeshRequest::new("batch", shape, size, 32.0))
        .collect();

    let results = quiet_mesher().create_meshes(&requests);
    let counts: Vec<usize> = results
        .into_iter()
        .map(|r| r.unwrap().triangle_count())
        .collect();

    assert_eq!(counts[0], 12);
    assert_eq!(counts[1], 320);
    assert_eq!(counts[2], 22 * 2 + 24 * 2);
}

struct FlatProcessor;

impl PrimProcessor for FlatProcessor {
    fn process(&self, _kind: PrimKind, _request: &MeshRequest, _dump: &DumpSink) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        mesh.add_vertex(nalgebra::Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(nalgebra::Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(nalgebra::Point3::new(2.0, 0.0, 0.0));
        mesh.add_vertex(nalgebra::Point3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 1, 3);
        Ok(mesh)
    }

    fn supported_kinds(&self) -> Vec<PrimKind> {
        vec![PrimKind::Sphere]
    }
}

#[test]
fn test_register_replaces_processor_and_drops_degenerates() {
    let mut mesher = quiet_mesher();
    mesher.register(Box::new(FlatProcessor));

    let mesh = mesher
        .create_mesh("flat", &PrimShape::sphere(), Vector3::new(1.0, 1.0, 1.0), 32.0)
        .unwrap();
    assert_eq!(mesh.triangle_count(), 1);
    assert_eq!(mesh.normals, vec![0.0, 0.0, 1.0]);
}

#[test]
fn test_build_mesh() {
    let mesh = build_mesh(&PrimShape::prism(), Vector3::new(1.0, 1.0, 1.0), 32.0).unwrap();
    // Triangle caps plus three side quads
    assert_eq!(mesh.triangle_count(), 2 + 3 * 2);
}

/// Six times the signed volume enclosed by a closed mesh
fn signed_volume(mesh: &Mesh) -> f32 {
    mesh.triangles()
        .map(|t| {
            let (a, b, c) = (mesh.vertex(t.v1), mesh.vertex(t.v2), mesh.vertex(t.v3));
            a.coords.dot(&b.coords.cross(&c.coords))
        })
        .sum::<f32>()
        / 6.0
}

#[test]
fn test_mirrored_size_keeps_outward_winding() {
    let mesher = quiet_mesher();
    for size in [
        Vector3::new(-1.0, 1.0, 1.0),
        Vector3::new(1.0, -2.0, 1.0),
        Vector3::new(-1.0, -1.0, -1.0),
    ] {
        let mesh = mesher
            .create_mesh("mirrored", &PrimShape::box_shape(), size, 32.0)
            .unwrap();
        let expected = (size.x * size.y * size.z).abs();
        approx::assert_relative_eq!(signed_volume(&mesh), expected, epsilon = 1e-5);
    }

    let mesh = mesher
        .create_mesh("mirrored", &PrimShape::cylinder(), Vector3::new(1.0, 1.0, -1.0), 32.0)
        .unwrap();
    assert!(signed_volume(&mesh) > 0.0);
}
