//! End-to-end tests: clean a realistic mesh, validate it, write it out.

use std::fs;

use hull_mesh::{
    CleanParams, Mesh, MeshError, Vertex, clean_mesh, require_closed_manifold, save_mesh,
    validate_mesh,
};

const CUBE_CORNERS: [[f64; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
];

const CUBE_FACES: [[u32; 3]; 12] = [
    [0, 2, 1],
    [0, 3, 2],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [3, 7, 6],
    [3, 6, 2],
    [0, 4, 7],
    [0, 7, 3],
    [1, 2, 6],
    [1, 6, 5],
];

/// A cube as an unindexed triangle soup: three fresh vertices per face,
/// with sub-tolerance jitter.
fn cube_soup() -> Mesh {
    let mut mesh = Mesh::new();
    for (fi, face) in CUBE_FACES.iter().enumerate() {
        let base = mesh.vertices.len() as u32;
        for &corner in face {
            let [x, y, z] = CUBE_CORNERS[corner as usize];
            let jitter = (fi as f64) * 1e-9;
            mesh.vertices.push(Vertex::from_coords(x + jitter, y, z - jitter));
        }
        mesh.faces.push([base, base + 1, base + 2]);
    }
    mesh
}

#[test]
fn test_triangle_soup_becomes_closed_cube() {
    let mut mesh = cube_soup();
    assert_eq!(mesh.vertex_count(), 36);
    assert!(!validate_mesh(&mesh).is_watertight);

    let report = clean_mesh(&mut mesh).unwrap();
    assert_eq!(report.vertices_merged, 28);
    assert_eq!(report.unreferenced_vertices_removed, 28);
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.face_count(), 12);

    let validation = require_closed_manifold(&mesh).unwrap();
    assert_eq!(validation.euler_characteristic, 2);
    assert!(validation.signed_volume > 0.99 && validation.signed_volume < 1.01);
}

#[test]
fn test_fin_on_closed_cube_is_removed() {
    let mut mesh = Mesh::new();
    for [x, y, z] in CUBE_CORNERS {
        mesh.vertices.push(Vertex::from_coords(x, y, z));
    }
    mesh.faces.extend_from_slice(&CUBE_FACES);

    // A fin hanging off edge (0, 1) makes that edge non-manifold
    mesh.vertices.push(Vertex::from_coords(0.0, -1.5, -0.5));
    mesh.faces.push([0, 1, 8]);
    assert_eq!(validate_mesh(&mesh).non_manifold_edge_count, 1);

    let report = clean_mesh(&mut mesh).unwrap();
    assert_eq!(report.non_manifold_faces_removed, 1);
    assert_eq!(report.unreferenced_vertices_removed, 1);
    assert!(require_closed_manifold(&mesh).is_ok());
}

#[test]
fn test_strict_params_still_close_the_soup() {
    let mut mesh = cube_soup();
    mesh.clean_with_config(&CleanParams::strict()).unwrap();
    assert!(mesh.validate().is_closed_manifold());
}

#[test]
fn test_clean_then_export_all_formats() {
    let mut mesh = cube_soup();
    clean_mesh(&mut mesh).unwrap();

    let dir = tempfile::tempdir().unwrap();
    for name in ["mesh.obj", "mesh.stl", "mesh.ply"] {
        let path = dir.path().join(name);
        save_mesh(&mesh, &path).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0, "{name} is empty");
    }

    let obj = fs::read_to_string(dir.path().join("mesh.obj")).unwrap();
    assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 8);
    assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), 12);
}

#[test]
fn test_unsupported_extension_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = save_mesh(&cube_soup(), &dir.path().join("mesh.gltf")).unwrap_err();
    assert!(matches!(err, MeshError::UnsupportedFormat { .. }));
    assert_eq!(err.code().as_str(), "MESH-4001");
}
