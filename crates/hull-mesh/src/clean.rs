//! Topological cleanup of extracted surfaces.
//!
//! The cleaner only ever removes: faces that are degenerate, duplicated or
//! attached to an over-shared edge, and vertices that coincide with an
//! earlier vertex or are no longer referenced. Running it twice with the
//! same parameters changes nothing the second time.

use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use tracing::{debug, info, warn};

use crate::adjacency::face_edges;
use crate::error::{MeshError, MeshResult};
use crate::{Mesh, Triangle};

/// Configuration parameters for mesh cleanup.
///
/// Distances are in mesh units. For a reconstructed hull that is the
/// canonical cube `[-1, 1]^3`.
///
/// # Example
///
/// ```
/// use hull_mesh::CleanParams;
///
/// let params = CleanParams {
///     merge_tolerance: 1e-4,
///     ..Default::default()
/// };
/// assert!(params.remove_non_manifold);
/// ```
#[derive(Debug, Clone)]
pub struct CleanParams {
    /// Minimum triangle area.
    ///
    /// Triangles with area at or below this threshold are removed as
    /// degenerate, as are triangles that repeat a vertex index.
    ///
    /// Default: `1e-12`
    pub degenerate_area_threshold: f64,

    /// Distance below which two vertices are merged into one.
    ///
    /// The vertex with the smaller index survives. A tolerance of `0.0`
    /// merges only bit-identical positions.
    ///
    /// Default: `1e-6`
    pub merge_tolerance: f64,

    /// Whether to remove degenerate triangles.
    ///
    /// Default: `true`
    pub remove_degenerate: bool,

    /// Whether to remove triangles that repeat the vertex set of an earlier
    /// triangle, in either winding.
    ///
    /// Default: `true`
    pub remove_duplicate_faces: bool,

    /// Whether to merge coincident vertices.
    ///
    /// Default: `true`
    pub merge_vertices: bool,

    /// Whether to remove faces on edges shared by more than two faces.
    ///
    /// Faces are visited in order and the first two faces on every edge are
    /// kept.
    ///
    /// Default: `true`
    pub remove_non_manifold: bool,

    /// Whether to drop vertices no face references and compact indices.
    ///
    /// Default: `true`
    pub remove_unreferenced: bool,
}

impl Default for CleanParams {
    fn default() -> Self {
        Self {
            degenerate_area_threshold: 1e-12,
            merge_tolerance: 1e-6,
            remove_degenerate: true,
            remove_duplicate_faces: true,
            merge_vertices: true,
            remove_non_manifold: true,
            remove_unreferenced: true,
        }
    }
}

impl CleanParams {
    /// More aggressive thresholds, for coarse grids where slivers appear.
    pub fn strict() -> Self {
        Self {
            degenerate_area_threshold: 1e-10,
            merge_tolerance: 1e-5,
            ..Default::default()
        }
    }

    /// Every step switched off. Cleaning becomes a no-op.
    pub fn disabled() -> Self {
        Self {
            remove_degenerate: false,
            remove_duplicate_faces: false,
            merge_vertices: false,
            remove_non_manifold: false,
            remove_unreferenced: false,
            ..Default::default()
        }
    }
}

/// Counts of what each cleanup step removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub initial_vertices: usize,
    pub initial_faces: usize,
    pub degenerate_faces_removed: usize,
    pub duplicate_faces_removed: usize,
    pub vertices_merged: usize,
    /// Faces dropped because a merge made them degenerate or duplicated.
    pub collapsed_faces_removed: usize,
    pub non_manifold_faces_removed: usize,
    pub unreferenced_vertices_removed: usize,
    pub final_vertices: usize,
    pub final_faces: usize,
}

impl CleanReport {
    /// True when the cleaner did not touch the mesh.
    pub fn is_noop(&self) -> bool {
        self.degenerate_faces_removed == 0
            && self.duplicate_faces_removed == 0
            && self.vertices_merged == 0
            && self.collapsed_faces_removed == 0
            && self.non_manifold_faces_removed == 0
            && self.unreferenced_vertices_removed == 0
    }
}

impl std::fmt::Display for CleanReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh Cleanup:")?;
        writeln!(
            f,
            "  Vertices: {} -> {}",
            self.initial_vertices, self.final_vertices
        )?;
        writeln!(f, "  Faces: {} -> {}", self.initial_faces, self.final_faces)?;
        writeln!(f, "  Degenerate faces removed: {}", self.degenerate_faces_removed)?;
        writeln!(f, "  Duplicate faces removed: {}", self.duplicate_faces_removed)?;
        writeln!(f, "  Vertices merged: {}", self.vertices_merged)?;
        writeln!(f, "  Collapsed faces removed: {}", self.collapsed_faces_removed)?;
        writeln!(
            f,
            "  Non-manifold faces removed: {}",
            self.non_manifold_faces_removed
        )?;
        write!(
            f,
            "  Unreferenced vertices removed: {}",
            self.unreferenced_vertices_removed
        )
    }
}

/// Check that every face references an existing vertex.
pub fn check_face_indices(mesh: &Mesh) -> MeshResult<()> {
    let vertex_count = mesh.vertices.len();
    for (face_index, face) in mesh.faces.iter().enumerate() {
        if let Some(&bad) = face.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(MeshError::invalid_vertex_index(face_index, bad, vertex_count));
        }
    }
    Ok(())
}

/// Remove triangles that repeat a vertex index or have area at or below
/// `area_threshold`.
///
/// Returns the number of triangles removed.
pub fn remove_degenerate_faces(mesh: &mut Mesh, area_threshold: f64) -> usize {
    let original_count = mesh.faces.len();

    mesh.faces.retain(|&[i0, i1, i2]| {
        if i0 == i1 || i1 == i2 || i0 == i2 {
            return false;
        }
        let tri = Triangle::new(
            mesh.vertices[i0 as usize].position,
            mesh.vertices[i1 as usize].position,
            mesh.vertices[i2 as usize].position,
        );
        !tri.is_degenerate(area_threshold)
    });

    let removed = original_count - mesh.faces.len();
    if removed > 0 {
        debug!(removed, area_threshold, "Removed degenerate triangles");
    }
    removed
}

/// Rotate a face so its smallest index comes first, keeping cyclic order.
fn normalize_face(face: [u32; 3]) -> [u32; 3] {
    let mut min_idx = 0;
    for i in 1..3 {
        if face[i] < face[min_idx] {
            min_idx = i;
        }
    }
    [
        face[min_idx],
        face[(min_idx + 1) % 3],
        face[(min_idx + 2) % 3],
    ]
}

/// Remove faces whose vertex set matches an earlier face, in either winding.
///
/// The first occurrence is kept. Returns the number of faces removed.
pub fn remove_duplicate_faces(mesh: &mut Mesh) -> usize {
    let original_count = mesh.faces.len();
    let mut seen: HashSet<[u32; 3]> = HashSet::with_capacity(original_count);

    mesh.faces.retain(|face| {
        let fwd = normalize_face(*face);
        let rev = normalize_face([face[0], face[2], face[1]]);
        if seen.contains(&fwd) || seen.contains(&rev) {
            false
        } else {
            seen.insert(fwd);
            true
        }
    });

    let removed = original_count - mesh.faces.len();
    if removed > 0 {
        debug!(removed, "Removed duplicate faces");
    }
    removed
}

/// Convert position to spatial hash cell.
fn pos_to_cell(pos: &Point3<f64>, cell_size: f64) -> (i64, i64, i64) {
    (
        (pos.x / cell_size).floor() as i64,
        (pos.y / cell_size).floor() as i64,
        (pos.z / cell_size).floor() as i64,
    )
}

/// Build a vertex remap that sends every vertex to the smallest-index
/// vertex it coincides with.
///
/// Returns the remap and the number of vertices merged away.
fn coincident_vertex_remap(mesh: &Mesh, tolerance: f64) -> (Vec<u32>, usize) {
    let mut vertex_remap: Vec<u32> = (0..mesh.vertices.len() as u32).collect();
    let mut merged_count = 0;

    if tolerance <= 0.0 {
        let mut first_seen: HashMap<[u64; 3], u32> = HashMap::with_capacity(mesh.vertices.len());
        for (idx, vertex) in mesh.vertices.iter().enumerate() {
            let p = vertex.position;
            let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
            let survivor = *first_seen.entry(key).or_insert(idx as u32);
            if survivor != idx as u32 {
                vertex_remap[idx] = survivor;
                merged_count += 1;
            }
        }
        return (vertex_remap, merged_count);
    }

    let cell_size = tolerance * 2.0;
    let mut spatial_hash: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        let cell = pos_to_cell(&vertex.position, cell_size);
        spatial_hash.entry(cell).or_default().push(idx as u32);
    }

    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        let idx = idx as u32;
        if vertex_remap[idx as usize] != idx {
            continue;
        }

        let cell = pos_to_cell(&vertex.position, cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbor_cell = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                    let Some(candidates) = spatial_hash.get(&neighbor_cell) else {
                        continue;
                    };
                    for &other_idx in candidates {
                        // Only merge into smaller indices
                        if other_idx <= idx || vertex_remap[other_idx as usize] != other_idx {
                            continue;
                        }
                        let other_pos = &mesh.vertices[other_idx as usize].position;
                        if (vertex.position - other_pos).norm() < tolerance {
                            vertex_remap[other_idx as usize] = idx;
                            merged_count += 1;
                        }
                    }
                }
            }
        }
    }

    (vertex_remap, merged_count)
}

/// Merge vertices closer than `tolerance` and renumber faces onto the
/// surviving vertex.
///
/// The merged-away vertices stay in the vertex array until
/// [`remove_unreferenced_vertices`] compacts it. Faces that collapse to a
/// repeated index are dropped here. Returns `(vertices_merged, faces_dropped)`.
pub fn merge_duplicate_vertices(mesh: &mut Mesh, tolerance: f64) -> (usize, usize) {
    if mesh.vertices.is_empty() {
        return (0, 0);
    }

    let (vertex_remap, merged_count) = coincident_vertex_remap(mesh, tolerance);
    if merged_count == 0 {
        return (0, 0);
    }

    for face in &mut mesh.faces {
        for index in face.iter_mut() {
            *index = vertex_remap[*index as usize];
        }
    }

    let before = mesh.faces.len();
    mesh.faces
        .retain(|&[i0, i1, i2]| i0 != i1 && i1 != i2 && i0 != i2);
    let dropped = before - mesh.faces.len();

    debug!(merged_count, tolerance, dropped, "Merged coincident vertices");

    (merged_count, dropped)
}

/// Remove faces so that no edge is used by more than two faces.
///
/// Faces are visited in order; a face is kept only if every one of its
/// edges is used by fewer than two already-kept faces. Returns the number
/// of faces removed.
pub fn remove_non_manifold_faces(mesh: &mut Mesh) -> usize {
    let original_count = mesh.faces.len();
    let mut edge_use: HashMap<(u32, u32), u8> = HashMap::with_capacity(original_count * 3 / 2 + 1);

    mesh.faces.retain(|face| {
        let edges = face_edges(face);
        if edges
            .iter()
            .any(|edge| edge_use.get(edge).copied().unwrap_or(0) >= 2)
        {
            return false;
        }
        for edge in edges {
            *edge_use.entry(edge).or_insert(0) += 1;
        }
        true
    });

    let removed = original_count - mesh.faces.len();
    if removed > 0 {
        debug!(removed, "Removed faces on non-manifold edges");
    }
    removed
}

/// Remove unreferenced vertices and compact the vertex array.
///
/// Surviving vertices keep their relative order. Returns the number of
/// vertices removed.
pub fn remove_unreferenced_vertices(mesh: &mut Mesh) -> usize {
    let original_count = mesh.vertices.len();

    let mut referenced = vec![false; original_count];
    for face in &mesh.faces {
        for &v in face {
            referenced[v as usize] = true;
        }
    }

    if referenced.iter().all(|&r| r) {
        return 0;
    }

    let mut remap: Vec<u32> = vec![u32::MAX; original_count];
    let mut new_vertices = Vec::with_capacity(original_count);
    for (old_idx, vertex) in mesh.vertices.drain(..).enumerate() {
        if referenced[old_idx] {
            remap[old_idx] = new_vertices.len() as u32;
            new_vertices.push(vertex);
        }
    }

    for face in &mut mesh.faces {
        for index in face.iter_mut() {
            *index = remap[*index as usize];
        }
    }

    let removed = original_count - new_vertices.len();
    mesh.vertices = new_vertices;

    if removed > 0 {
        debug!(removed, "Removed unreferenced vertices");
    }
    removed
}

/// Run the full cleanup pipeline with default parameters.
pub fn clean_mesh(mesh: &mut Mesh) -> MeshResult<CleanReport> {
    clean_mesh_with_config(mesh, &CleanParams::default())
}

/// Run the full cleanup pipeline.
///
/// Steps, each optional:
/// 1. remove degenerate triangles
/// 2. remove duplicated triangles
/// 3. merge coincident vertices, then drop the faces the merge collapsed or
///    duplicated
/// 4. remove faces on non-manifold edges
/// 5. drop unreferenced vertices and compact indices
///
/// Fails with [`MeshError::InvalidVertexIndex`] if a face points past the
/// vertex array; the mesh is left untouched in that case.
///
/// # Example
///
/// ```
/// use hull_mesh::{clean_mesh_with_config, CleanParams, Mesh, Vertex};
///
/// let mut mesh = Mesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
/// mesh.faces.push([0, 2, 1]);
///
/// let report = clean_mesh_with_config(&mut mesh, &CleanParams::default()).unwrap();
/// assert_eq!(report.duplicate_faces_removed, 1);
/// assert_eq!(mesh.face_count(), 1);
/// ```
pub fn clean_mesh_with_config(mesh: &mut Mesh, params: &CleanParams) -> MeshResult<CleanReport> {
    check_face_indices(mesh)?;

    let mut report = CleanReport {
        initial_vertices: mesh.vertex_count(),
        initial_faces: mesh.face_count(),
        ..Default::default()
    };

    if mesh.faces.is_empty() {
        warn!("Mesh has no faces, skipping face cleanup");
        if params.remove_unreferenced {
            report.unreferenced_vertices_removed = remove_unreferenced_vertices(mesh);
        }
        report.final_vertices = mesh.vertex_count();
        return Ok(report);
    }

    if params.remove_degenerate {
        report.degenerate_faces_removed =
            remove_degenerate_faces(mesh, params.degenerate_area_threshold);
    }

    if params.remove_duplicate_faces {
        report.duplicate_faces_removed = remove_duplicate_faces(mesh);
    }

    if params.merge_vertices {
        let (merged, collapsed) = merge_duplicate_vertices(mesh, params.merge_tolerance);
        report.vertices_merged = merged;
        report.collapsed_faces_removed = collapsed;
        if merged > 0 {
            // Moved indices can reveal new degenerates and duplicates
            if params.remove_degenerate {
                report.collapsed_faces_removed +=
                    remove_degenerate_faces(mesh, params.degenerate_area_threshold);
            }
            report.collapsed_faces_removed += remove_duplicate_faces(mesh);
        }
    }

    if params.remove_non_manifold {
        report.non_manifold_faces_removed = remove_non_manifold_faces(mesh);
    }

    if params.remove_unreferenced {
        report.unreferenced_vertices_removed = remove_unreferenced_vertices(mesh);
    }

    report.final_vertices = mesh.vertex_count();
    report.final_faces = mesh.face_count();

    info!(
        vertices_before = report.initial_vertices,
        vertices_after = report.final_vertices,
        faces_before = report.initial_faces,
        faces_after = report.final_faces,
        "Cleanup complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MeshAdjacency, Vertex};
    use approx::assert_relative_eq;

    fn simple_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        mesh
    }

    fn tetrahedron() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 1.0));
        mesh.faces.push([0, 2, 1]);
        mesh.faces.push([0, 1, 3]);
        mesh.faces.push([0, 3, 2]);
        mesh.faces.push([1, 2, 3]);
        mesh
    }

    #[test]
    fn test_remove_degenerate_faces() {
        let mut mesh = simple_mesh();
        mesh.vertices.push(Vertex::from_coords(0.5, 0.0, 0.0));
        mesh.faces.push([0, 1, 3]); // collinear
        mesh.faces.push([2, 2, 1]); // repeated index

        let removed = remove_degenerate_faces(&mut mesh, 1e-12);
        assert_eq!(removed, 2);
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_remove_duplicate_faces_any_winding() {
        let mut mesh = simple_mesh();
        mesh.faces.push([1, 2, 0]); // same winding, rotated
        mesh.faces.push([2, 1, 0]); // opposite winding

        let removed = remove_duplicate_faces(&mut mesh);
        assert_eq!(removed, 2);
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_merge_duplicate_vertices_keeps_smaller_index() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0)); // 0
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0)); // 1
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0)); // 2
        mesh.vertices.push(Vertex::from_coords(1.0 + 1e-9, 0.0, 0.0)); // 3, near 1
        mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 0.0)); // 4
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([3, 4, 2]);

        let (merged, dropped) = merge_duplicate_vertices(&mut mesh, 1e-6);
        assert_eq!(merged, 1);
        assert_eq!(dropped, 0);
        assert_eq!(mesh.faces[1], [1, 4, 2]);
    }

    #[test]
    fn test_merge_exact_with_zero_tolerance() {
        let mut mesh = simple_mesh();
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 1e-12, 0.0));
        mesh.faces.push([3, 4, 2]);

        let (merged, _) = merge_duplicate_vertices(&mut mesh, 0.0);
        assert_eq!(merged, 1);
        assert_eq!(mesh.faces[1], [1, 4, 2]);
    }

    #[test]
    fn test_merge_drops_collapsed_faces() {
        let mut mesh = simple_mesh();
        mesh.vertices.push(Vertex::from_coords(1e-9, 0.0, 0.0)); // 3, near 0
        mesh.faces.push([0, 3, 2]);

        let (merged, dropped) = merge_duplicate_vertices(&mut mesh, 1e-6);
        assert_eq!(merged, 1);
        assert_eq!(dropped, 1);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_remove_non_manifold_keeps_first_two() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.5, -1.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.5, 0.0, 1.0));
        mesh.vertices.push(Vertex::from_coords(0.5, 0.0, -1.0));
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([1, 0, 3]);
        mesh.faces.push([0, 1, 4]);
        mesh.faces.push([1, 0, 5]);

        let removed = remove_non_manifold_faces(&mut mesh);
        assert_eq!(removed, 2);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [1, 0, 3]]);
        assert!(MeshAdjacency::build(&mesh.faces).is_manifold());
    }

    #[test]
    fn test_remove_unreferenced_compacts() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(9.0, 9.0, 9.0)); // unused
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([1, 2, 3]);

        let removed = remove_unreferenced_vertices(&mut mesh);
        assert_eq!(removed, 1);
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
        assert_relative_eq!(mesh.vertices[0].position.x, 0.0);
    }

    #[test]
    fn test_clean_closed_mesh_is_noop() {
        let mut mesh = tetrahedron();
        let before = mesh.clone();
        let report = clean_mesh(&mut mesh).unwrap();
        assert!(report.is_noop());
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let mut mesh = tetrahedron();
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 1e-9)); // 4, near 1
        mesh.faces.push([4, 2, 3]); // duplicates [1, 2, 3] after merge
        mesh.faces.push([3, 2, 0]); // reverse duplicate of [0, 3, 2]
        mesh.faces.push([0, 0, 1]);

        let first = clean_mesh(&mut mesh).unwrap();
        assert!(!first.is_noop());
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.vertex_count(), 4);

        let snapshot = mesh.clone();
        let second = clean_mesh(&mut mesh).unwrap();
        assert!(second.is_noop());
        assert_eq!(mesh, snapshot);
    }

    #[test]
    fn test_clean_rejects_invalid_index() {
        let mut mesh = simple_mesh();
        mesh.faces.push([0, 1, 7]);
        let before = mesh.clone();

        let err = clean_mesh(&mut mesh).unwrap_err();
        assert!(matches!(
            err,
            MeshError::InvalidVertexIndex {
                face_index: 1,
                vertex_index: 7,
                ..
            }
        ));
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_disabled_params_leave_mesh_alone() {
        let mut mesh = simple_mesh();
        mesh.faces.push([0, 1, 2]);
        mesh.vertices.push(Vertex::from_coords(5.0, 5.0, 5.0));
        let before = mesh.clone();

        let report = clean_mesh_with_config(&mut mesh, &CleanParams::disabled()).unwrap();
        assert!(report.is_noop());
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_empty_mesh() {
        let mut mesh = Mesh::new();
        let report = clean_mesh(&mut mesh).unwrap();
        assert_eq!(report.final_faces, 0);
        assert!(report.is_noop());
    }

    #[test]
    fn test_faceless_mesh_drops_loose_vertices() {
        let mut mesh = Mesh::new();
        for _ in 0..3 {
            mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        }

        let report = clean_mesh(&mut mesh).unwrap();
        assert_eq!(report.unreferenced_vertices_removed, 3);
        assert_eq!(report.final_vertices, 0);
        assert!(mesh.vertices.is_empty());

        let mut kept = Mesh::new();
        kept.vertices.push(Vertex::from_coords(1.0, 2.0, 3.0));
        clean_mesh_with_config(&mut kept, &CleanParams::disabled()).unwrap();
        assert_eq!(kept.vertex_count(), 1);
    }
}
