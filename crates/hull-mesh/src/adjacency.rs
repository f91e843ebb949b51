//! Edge-to-face adjacency for triangle meshes.

use hashbrown::HashMap;

/// Undirected edge key with the smaller vertex index first.
#[inline]
pub fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// The three undirected edges of a face, as normalized keys.
#[inline]
pub fn face_edges(face: &[u32; 3]) -> [(u32, u32); 3] {
    [
        edge_key(face[0], face[1]),
        edge_key(face[1], face[2]),
        edge_key(face[2], face[0]),
    ]
}

/// Edge adjacency of a face list.
///
/// Maps every undirected edge to the faces that use it, in face order.
#[derive(Debug, Clone, Default)]
pub struct MeshAdjacency {
    /// Faces incident to each undirected edge.
    pub edge_to_faces: HashMap<(u32, u32), Vec<u32>>,
}

impl MeshAdjacency {
    /// Build adjacency from a face list.
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut edge_to_faces: HashMap<(u32, u32), Vec<u32>> =
            HashMap::with_capacity(faces.len() * 3 / 2 + 1);

        for (face_idx, face) in faces.iter().enumerate() {
            for edge in face_edges(face) {
                edge_to_faces.entry(edge).or_default().push(face_idx as u32);
            }
        }

        Self { edge_to_faces }
    }

    /// Number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }

    /// Edges used by exactly one face.
    pub fn boundary_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(&edge, _)| edge)
    }

    /// Edges shared by more than two faces.
    pub fn non_manifold_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() > 2)
            .map(|(&edge, _)| edge)
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.boundary_edges().count()
    }

    pub fn non_manifold_edge_count(&self) -> usize {
        self.non_manifold_edges().count()
    }

    /// True when no edge is shared by more than two faces.
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count() == 0
    }

    /// True when every edge is shared by at least two faces.
    pub fn is_watertight(&self) -> bool {
        self.boundary_edge_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_key_is_order_independent() {
        assert_eq!(edge_key(3, 1), (1, 3));
        assert_eq!(edge_key(1, 3), (1, 3));
    }

    #[test]
    fn test_single_triangle_is_all_boundary() {
        let adj = MeshAdjacency::build(&[[0, 1, 2]]);
        assert_eq!(adj.edge_count(), 3);
        assert_eq!(adj.boundary_edge_count(), 3);
        assert!(adj.is_manifold());
        assert!(!adj.is_watertight());
    }

    #[test]
    fn test_tetrahedron_is_closed() {
        let faces = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
        let adj = MeshAdjacency::build(&faces);
        assert_eq!(adj.edge_count(), 6);
        assert!(adj.is_watertight());
        assert!(adj.is_manifold());
    }

    #[test]
    fn test_fan_of_three_is_non_manifold() {
        let faces = [[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        let adj = MeshAdjacency::build(&faces);
        let nm: Vec<_> = adj.non_manifold_edges().collect();
        assert_eq!(nm, vec![(0, 1)]);
        assert_eq!(adj.edge_to_faces[&(0, 1)], vec![0, 1, 2]);
    }

    #[test]
    fn test_empty() {
        let adj = MeshAdjacency::build(&[]);
        assert!(adj.is_manifold());
        assert!(adj.is_watertight());
        assert_eq!(adj.boundary_edge_count(), 0);
    }
}
