//! Connected component analysis for meshes.
//!
//! A connected component is a set of faces reachable from each other
//! through shared edges. A clean visual hull of a single object should
//! consist of exactly one.

use std::cmp::Reverse;

use tracing::debug;

use crate::adjacency::MeshAdjacency;
use crate::types::Mesh;

/// Result of connected component analysis.
#[derive(Debug, Clone)]
pub struct ComponentAnalysis {
    /// Number of connected components found.
    pub component_count: usize,
    /// Face indices for each component, sorted by component size (largest first).
    pub components: Vec<Vec<u32>>,
    /// Size of the largest component (number of faces).
    pub largest_component_size: usize,
}

impl ComponentAnalysis {
    /// Check if the mesh is fully connected (single component).
    pub fn is_connected(&self) -> bool {
        self.component_count == 1
    }

    /// Get the face indices of the largest component.
    pub fn largest_component(&self) -> &[u32] {
        self.components.first().map(|v| v.as_slice()).unwrap_or(&[])
    }
}

impl std::fmt::Display for ComponentAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Component Analysis:")?;
        writeln!(f, "  Connected components: {}", self.component_count)?;
        if self.component_count > 1 {
            for (i, comp) in self.components.iter().enumerate() {
                writeln!(f, "    Component {}: {} faces", i + 1, comp.len())?;
            }
        }
        Ok(())
    }
}

/// Find all edge-connected components in a mesh.
///
/// Faces that share an edge with exactly one other face are linked; an edge
/// used by three or more faces does not join anything.
///
/// # Example
/// ```
/// use hull_mesh::{Mesh, Vertex};
/// use hull_mesh::components::find_connected_components;
///
/// let mut mesh = Mesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(10.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(11.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(10.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
/// mesh.faces.push([3, 4, 5]);
///
/// let analysis = find_connected_components(&mesh);
/// assert_eq!(analysis.component_count, 2);
/// ```
pub fn find_connected_components(mesh: &Mesh) -> ComponentAnalysis {
    if mesh.faces.is_empty() {
        return ComponentAnalysis {
            component_count: 0,
            components: Vec::new(),
            largest_component_size: 0,
        };
    }

    let adjacency = MeshAdjacency::build(&mesh.faces);
    let face_count = mesh.faces.len();

    let mut face_neighbors: Vec<Vec<u32>> = vec![Vec::new(); face_count];
    for faces in adjacency.edge_to_faces.values() {
        if let [f0, f1] = faces[..] {
            face_neighbors[f0 as usize].push(f1);
            face_neighbors[f1 as usize].push(f0);
        }
    }

    let mut visited = vec![false; face_count];
    let mut components: Vec<Vec<u32>> = Vec::new();

    for start_face in 0..face_count {
        if visited[start_face] {
            continue;
        }

        let mut component = Vec::new();
        let mut stack = vec![start_face as u32];
        visited[start_face] = true;

        while let Some(face_idx) = stack.pop() {
            component.push(face_idx);
            for &neighbor in &face_neighbors[face_idx as usize] {
                if !visited[neighbor as usize] {
                    visited[neighbor as usize] = true;
                    stack.push(neighbor);
                }
            }
        }

        components.push(component);
    }

    components.sort_by_key(|c| Reverse(c.len()));

    let component_count = components.len();
    let largest_component_size = components.first().map(|c| c.len()).unwrap_or(0);

    debug!(
        component_count,
        face_count,
        sizes = ?components.iter().map(|c| c.len()).collect::<Vec<_>>(),
        "Connected components"
    );

    ComponentAnalysis {
        component_count,
        components,
        largest_component_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vertex;

    #[test]
    fn test_empty_mesh_has_no_components() {
        let analysis = find_connected_components(&Mesh::new());
        assert_eq!(analysis.component_count, 0);
        assert!(analysis.largest_component().is_empty());
    }

    #[test]
    fn test_quad_is_one_component() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([0, 2, 3]);

        let analysis = find_connected_components(&mesh);
        assert!(analysis.is_connected());
        assert_eq!(analysis.largest_component_size, 2);
    }

    #[test]
    fn test_components_sorted_largest_first() {
        let mut mesh = Mesh::new();
        for i in 0..7 {
            mesh.vertices.push(Vertex::from_coords(i as f64, (i % 2) as f64, 0.0));
        }
        mesh.faces.push([4, 5, 6]);
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([1, 3, 2]);

        let analysis = find_connected_components(&mesh);
        assert_eq!(analysis.component_count, 2);
        assert_eq!(analysis.components[0].len(), 2);
        assert_eq!(analysis.components[1], vec![0]);
    }
}
