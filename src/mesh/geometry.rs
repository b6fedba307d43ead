use nalgebra::Point3;

use super::topology::{Connectivity, NodeElementMap};

/// Geometric information for the mesh
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    /// Node coordinates in the reference (undeformed) configuration
    pub nodes: Vec<Point3<f64>>,
}

impl Geometry {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add_node(&mut self, x: f64, y: f64, z: f64) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Point3::new(x, y, z));
        idx
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

/// Complete mesh with geometry, topology, and the node→element adjacency
/// used by the node-pass gather
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Geometry,
    pub connectivity: Connectivity,
    pub adjacency: NodeElementMap,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            geometry: Geometry::new(),
            connectivity: Connectivity::new(),
            adjacency: NodeElementMap::default(),
        }
    }

    /// Rebuild the node→(element, corner) adjacency after all elements are
    /// loaded. Must be called before the simulation starts.
    pub fn build_adjacency(&mut self) {
        self.adjacency =
            NodeElementMap::build(self.geometry.num_nodes(), &self.connectivity.elements);
    }

    pub fn num_nodes(&self) -> usize {
        self.geometry.num_nodes()
    }

    pub fn num_elements(&self) -> usize {
        self.connectivity.num_elements()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
