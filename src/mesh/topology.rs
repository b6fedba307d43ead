/// A 4-node linear tetrahedral element (Tet4)
///
/// Node ordering follows the input file; the ordering determines the element
/// orientation, and a positive reference volume requires a right-handed
/// vertex sequence.
#[derive(Debug, Clone, Copy)]
pub struct Tet4Element {
    /// Global node indices for this element
    pub nodes: [usize; 4],
}

impl Tet4Element {
    pub fn new(nodes: [usize; 4]) -> Self {
        Self { nodes }
    }
}

/// Connectivity information for the mesh
#[derive(Debug, Clone, Default)]
pub struct Connectivity {
    pub elements: Vec<Tet4Element>,
}

impl Connectivity {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn add_element(&mut self, element: Tet4Element) {
        self.elements.push(element);
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }
}

/// Node→(element, local corner) adjacency in CSR layout
///
/// For node `i`, `incident(i)` yields every (element id, corner index) pair
/// such that `elements[element id].nodes[corner] == i`. The node pass sums
/// per-element per-corner contributions through this table instead of having
/// the element pass scatter into shared nodal arrays, so neither pass ever
/// has two writers on one memory cell.
#[derive(Debug, Clone, Default)]
pub struct NodeElementMap {
    /// Prefix offsets into `pairs`, length num_nodes + 1
    offsets: Vec<usize>,
    /// Contiguous (element id, local corner) pairs grouped by node
    pairs: Vec<(usize, usize)>,
}

impl NodeElementMap {
    /// Build the adjacency table from element connectivity.
    pub fn build(num_nodes: usize, elements: &[Tet4Element]) -> Self {
        let mut counts = vec![0usize; num_nodes];
        for elem in elements {
            for &node in &elem.nodes {
                counts[node] += 1;
            }
        }

        let mut offsets = vec![0usize; num_nodes + 1];
        for i in 0..num_nodes {
            offsets[i + 1] = offsets[i] + counts[i];
        }

        let mut cursor = offsets[..num_nodes].to_vec();
        let mut pairs = vec![(0usize, 0usize); offsets[num_nodes]];
        for (elem_id, elem) in elements.iter().enumerate() {
            for (corner, &node) in elem.nodes.iter().enumerate() {
                pairs[cursor[node]] = (elem_id, corner);
                cursor[node] += 1;
            }
        }

        Self { offsets, pairs }
    }

    /// All (element id, local corner) pairs incident to `node`.
    pub fn incident(&self, node: usize) -> &[(usize, usize)] {
        &self.pairs[self.offsets[node]..self.offsets[node + 1]]
    }

    pub fn num_nodes(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Total number of stored pairs (4 × number of elements).
    pub fn num_pairs(&self) -> usize {
        self.pairs.len()
    }
}
