use crate::{AdjacencyList, Edge, Node, Position};

/// Read-only access to a directed, weighted graph with a position per vertex.
///
/// Vertices are `Node(0)..Node(vertex_count())`. Implementations must not
/// change between calls while a search is running. Edge costs are expected to
/// be finite and non-negative.
pub trait GraphView {
    /// Outgoing edges of `n`
    fn neighbors(&self, n: Node) -> impl Iterator<Item = Edge> + '_;

    fn position(&self, n: Node) -> Position;

    fn vertex_count(&self) -> usize;
}

impl GraphView for AdjacencyList {
    fn neighbors(&self, n: Node) -> impl Iterator<Item = Edge> + '_ {
        self.edges(n).copied()
    }

    fn position(&self, n: Node) -> Position {
        AdjacencyList::position(self, n)
    }

    fn vertex_count(&self) -> usize {
        self.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct NodeInfo {
    offset: usize,
    len: usize,
}

/// Compressed sparse row graph: all edges in one array, sliced per node.
#[derive(Debug, Clone)]
pub struct SpatialGraph {
    node_data: Vec<Edge>,
    node_info: Vec<NodeInfo>,
    positions: Vec<Position>,
}

impl SpatialGraph {
    pub(crate) fn from_adjacency(nodes: &[Vec<Edge>], positions: &[Position]) -> Self {
        debug_assert_eq!(nodes.len(), positions.len());
        let len: usize = nodes.iter().map(Vec::len).sum();
        let mut node_data: Vec<Edge> = Vec::with_capacity(len);
        let mut node_info: Vec<NodeInfo> = Vec::with_capacity(nodes.len());

        for edges in nodes {
            let len = edges.len();
            let offset = node_data.len();
            node_data.extend_from_slice(edges);
            node_info.push(NodeInfo { offset, len });
        }

        Self {
            node_data,
            node_info,
            positions: positions.to_vec(),
        }
    }

    /// Return the outgoing edges from n
    pub fn edges(&self, n: Node) -> &[Edge] {
        let NodeInfo { offset, len } = self.node_info[n.0];
        &self.node_data[offset..offset + len]
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node> {
        (0..self.node_info.len()).map(Node)
    }

    pub fn len(&self) -> usize {
        self.node_info.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.node_data.len()
    }
}

impl GraphView for SpatialGraph {
    fn neighbors(&self, n: Node) -> impl Iterator<Item = Edge> + '_ {
        self.edges(n).iter().copied()
    }

    fn position(&self, n: Node) -> Position {
        self.positions[n.0]
    }

    fn vertex_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod test {
    use crate::{AdjacencyList, Edge, GraphView, Node};

    fn example() -> AdjacencyList {
        let mut g = AdjacencyList::new();
        let ns: [Node; 4] = std::array::from_fn(|i| g.add_node((i, i * 2)));
        g.add_edge(ns[0], ns[1], 1.0);
        g.add_edge(ns[0], ns[2], 4.0);
        g.add_edge(ns[2], ns[3], 0.5);
        g
    }

    #[test]
    fn lock_keeps_edges_and_positions() {
        let g = example();
        let locked = g.lock();
        assert_eq!(locked.vertex_count(), g.vertex_count());
        assert_eq!(locked.edge_count(), 3);
        for n in g.nodes() {
            let expected: Vec<Edge> = g.neighbors(n).collect();
            let actual: Vec<Edge> = locked.neighbors(n).collect();
            assert_eq!(actual, expected);
            assert_eq!(locked.position(n), g.position(n));
        }
    }

    #[test]
    fn lock_empty() {
        let locked = AdjacencyList::new().lock();
        assert!(locked.is_empty());
        assert_eq!(locked.nodes().count(), 0);
    }

    #[test]
    fn node_without_edges() {
        let locked = example().lock();
        assert!(locked.edges(Node(1)).is_empty());
        assert!(locked.edges(Node(3)).is_empty());
    }
}
