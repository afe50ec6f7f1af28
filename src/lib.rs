use std::collections::VecDeque;

mod astar;
mod frontier;
mod graph;
mod heuristic;
mod map;
mod set;
mod shortest_path;
mod state;

pub use astar::{
    a_star, a_star_observed, CancelFlag, FoundPath, SearchConfig, SearchContext, SearchError,
    SearchObserver, SearchOutcome, SearchStats,
};
pub use frontier::{Frontier, FrontierError, FrontierHandle};
pub use graph::{GraphView, SpatialGraph};
pub use heuristic::{Euclidean, HeuristicDistance, Manhattan, Octile, Zero};
pub use map::NodeMap;
pub use set::NodeSet;
pub use shortest_path::find_path;
pub use state::{SearchRecord, StateTable, Status};

/// Vertices from start to goal, both included
pub type Path = Vec<Node>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node(pub usize);

impl Node {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("N{}", self.0))
    }
}

pub type Weight = f64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub node: Node,
    pub weight: Weight,
}

fn edge(n: Node, weight: Weight) -> Edge {
    Edge { node: n, weight }
}

impl From<(Node, Weight)> for Edge {
    fn from((node, weight): (Node, Weight)) -> Self {
        Edge { node, weight }
    }
}

/// Planar coordinates attached to a vertex. Only heuristics look at these.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Position { x, y }
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Position {
            x: x as f64,
            y: y as f64,
        }
    }
}

/// Mutable graph builder. Call [`AdjacencyList::lock`] to get the compact
/// read-only form used for searching.
#[derive(Clone, Default)]
pub struct AdjacencyList {
    nodes: Vec<Vec<Edge>>,
    positions: Vec<Position>,
}

impl AdjacencyList {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(cap),
            positions: Vec::with_capacity(cap),
        }
    }

    pub fn add_node(&mut self, position: impl Into<Position>) -> Node {
        let n = Node(self.nodes.len());
        self.nodes.push(Vec::new());
        self.positions.push(position.into());
        n
    }

    fn is_valid(&self, n: Node) -> bool {
        n.0 < self.nodes.len()
    }

    /// Adds a directed edge. A second edge between the same pair is ignored.
    pub fn add_edge(&mut self, a: Node, b: Node, c: Weight) {
        assert!(self.is_valid(a) && self.is_valid(b));
        if self.has_directed_edge_unchecked(a, b) {
            return;
        }
        self.nodes[a.0].push(edge(b, c));
    }

    fn has_directed_edge_unchecked(&self, a: Node, b: Node) -> bool {
        self.nodes[a.0].iter().any(|edge| edge.node == b)
    }

    pub fn has_edge(&self, a: Node, b: Node) -> bool {
        if !self.is_valid(a) || !self.is_valid(b) {
            return false;
        }

        self.has_directed_edge_unchecked(a, b)
    }

    /// Return the outgoing edges from n
    pub fn edges(&self, n: Node) -> impl Iterator<Item = &Edge> {
        assert!(self.is_valid(n));
        self.nodes[n.0].iter()
    }

    pub fn position(&self, n: Node) -> Position {
        self.positions[n.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node> {
        (0..self.nodes.len()).map(Node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(Vec::len).sum()
    }

    /// Freeze into a compressed sparse row graph
    pub fn lock(&self) -> SpatialGraph {
        SpatialGraph::from_adjacency(&self.nodes, &self.positions)
    }
}

/// Every vertex reachable from `start` along out-edges, `start` included.
pub fn reachable_from<G: GraphView>(g: &G, start: Node) -> NodeSet {
    let mut visited = NodeSet::with_capacity(g.vertex_count());
    if start.0 >= g.vertex_count() {
        return visited;
    }

    let mut queue = VecDeque::new();
    queue.push_back(start);
    visited.add(start);
    while let Some(n) = queue.pop_front() {
        for Edge { node: child, .. } in g.neighbors(n) {
            if child.0 < g.vertex_count() && visited.add(child) {
                queue.push_back(child);
            }
        }
    }

    visited
}

#[cfg(test)]
mod test {
    use crate::{reachable_from, AdjacencyList, GraphView, Node, Position};

    fn init(edges: &[(usize, usize)]) -> AdjacencyList {
        let mut g = AdjacencyList::new();

        let max = edges
            .iter()
            .max_by(|x, y| x.0.max(x.1).cmp(&y.0.max(y.1)))
            .unwrap();
        let max = std::cmp::max(max.0, max.1);
        let nodes: Vec<Node> = (0..max + 1).map(|i| g.add_node((i, 0usize))).collect();
        for e in edges.iter() {
            g.add_edge(nodes[e.0], nodes[e.1], 1.0);
        }

        g
    }

    fn example_edges_cyclic() -> Vec<(usize, usize)> {
        vec![(1, 4), (3, 6), (4, 1), (10, 19), (0, 19), (0, 4)]
    }

    #[test]
    fn add_edge() {
        let mut g = AdjacencyList::new();

        let a = g.add_node((0.0, 0.0));
        let b = g.add_node((1.0, 0.0));
        g.add_edge(a, b, 1.0);
        assert!(g.has_edge(a, b));
        assert!(!g.has_edge(b, a));
    }

    #[test]
    fn add_unidirectional() {
        let mut g = AdjacencyList::new();

        let a = g.add_node((0.0, 0.0));
        let b = g.add_node((1.0, 0.0));
        g.add_edge(a, b, 1.0);
        g.add_edge(b, a, 1.0);
        assert!(g.has_edge(a, b));
        assert!(g.has_edge(b, a));
    }

    #[test]
    fn duplicate_edge_keeps_first_cost() {
        let mut g = AdjacencyList::new();

        let a = g.add_node((0.0, 0.0));
        let b = g.add_node((1.0, 0.0));
        g.add_edge(a, b, 1.0);
        g.add_edge(a, b, 7.0);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edges(a).next().unwrap().weight, 1.0);
    }

    #[test]
    fn add() {
        let edges = example_edges_cyclic();
        let g = init(&edges);
        for e in &edges {
            assert!(g.has_edge(Node(e.0), Node(e.1)));
        }
        assert!(!g.has_edge(Node(0), Node(100)));
    }

    #[test]
    fn positions() {
        let mut g = AdjacencyList::new();
        let a = g.add_node((3usize, 4usize));
        let b = g.add_node(Position::new(-1.5, 2.0));
        assert_eq!(g.position(a), Position::new(3.0, 4.0));
        assert_eq!(g.position(b), Position::new(-1.5, 2.0));
    }

    #[test]
    fn reachable() {
        let g = init(&example_edges_cyclic());
        let set = reachable_from(&g, Node(0));
        let mut actual: Vec<Node> = g.nodes().filter(|&n| set.has(n)).collect();
        actual.sort();
        assert_eq!(actual, vec![Node(0), Node(1), Node(4), Node(19)]);

        let set = reachable_from(&g, Node(6));
        assert_eq!(set.len(), 1);
        assert!(set.has(Node(6)));
    }

    #[test]
    fn reachable_out_of_range_is_empty() {
        let g = init(&example_edges_cyclic());
        assert_eq!(reachable_from(&g, Node(g.vertex_count())).len(), 0);
    }
}
