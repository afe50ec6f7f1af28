use crate::{GraphView, Node, Weight};

/// Estimated remaining cost from `from` to `goal`.
///
/// Optimal paths are only guaranteed for admissible estimates (never above
/// the true remaining cost). Without consistency a vertex may need to be
/// reopened, see [`crate::SearchConfig::reopen_closed`]. A bad estimate can
/// make the result suboptimal but never stops the search from terminating.
pub trait HeuristicDistance {
    fn cost(&self, from: Node, goal: Node) -> Weight;
}

impl<F> HeuristicDistance for F
where
    F: Fn(Node, Node) -> Weight,
{
    fn cost(&self, from: Node, goal: Node) -> Weight {
        self(from, goal)
    }
}

/// No guidance, the search behaves like Dijkstra
#[derive(Debug, Clone, Copy, Default)]
pub struct Zero;

impl HeuristicDistance for Zero {
    fn cost(&self, _from: Node, _goal: Node) -> Weight {
        0.0
    }
}

/// Straight line distance between vertex positions, times `scale`.
///
/// Admissible whenever every edge costs at least `scale` times the distance
/// between its endpoints.
pub struct Euclidean<'g, G> {
    graph: &'g G,
    scale: Weight,
}

impl<'g, G: GraphView> Euclidean<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self::with_scale(graph, 1.0)
    }

    pub fn with_scale(graph: &'g G, scale: Weight) -> Self {
        Self { graph, scale }
    }
}

impl<G: GraphView> HeuristicDistance for Euclidean<'_, G> {
    fn cost(&self, from: Node, goal: Node) -> Weight {
        let a = self.graph.position(from);
        let b = self.graph.position(goal);
        let (dx, dy) = (a.x - b.x, a.y - b.y);
        (dx.powi(2) + dy.powi(2)).sqrt() * self.scale
    }
}

/// Sum of the axis distances. Admissible on 4-connected grids with unit steps.
pub struct Manhattan<'g, G> {
    graph: &'g G,
}

impl<'g, G: GraphView> Manhattan<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }
}

impl<G: GraphView> HeuristicDistance for Manhattan<'_, G> {
    fn cost(&self, from: Node, goal: Node) -> Weight {
        let a = self.graph.position(from);
        let b = self.graph.position(goal);
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }
}

/// Exact distance on an empty 8-connected grid with straight steps costing 1
/// and diagonal steps costing sqrt(2).
pub struct Octile<'g, G> {
    graph: &'g G,
}

impl<'g, G: GraphView> Octile<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }
}

impl<G: GraphView> HeuristicDistance for Octile<'_, G> {
    fn cost(&self, from: Node, goal: Node) -> Weight {
        let a = self.graph.position(from);
        let b = self.graph.position(goal);
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        let (long, short) = if dx > dy { (dx, dy) } else { (dy, dx) };
        long + (std::f64::consts::SQRT_2 - 1.0) * short
    }
}

#[cfg(test)]
mod test {
    use crate::{AdjacencyList, Euclidean, HeuristicDistance, Manhattan, Node, Octile, Zero};

    fn points() -> AdjacencyList {
        let mut g = AdjacencyList::new();
        g.add_node((0.0, 0.0));
        g.add_node((3.0, 4.0));
        g.add_node((-2.0, 1.0));
        g
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn zero() {
        assert_eq!(Zero.cost(Node(0), Node(1)), 0.0);
    }

    #[test]
    fn closure() {
        let h = |from: Node, goal: Node| (goal.0 as f64 - from.0 as f64).abs();
        assert_eq!(h.cost(Node(2), Node(7)), 5.0);
    }

    #[test]
    fn euclidean() {
        let g = points();
        assert!(close(Euclidean::new(&g).cost(Node(0), Node(1)), 5.0));
        assert!(close(Euclidean::new(&g).cost(Node(1), Node(1)), 0.0));
        assert!(close(
            Euclidean::with_scale(&g, 0.5).cost(Node(1), Node(0)),
            2.5
        ));
    }

    #[test]
    fn manhattan() {
        let g = points();
        assert!(close(Manhattan::new(&g).cost(Node(1), Node(2)), 8.0));
    }

    #[test]
    fn octile() {
        let g = points();
        // 4 long, 3 short
        let expected = 4.0 + (2f64.sqrt() - 1.0) * 3.0;
        assert!(close(Octile::new(&g).cost(Node(0), Node(1)), expected));
        assert!(close(Octile::new(&g).cost(Node(1), Node(0)), expected));
    }

    #[test]
    fn octile_between_euclidean_and_manhattan() {
        let g = points();
        for a in g.nodes() {
            for b in g.nodes() {
                let e = Euclidean::new(&g).cost(a, b);
                let o = Octile::new(&g).cost(a, b);
                let m = Manhattan::new(&g).cost(a, b);
                assert!(e <= o + 1e-9 && o <= m + 1e-9);
            }
        }
    }
}
