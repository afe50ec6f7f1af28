use crate::{a_star, GraphView, HeuristicDistance, Node, SearchContext, SearchError, SearchOutcome};

/// One-off search with a fresh [`SearchContext`] and the default
/// [`crate::SearchConfig`]. Prefer [`a_star`] with a reused context when
/// running many searches over the same graph.
pub fn find_path<G, H>(
    graph: &G,
    heuristic: H,
    start: Node,
    goal: Node,
) -> Result<SearchOutcome, SearchError>
where
    G: GraphView,
    H: HeuristicDistance,
{
    let mut ctx = SearchContext::for_graph(graph);
    a_star(&mut ctx, graph, start, goal, heuristic)
}
