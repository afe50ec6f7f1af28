use crate::{
    Edge, Frontier, GraphView, HeuristicDistance, Node, Path, SearchRecord, StateTable, Status,
    Weight,
};

use log::{debug, trace};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Knobs for [`a_star`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Put a closed vertex back in the frontier when a cheaper path to it
    /// turns up. Only needed for heuristics that are admissible but not
    /// consistent. Each vertex is reopened at most `vertex_count` times.
    pub reopen_closed: bool,
    /// Reject edges with negative or non-finite cost and edges pointing
    /// outside the graph. When off such edges are followed (bad targets are
    /// skipped) and optimality is no longer guaranteed.
    pub validate_input: bool,
    /// Stop with [`SearchOutcome::Cancelled`] after this many expansions
    pub max_expansions: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            reopen_closed: false,
            validate_input: true,
            max_expansions: None,
        }
    }
}

impl SearchConfig {
    pub fn reopen_closed(mut self, on: bool) -> Self {
        self.reopen_closed = on;
        self
    }

    pub fn validate_input(mut self, on: bool) -> Self {
        self.validate_input = on;
        self
    }

    pub fn max_expansions(mut self, max: Option<usize>) -> Self {
        self.max_expansions = max;
        self
    }
}

/// Counters for the last run of a [`SearchContext`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: usize,
    pub inserted: usize,
    pub decreased: usize,
    pub reopened: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoundPath {
    pub path: Path,
    pub cost: Weight,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(FoundPath),
    /// The goal is not reachable from the start
    Unreachable,
    /// Stopped by the observer or the expansion budget
    Cancelled,
}

impl SearchOutcome {
    pub fn found(&self) -> Option<&FoundPath> {
        match self {
            SearchOutcome::Found(found) => Some(found),
            _ => None,
        }
    }

    pub fn cost(&self) -> Option<Weight> {
        self.found().map(|f| f.cost)
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchOutcome::Found(found) => Some(found.path),
            _ => None,
        }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Found(found) => write!(
                f,
                "found path of {} vertices, cost {}",
                found.path.len(),
                found.cost
            ),
            SearchOutcome::Unreachable => f.write_str("unreachable"),
            SearchOutcome::Cancelled => f.write_str("cancelled"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("vertex {node} is out of range for a graph with {vertex_count} vertices")]
    InvalidVertex { node: Node, vertex_count: usize },
    #[error("edge {from} -> {to} has cost {cost}, costs must be finite and non-negative")]
    InvalidCost { from: Node, to: Node, cost: Weight },
    #[error("predecessor links leading to {at} form a cycle")]
    PredecessorCycle { at: Node },
}

/// Hooks into a running search. Every method defaults to doing nothing.
pub trait SearchObserver {
    /// A vertex entered the frontier for the first time with key `f`
    fn on_insert(&mut self, _node: Node, _f: Weight) {}

    fn on_decrease_key(&mut self, _node: Node, _old_f: Weight, _new_f: Weight) {}

    fn on_expand(&mut self, _node: Node, _g: Weight) {}

    /// A closed vertex went back into the frontier with key `f`
    fn on_reopen(&mut self, _node: Node, _f: Weight) {}

    /// Polled once before every extraction
    fn is_cancelled(&mut self) -> bool {
        false
    }
}

impl SearchObserver for () {}

/// Cancels the search once the flag is set, e.g. from another thread
pub struct CancelFlag<'a>(pub &'a AtomicBool);

impl SearchObserver for CancelFlag<'_> {
    fn is_cancelled(&mut self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything a search run mutates. Reuse one per thread to avoid
/// reallocating between searches; the graph itself is only ever borrowed.
#[derive(Debug, Default)]
pub struct SearchContext {
    state: StateTable,
    frontier: Frontier,
    config: SearchConfig,
    stats: SearchStats,
}

impl SearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            state: StateTable::with_capacity(cap),
            frontier: Frontier::with_capacity(cap),
            ..Self::default()
        }
    }

    pub fn for_graph<G: GraphView>(g: &G) -> Self {
        Self::with_capacity(g.vertex_count())
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Per-vertex records left behind by the last run
    pub fn state(&self) -> &StateTable {
        &self.state
    }

    pub fn clear_transients(&mut self) {
        self.state.reset();
        self.frontier.clear();
        self.stats = SearchStats::default();
    }
}

/// Find the shortest path between two nodes
pub fn a_star<G, H>(
    ctx: &mut SearchContext,
    graph: &G,
    start: Node,
    goal: Node,
    heuristic: H,
) -> Result<SearchOutcome, SearchError>
where
    G: GraphView,
    H: HeuristicDistance,
{
    a_star_observed(ctx, graph, start, goal, heuristic, &mut ())
}

/// [`a_star`] reporting its progress to `observer`, which may also cancel it
pub fn a_star_observed<G, H, O>(
    ctx: &mut SearchContext,
    graph: &G,
    start: Node,
    goal: Node,
    heuristic: H,
    observer: &mut O,
) -> Result<SearchOutcome, SearchError>
where
    G: GraphView,
    H: HeuristicDistance,
    O: SearchObserver + ?Sized,
{
    ctx.clear_transients();

    let vertex_count = graph.vertex_count();
    for node in [start, goal] {
        if node.0 >= vertex_count {
            return Err(SearchError::InvalidVertex { node, vertex_count });
        }
    }

    if start == goal {
        return Ok(SearchOutcome::Found(FoundPath {
            path: vec![start],
            cost: 0.0,
        }));
    }

    debug!("Searching {start} -> {goal} in a graph of {vertex_count} vertices");
    let config = ctx.config;
    let result = Run {
        graph,
        heuristic,
        goal,
        vertex_count,
        config,
        state: &mut ctx.state,
        frontier: &mut ctx.frontier,
        stats: &mut ctx.stats,
        observer,
    }
    .run(start);

    let SearchStats {
        expanded,
        inserted,
        decreased,
        reopened,
    } = ctx.stats;
    match &result {
        Ok(outcome) => debug!(
            "{start} -> {goal}: {outcome} ({expanded} expanded, {inserted} inserted, \
             {decreased} decreased, {reopened} reopened)"
        ),
        Err(e) => debug!("{start} -> {goal} failed after {expanded} expansions: {e}"),
    }
    result
}

struct Run<'a, G, H, O: ?Sized> {
    graph: &'a G,
    heuristic: H,
    goal: Node,
    vertex_count: usize,
    config: SearchConfig,
    state: &'a mut StateTable,
    frontier: &'a mut Frontier,
    stats: &'a mut SearchStats,
    observer: &'a mut O,
}

impl<G, H, O> Run<'_, G, H, O>
where
    G: GraphView,
    H: HeuristicDistance,
    O: SearchObserver + ?Sized,
{
    fn run(mut self, start: Node) -> Result<SearchOutcome, SearchError> {
        let h = self.heuristic.cost(start, self.goal);
        let handle = self.frontier.insert(start, h);
        self.state.set(
            start,
            SearchRecord {
                g: 0.0,
                h,
                f: h,
                predecessor: None,
                status: Status::Open(handle),
                reopened: 0,
            },
        );
        self.stats.inserted += 1;
        self.observer.on_insert(start, h);

        while !self.frontier.is_empty() {
            if self.observer.is_cancelled() {
                debug!("Search cancelled after {} expansions", self.stats.expanded);
                return Ok(SearchOutcome::Cancelled);
            }

            let (cur, _) = self
                .frontier
                .extract_min()
                .expect("frontier was checked to be non-empty");

            if cur == self.goal {
                let cost = self.state.get(cur).g;
                let path = self
                    .state
                    .path_to(cur, self.vertex_count)
                    .ok_or(SearchError::PredecessorCycle { at: cur })?;
                return Ok(SearchOutcome::Found(FoundPath { path, cost }));
            }

            if self.over_budget() {
                debug!("Expansion budget of {} used up", self.stats.expanded);
                return Ok(SearchOutcome::Cancelled);
            }
            self.expand(cur)?;
        }

        Ok(SearchOutcome::Unreachable)
    }

    fn over_budget(&self) -> bool {
        self.config
            .max_expansions
            .is_some_and(|max| self.stats.expanded >= max)
    }

    fn expand(&mut self, cur: Node) -> Result<(), SearchError> {
        let record = self.state.get_mut(cur);
        record.status = Status::Closed;
        let cur_cost = record.g;
        self.stats.expanded += 1;
        self.observer.on_expand(cur, cur_cost);
        trace!("Expanding {cur} at cost {cur_cost}");

        let graph = self.graph;
        for Edge {
            node: child,
            weight: cost,
        } in graph.neighbors(cur)
        {
            if self.config.validate_input {
                self.validate(cur, child, cost)?;
            } else if child.0 >= self.vertex_count {
                continue;
            }
            self.relax(cur, child, cur_cost + cost);
        }
        Ok(())
    }

    fn validate(&self, from: Node, to: Node, cost: Weight) -> Result<(), SearchError> {
        if to.0 >= self.vertex_count {
            return Err(SearchError::InvalidVertex {
                node: to,
                vertex_count: self.vertex_count,
            });
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(SearchError::InvalidCost { from, to, cost });
        }
        Ok(())
    }

    /// Offer `start_to_child_cost` as a path to `child` through `parent`
    fn relax(&mut self, parent: Node, child: Node, start_to_child_cost: Weight) {
        let g = start_to_child_cost;
        let record = self.state.get(child);
        match record.status {
            Status::Unvisited => {
                let h = self.heuristic.cost(child, self.goal);
                let f = g + h;
                let handle = self.frontier.insert(child, f);
                self.state.set(
                    child,
                    SearchRecord {
                        g,
                        h,
                        f,
                        predecessor: Some(parent),
                        status: Status::Open(handle),
                        reopened: 0,
                    },
                );
                self.stats.inserted += 1;
                self.observer.on_insert(child, f);
            }
            Status::Open(handle) if g < record.g => {
                let f = g + record.h;
                let entry = self.state.get_mut(child);
                entry.g = g;
                entry.predecessor = Some(parent);
                // An odd heuristic value (NaN, infinity) can leave the key
                // where it is even though g went down.
                if f.total_cmp(&record.f).is_lt() {
                    self.frontier
                        .decrease_key(handle, f)
                        .expect("open vertex has a live handle and a larger key");
                    entry.f = f;
                    self.stats.decreased += 1;
                    self.observer.on_decrease_key(child, record.f, f);
                }
            }
            Status::Closed
                if self.config.reopen_closed
                    && g < record.g
                    && (record.reopened as usize) < self.vertex_count =>
            {
                let f = g + record.h;
                let handle = self.frontier.insert(child, f);
                self.state.set(
                    child,
                    SearchRecord {
                        g,
                        f,
                        predecessor: Some(parent),
                        status: Status::Open(handle),
                        reopened: record.reopened.saturating_add(1),
                        ..record
                    },
                );
                self.stats.inserted += 1;
                self.stats.reopened += 1;
                self.observer.on_reopen(child, f);
                trace!("Reopening {child} at cost {g}");
            }
            _ => {}
        }
    }
}
