use crate::{FrontierHandle, Node, NodeMap, Path, Weight};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Unvisited,
    /// In the frontier under this handle
    Open(FrontierHandle),
    Closed,
}

/// Per-vertex bookkeeping for one search run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRecord {
    /// Best known cost from the start
    pub g: Weight,
    /// Heuristic estimate to the goal, computed once on discovery
    pub h: Weight,
    /// Frontier key, `g + h` at the time it was installed
    pub f: Weight,
    pub predecessor: Option<Node>,
    pub status: Status,
    /// Closed -> Open transitions so far
    pub reopened: u32,
}

impl Default for SearchRecord {
    fn default() -> Self {
        Self {
            g: Weight::INFINITY,
            h: 0.0,
            f: Weight::INFINITY,
            predecessor: None,
            status: Status::Unvisited,
            reopened: 0,
        }
    }
}

impl SearchRecord {
    pub fn is_open(&self) -> bool {
        matches!(self.status, Status::Open(_))
    }

    pub fn is_closed(&self) -> bool {
        self.status == Status::Closed
    }
}

/// Vertex to [`SearchRecord`] table, indexed directly by node id.
/// Records appear on first discovery.
#[derive(Debug, Default)]
pub struct StateTable {
    records: NodeMap<SearchRecord>,
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            records: NodeMap::with_capacity(cap),
        }
    }

    /// The record for `n`, or an unvisited one if `n` has not been discovered
    pub fn get(&self, n: Node) -> SearchRecord {
        self.records.get(&n).copied().unwrap_or_default()
    }

    pub fn get_mut(&mut self, n: Node) -> &mut SearchRecord {
        self.records.get_or_insert_with(n, SearchRecord::default)
    }

    pub fn set(&mut self, n: Node, record: SearchRecord) {
        self.records.insert(n, record);
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Number of vertices with a record
    pub fn discovered(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Node, &SearchRecord)> {
        self.records.iter()
    }

    /// Follows predecessors back from `goal`. Gives up after `limit` steps,
    /// which only happens if the predecessor links form a cycle.
    pub fn path_to(&self, goal: Node, limit: usize) -> Option<Path> {
        let mut path = vec![goal];
        let mut child = goal;
        while let Some(parent) = self.records.get(&child)?.predecessor {
            if path.len() > limit {
                return None;
            }
            path.push(parent);
            child = parent;
        }
        path.reverse();
        Some(path)
    }
}
