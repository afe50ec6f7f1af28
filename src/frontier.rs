use crate::{Node, Weight};

use std::cmp::Ordering;
use thiserror::Error;

/// Token for an entry in a [`Frontier`], needed to lower its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrontierHandle(usize);

#[derive(Debug, Error, PartialEq)]
pub enum FrontierError {
    #[error("extract_min called on an empty frontier")]
    Empty,
    #[error("{0:?} does not refer to an entry in the frontier")]
    StaleHandle(FrontierHandle),
    #[error("key {new} is not smaller than the current key {current}")]
    KeyNotDecreased { current: Weight, new: Weight },
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    key: Weight,
    node: Node,
    slot: usize,
}

impl Entry {
    // Keys use the IEEE total order so NaN cannot break the heap, equal keys
    // fall back to the node index.
    fn precedes(&self, other: &Entry) -> bool {
        self.key
            .total_cmp(&other.key)
            .then_with(|| self.node.cmp(&other.node))
            == Ordering::Less
    }
}

const GONE: usize = usize::MAX;

/// Min-priority queue of nodes with decrease-key.
///
/// An indexed binary heap: `positions[slot]` is the heap index of the entry
/// created by the insert that returned handle `slot`, or `GONE` once it has
/// been extracted. Insert, decrease-key and extract-min are all O(log n).
/// Extraction order is deterministic: smallest key first, then smallest node.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: Vec<Entry>,
    positions: Vec<usize>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            heap: Vec::with_capacity(cap),
            positions: Vec::with_capacity(cap),
        }
    }

    pub fn insert(&mut self, node: Node, key: Weight) -> FrontierHandle {
        let slot = self.positions.len();
        let pos = self.heap.len();
        self.positions.push(pos);
        self.heap.push(Entry { key, node, slot });
        self.sift_up(pos);
        FrontierHandle(slot)
    }

    pub fn decrease_key(&mut self, handle: FrontierHandle, key: Weight) -> Result<(), FrontierError> {
        let pos = self.position_of(handle)?;
        let current = self.heap[pos].key;
        if key.total_cmp(&current) != Ordering::Less {
            return Err(FrontierError::KeyNotDecreased { current, new: key });
        }
        self.heap[pos].key = key;
        self.sift_up(pos);
        Ok(())
    }

    pub fn extract_min(&mut self) -> Result<(Node, Weight), FrontierError> {
        if self.heap.is_empty() {
            return Err(FrontierError::Empty);
        }
        let min = self.heap.swap_remove(0);
        self.positions[min.slot] = GONE;
        if !self.heap.is_empty() {
            self.positions[self.heap[0].slot] = 0;
            self.sift_down(0);
        }
        Ok((min.node, min.key))
    }

    pub fn peek_min(&self) -> Option<(Node, Weight)> {
        self.heap.first().map(|e| (e.node, e.key))
    }

    /// Current key of a live entry
    pub fn key(&self, handle: FrontierHandle) -> Option<Weight> {
        self.position_of(handle).ok().map(|pos| self.heap[pos].key)
    }

    pub fn contains(&self, handle: FrontierHandle) -> bool {
        self.position_of(handle).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Removes every entry. All handles handed out so far become stale.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.positions.clear();
    }

    fn position_of(&self, handle: FrontierHandle) -> Result<usize, FrontierError> {
        match self.positions.get(handle.0) {
            Some(&pos) if pos != GONE => Ok(pos),
            _ => Err(FrontierError::StaleHandle(handle)),
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a].slot] = a;
        self.positions[self.heap[b].slot] = b;
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.heap[pos].precedes(&self.heap[parent]) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.heap[left].precedes(&self.heap[smallest]) {
                smallest = left;
            }
            if right < len && self.heap[right].precedes(&self.heap[smallest]) {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{Frontier, FrontierError, Node, Weight};

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn drain(f: &mut Frontier) -> Vec<(Node, Weight)> {
        let mut out = Vec::new();
        while !f.is_empty() {
            out.push(f.extract_min().unwrap());
        }
        out
    }

    #[test]
    fn extracts_in_key_order() {
        let mut f = Frontier::new();
        f.insert(Node(0), 5.0);
        f.insert(Node(1), 1.0);
        f.insert(Node(2), 3.0);
        f.insert(Node(3), 0.5);
        assert_eq!(f.len(), 4);
        assert_eq!(f.peek_min(), Some((Node(3), 0.5)));

        let order: Vec<Node> = drain(&mut f).into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec![Node(3), Node(1), Node(2), Node(0)]);
    }

    #[test]
    fn equal_keys_break_ties_by_node() {
        let mut f = Frontier::new();
        for i in [4, 2, 9, 0, 7] {
            f.insert(Node(i), 1.0);
        }
        let order: Vec<Node> = drain(&mut f).into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec![Node(0), Node(2), Node(4), Node(7), Node(9)]);
    }

    #[test]
    fn decrease_key_reorders() {
        let mut f = Frontier::new();
        f.insert(Node(0), 1.0);
        f.insert(Node(1), 2.0);
        let h = f.insert(Node(2), 10.0);
        f.decrease_key(h, 0.25).unwrap();
        assert_eq!(f.key(h), Some(0.25));
        assert_eq!(f.extract_min().unwrap(), (Node(2), 0.25));
        assert!(!f.contains(h));
    }

    #[test]
    fn decrease_key_must_lower() {
        let mut f = Frontier::new();
        let h = f.insert(Node(0), 3.0);
        assert_eq!(
            f.decrease_key(h, 3.0),
            Err(FrontierError::KeyNotDecreased {
                current: 3.0,
                new: 3.0
            })
        );
        assert!(f.decrease_key(h, 4.0).is_err());
        assert_eq!(f.key(h), Some(3.0));
    }

    #[test]
    fn stale_handles() {
        let mut f = Frontier::new();
        let h = f.insert(Node(0), 3.0);
        f.extract_min().unwrap();
        assert_eq!(f.decrease_key(h, 1.0), Err(FrontierError::StaleHandle(h)));

        let h2 = f.insert(Node(1), 3.0);
        f.clear();
        assert!(f.is_empty());
        assert!(!f.contains(h2));
    }

    #[test]
    fn empty_extract() {
        let mut f = Frontier::new();
        assert_eq!(f.extract_min(), Err(FrontierError::Empty));
        assert_eq!(f.peek_min(), None);
    }

    #[test]
    fn nan_keys_sort_last() {
        let mut f = Frontier::new();
        f.insert(Node(0), Weight::NAN);
        f.insert(Node(1), Weight::INFINITY);
        f.insert(Node(2), 1.0);
        let order: Vec<Node> = drain(&mut f).into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec![Node(2), Node(1), Node(0)]);
    }

    #[test]
    fn random_operations_match_sorted_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut f = Frontier::with_capacity(64);
        let mut keys: Vec<Weight> = Vec::new();
        let mut handles = Vec::new();
        for i in 0..200 {
            let key = rng.random_range(0.0..100.0);
            handles.push(f.insert(Node(i), key));
            keys.push(key);
        }
        for _ in 0..300 {
            let i = rng.random_range(0..handles.len());
            let new = keys[i] - rng.random_range(0.1..10.0);
            f.decrease_key(handles[i], new).unwrap();
            keys[i] = new;
        }

        let mut expected: Vec<(Node, Weight)> =
            keys.iter().enumerate().map(|(i, &k)| (Node(i), k)).collect();
        expected.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        assert_eq!(drain(&mut f), expected);
    }
}
