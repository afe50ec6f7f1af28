use crate::Node;

/// Dense map keyed by node index. Lookups are a bounds check and an index.
#[derive(Debug, Clone)]
pub struct NodeMap<T> {
    v: Vec<Option<T>>,
}

impl<T> Default for NodeMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Index<Node> for NodeMap<T> {
    type Output = T;
    fn index(&self, n: Node) -> &T {
        if let Some(t) = self.get(&n) {
            t
        } else {
            panic!("Node not in map: {:?}", n);
        }
    }
}

impl<T> std::ops::Index<&Node> for NodeMap<T> {
    type Output = T;
    fn index(&self, n: &Node) -> &T {
        &self[*n]
    }
}

impl<T> std::ops::IndexMut<Node> for NodeMap<T> {
    fn index_mut(&mut self, n: Node) -> &mut T {
        if let Some(t) = self.get_mut(&n) {
            t
        } else {
            panic!("Node not in map: {:?}", n);
        }
    }
}

impl<T> NodeMap<T> {
    pub fn new() -> Self {
        Self { v: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            v: Vec::with_capacity(cap),
        }
    }

    pub fn insert(&mut self, n: Node, t: T) -> Option<T> {
        let i = n.0;
        if i >= self.v.len() {
            self.v.resize_with(i + 1, || None);
        }
        self.v[i].replace(t)
    }

    pub fn has(&self, n: &Node) -> bool {
        matches!(self.v.get(n.0), Some(Some(_)))
    }

    pub fn get(&self, n: &Node) -> Option<&T> {
        self.v.get(n.0)?.as_ref()
    }

    pub fn get_mut(&mut self, n: &Node) -> Option<&mut T> {
        self.v.get_mut(n.0)?.as_mut()
    }

    pub fn get_or_insert_with(&mut self, n: Node, f: impl FnOnce() -> T) -> &mut T {
        let i = n.0;
        if i >= self.v.len() {
            self.v.resize_with(i + 1, || None);
        }
        self.v[i].get_or_insert_with(f)
    }

    pub fn remove(&mut self, n: &Node) -> Option<T> {
        self.v.get_mut(n.0)?.take()
    }

    /// Drops every entry but keeps the allocation
    pub fn clear(&mut self) {
        self.v.clear();
    }

    /// Number of occupied entries
    pub fn len(&self) -> usize {
        self.v.iter().filter(|x| x.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.v.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Node, &T)> {
        self.v
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|t| (Node(i), t)))
    }
}

#[cfg(test)]
mod test {
    use crate::{Node, NodeMap};

    #[test]
    fn empty() {
        let map: NodeMap<u32> = NodeMap::with_capacity(16);
        for n in (0..10).map(Node) {
            assert!(!map.has(&n));
            assert!(map.get(&n).is_none());
        }
        assert!(map.is_empty());
    }

    #[test]
    fn insert_sparse() {
        let mut map = NodeMap::new();
        assert_eq!(map.insert(Node(7), "seven"), None);
        assert_eq!(map.insert(Node(2), "two"), None);
        assert_eq!(map.insert(Node(7), "SEVEN"), Some("seven"));
        assert_eq!(map[Node(7)], "SEVEN");
        assert_eq!(map[&Node(2)], "two");
        assert!(!map.has(&Node(3)));
        assert_eq!(map.len(), 2);

        let entries: Vec<(Node, &&str)> = map.iter().collect();
        assert_eq!(entries, vec![(Node(2), &"two"), (Node(7), &"SEVEN")]);
    }

    #[test]
    fn get_or_insert_and_modify() {
        let mut map: NodeMap<f64> = NodeMap::new();
        *map.get_or_insert_with(Node(4), || 1.0) += 2.0;
        *map.get_or_insert_with(Node(4), || 100.0) += 2.0;
        assert_eq!(map[Node(4)], 5.0);
        map[Node(4)] = 0.5;
        assert_eq!(map.get(&Node(4)), Some(&0.5));
    }

    #[test]
    fn remove_and_clear() {
        let mut map = NodeMap::new();
        map.insert(Node(0), 1);
        map.insert(Node(5), 2);
        assert_eq!(map.remove(&Node(0)), Some(1));
        assert_eq!(map.remove(&Node(0)), None);
        assert_eq!(map.remove(&Node(99)), None);
        map.clear();
        assert!(!map.has(&Node(5)));
        assert!(map.is_empty());
    }

    #[test]
    #[should_panic(expected = "Node not in map")]
    fn index_missing_panics() {
        let map: NodeMap<u8> = NodeMap::new();
        let _ = map[Node(1)];
    }
}
