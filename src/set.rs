use crate::Node;
// TODO: Bitset
#[derive(Debug, Default, Clone)]
pub struct NodeSet {
    v: Vec<bool>,
    len: usize,
}

impl NodeSet {
    pub fn new() -> Self {
        Self {
            v: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            v: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Returns true if `n` was not already in the set
    pub fn add(&mut self, n: Node) -> bool {
        let i = n.0;
        if i >= self.v.len() {
            self.v.resize(i + 1, false);
        }
        let new = !self.v[i];
        self.v[i] = true;
        if new {
            self.len += 1;
        }
        new
    }

    pub fn has(&self, n: Node) -> bool {
        let i = n.0;
        if i >= self.v.len() {
            false
        } else {
            self.v[i]
        }
    }

    pub fn remove(&mut self, n: Node) -> bool {
        let i = n.0;
        if i >= self.v.len() {
            false
        } else {
            let r = self.v[i];
            self.v[i] = false;
            if r {
                self.len -= 1;
            }
            r
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Node> + '_ {
        self.v
            .iter()
            .enumerate()
            .filter(|(_, &b)| b)
            .map(|(i, _)| Node(i))
    }
}
