use std::collections::{hash_map::Entry, HashMap};

pub type PathRef = usize;

// Paths are treated as opaque byte identifiers: equality is byte-exact and no
// canonicalization is ever performed here. Canonicalizing (or not) is a policy decision for
// whoever populates the graph, not for the interner.
#[derive(Debug)]
struct PathNode {
    path: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct PathCache {
    nodes: Vec<PathNode>,
    map: HashMap<Vec<u8>, PathRef>,
}

pub enum InsertResult {
    AlreadyExists(PathRef),
    Inserted(PathRef),
}

impl PathCache {
    pub fn new() -> PathCache {
        PathCache {
            nodes: vec![],
            map: HashMap::new(),
        }
    }

    /// Interns `path`, returning whether this is the first time it has been seen.
    /// The same bytes always map to the same `PathRef`.
    pub fn insert<P: Into<Vec<u8>>>(&mut self, path: P) -> InsertResult {
        let p = path.into();
        match self.map.entry(p) {
            Entry::Occupied(e) => InsertResult::AlreadyExists(*e.get()),
            Entry::Vacant(e) => {
                let clone = e.key().clone();
                self.nodes.push(PathNode { path: clone });
                let idx = self.nodes.len() - 1;
                e.insert(idx);
                InsertResult::Inserted(idx)
            }
        }
    }

    pub fn insert_and_get<P: Into<Vec<u8>>>(&mut self, path: P) -> PathRef {
        match self.insert(path) {
            InsertResult::AlreadyExists(r) => r,
            InsertResult::Inserted(r) => r,
        }
    }

    pub fn get(&self, rf: PathRef) -> &[u8] {
        &self.nodes[rf].path
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
