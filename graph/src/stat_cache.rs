use std::collections::HashSet;

use buildgraph_paths::PathCache;

use crate::{
    disk_interface::DiskInterface,
    model::{EdgeId, FileStat, Node, NodeId},
};

/// Owner of all `FileStat`s by path, and (transitively, since a `FileStat` owns its `Node`)
/// of all `Node`s. `PathRef`s handed out by the inner `PathCache` double as `FileStat`
/// indices: both grow in lockstep, one new `FileStat` per newly-interned path.
#[derive(Debug, Default)]
pub struct StatCache {
    paths: PathCache,
    filestats: Vec<FileStat>,
    nodes: Vec<Node>,
}

impl StatCache {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the unique `FileStat`'s path ref for `path`, creating it on first request.
    pub fn get_file<P: Into<Vec<u8>>>(&mut self, path: P) -> usize {
        let path_ref = self.paths.insert_and_get(path);
        if path_ref >= self.filestats.len() {
            debug_assert_eq!(path_ref, self.filestats.len());
            self.filestats.push(FileStat::new(path_ref));
        }
        path_ref
    }

    /// Returns the unique `Node` over `path`, creating it (and the underlying `FileStat`, if
    /// needed) on first request.
    pub fn get_node<P: Into<Vec<u8>>>(&mut self, path: P) -> NodeId {
        let path_ref = self.get_file(path);
        if let Some(node_id) = self.filestats[path_ref].node {
            return node_id;
        }
        let node_id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(path_ref));
        self.filestats[path_ref].node = Some(node_id);
        node_id
    }

    pub fn filestat(&self, path_ref: usize) -> &FileStat {
        &self.filestats[path_ref]
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn path_bytes(&self, id: NodeId) -> &[u8] {
        self.paths.get(self.nodes[id.0].file)
    }

    pub fn path_string(&self, id: NodeId) -> String {
        String::from_utf8_lossy(self.path_bytes(id)).into_owned()
    }

    pub fn mtime(&self, id: NodeId) -> crate::model::Mtime {
        self.filestats[self.nodes[id.0].file].mtime
    }

    pub fn exists(&self, id: NodeId) -> bool {
        self.filestats[self.nodes[id.0].file].exists()
    }

    /// Re-stats every known path, directly dirtying nodes whose files have vanished (but
    /// never a source node — see the design notes on missing-source handling), and returns
    /// the set of leaf edges (edges with at least one source input) whose dirtiness must now
    /// be recomputed from the fresh mtimes.
    pub fn stat_all<D: DiskInterface>(&mut self, disk: &D) -> Vec<EdgeId> {
        let mut leaf_edges = HashSet::new();

        for path_ref in 0..self.filestats.len() {
            let path = self.paths.get(path_ref).to_vec();
            let mtime = match disk.modified(&path) {
                Ok(mtime) => mtime,
                Err(e) => {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        eprintln!(
                            "stat({}): {}",
                            String::from_utf8_lossy(&path),
                            e
                        );
                    }
                    crate::model::ABSENT
                }
            };
            self.filestats[path_ref].mtime = mtime;

            let node_id = match self.filestats[path_ref].node {
                Some(id) => id,
                None => continue,
            };
            let node = &mut self.nodes[node_id.0];
            // A missing real output is unconditionally dirty. A missing source is left
            // clean here; Plan::add_target reports it as a build error instead.
            if mtime == crate::model::ABSENT && node.in_edge.is_some() {
                node.dirty = true;
            }
            if node.in_edge.is_none() {
                for edge_id in &node.out_edges {
                    leaf_edges.insert(*edge_id);
                }
            }
        }

        leaf_edges.into_iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct FixedDisk(std::collections::HashMap<Vec<u8>, crate::model::Mtime>);

    impl DiskInterface for FixedDisk {
        fn modified(&self, path: &[u8]) -> std::io::Result<crate::model::Mtime> {
            self.0
                .get(path)
                .copied()
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "mock"))
        }
    }

    #[test]
    fn get_node_is_stable_and_unique() {
        let mut cache = StatCache::new();
        let a = cache.get_node("a.c");
        let b = cache.get_node("a.c");
        assert_eq!(a, b);
        assert_eq!(cache.path_bytes(a), b"a.c");
    }

    #[test]
    fn get_file_and_get_node_share_the_underlying_filestat() {
        let mut cache = StatCache::new();
        let path_ref = cache.get_file("a.c");
        let node = cache.get_node("a.c");
        assert_eq!(cache.node(node).file, path_ref);
    }

    #[test]
    fn missing_file_with_no_node_is_skipped_without_panic() {
        let mut cache = StatCache::new();
        cache.get_file("untracked.txt"); // FileStat but never promoted to a Node
        let disk = FixedDisk(Default::default());
        let leaves = cache.stat_all(&disk);
        assert!(leaves.is_empty());
    }

    #[test]
    fn missing_output_node_is_dirtied_directly() {
        let mut cache = StatCache::new();
        let out = cache.get_node("a.o");
        cache.node_mut(out).in_edge = Some(EdgeId(0));
        let disk = FixedDisk(Default::default());
        cache.stat_all(&disk);
        assert!(cache.node(out).dirty);
    }

    #[test]
    fn missing_source_node_is_not_dirtied() {
        let mut cache = StatCache::new();
        let src = cache.get_node("a.c");
        let disk = FixedDisk(Default::default());
        cache.stat_all(&disk);
        assert!(!cache.node(src).dirty);
        assert!(!cache.exists(src));
    }

    #[test]
    fn source_node_feeding_an_edge_is_collected_as_a_leaf() {
        let mut cache = StatCache::new();
        let src = cache.get_node("a.c");
        cache.node_mut(src).out_edges.push(EdgeId(7));
        let mut disk_map = std::collections::HashMap::new();
        disk_map.insert(b"a.c".to_vec(), 100);
        let disk = FixedDisk(disk_map);
        let leaves = cache.stat_all(&disk);
        assert_eq!(leaves, vec![EdgeId(7)]);
    }
}
