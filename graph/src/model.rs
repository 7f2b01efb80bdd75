use buildgraph_eval::EvalString;
use buildgraph_paths::PathRef;

/// A stable handle to a [`crate::Node`] living in a [`crate::StatCache`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// A stable handle to an [`crate::Edge`] living in a [`crate::State`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

/// A stable handle to a [`crate::Rule`] living in a [`crate::State`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub(crate) usize);

/// 0 means "unknown or absent". Real values come from [`crate::DiskInterface::modified`].
pub type Mtime = u64;

pub const ABSENT: Mtime = 0;

/// The cached filesystem observation for a single path. At most one `FileStat` exists per
/// path within a `StatCache` (the cache's `PathCache` guarantees that by construction).
#[derive(Debug, Clone)]
pub struct FileStat {
    pub path: PathRef,
    pub mtime: Mtime,
    pub node: Option<NodeId>,
}

impl FileStat {
    pub(crate) fn new(path: PathRef) -> Self {
        FileStat {
            path,
            mtime: ABSENT,
            node: None,
        }
    }

    pub fn exists(&self) -> bool {
        self.mtime != ABSENT
    }
}

/// A graph vertex wrapping exactly one `FileStat`.
#[derive(Debug, Clone)]
pub struct Node {
    pub file: PathRef,
    pub dirty: bool,
    pub in_edge: Option<EdgeId>,
    pub out_edges: Vec<EdgeId>,
}

impl Node {
    pub(crate) fn new(file: PathRef) -> Self {
        Node {
            file,
            dirty: false,
            in_edge: None,
            out_edges: Vec::new(),
        }
    }

    /// A source node is one with no producing edge: an input leaf of the DAG.
    pub fn is_source(&self) -> bool {
        self.in_edge.is_none()
    }
}

/// A named, reusable command template.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub command: EvalString,
}

/// A build step: input nodes, output nodes, and the rule to run. Order is significant for
/// both: the first output is `$out`, input order is preserved for `@in`.
#[derive(Debug, Clone)]
pub struct Edge {
    pub rule: RuleId,
    pub inputs: Vec<NodeId>,
    pub outputs: Vec<NodeId>,
}

impl Edge {
    pub(crate) fn new(rule: RuleId) -> Self {
        Edge {
            rule,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InOut {
    In,
    Out,
}
