use std::collections::HashMap;

use buildgraph_eval::{Env, EvalString};

use crate::{
    disk_interface::DiskInterface,
    error::GraphError,
    model::{Edge, EdgeId, InOut, Node, NodeId, Rule, RuleId},
    stat_cache::StatCache,
};

/// Resolves the variables an [`Edge`]'s command can reference: `@in`, `$out`, and whatever
/// global bindings were registered with [`State::add_binding`]. `@out`/`$in` are deliberately
/// not supported; only the canonical `@in`/`$out` pair is (see the grammar in the eval crate).
struct EdgeEnv<'a> {
    state: &'a State,
    edge: &'a Edge,
}

impl<'a> Env for EdgeEnv<'a> {
    fn lookup(&self, var: &str) -> String {
        match var {
            "@in" => self
                .edge
                .inputs
                .iter()
                .map(|&id| self.state.path_string(id))
                .collect::<Vec<_>>()
                .join(" "),
            "$out" => self
                .edge
                .outputs
                .first()
                .map(|&id| self.state.path_string(id))
                .unwrap_or_default(),
            other if other.starts_with('$') => {
                let name = &other[1..];
                self.state
                    .bindings
                    .get(name)
                    .cloned()
                    .unwrap_or_default()
            }
            _ => String::new(),
        }
    }
}

/// Owner of the whole build graph: every known file, node, edge and rule, plus the global
/// variable bindings referenced by command templates. This is the single source of truth that
/// [`crate::Plan`] reads from and [`DiskInterface`]-driven reloads mutate.
#[derive(Debug, Default)]
pub struct State {
    stat_cache: StatCache,
    rules: Vec<Rule>,
    edges: Vec<Edge>,
    bindings: HashMap<String, String>,
}

impl State {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_binding<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.bindings.insert(key.into(), value.into());
    }

    /// Registers a new rule named `name` with command template `command`, which must parse as
    /// a valid [`EvalString`].
    pub fn add_rule<N: Into<String>>(&mut self, name: N, command: &str) -> Result<RuleId, GraphError> {
        let name = name.into();
        let mut template = EvalString::new();
        template.parse(command).map_err(|source| GraphError::InvalidRule {
            name: name.clone(),
            source,
        })?;
        let id = RuleId(self.rules.len());
        self.rules.push(Rule {
            name,
            command: template,
        });
        Ok(id)
    }

    /// Creates a new edge running `rule`, with no inputs or outputs yet; use
    /// [`State::add_in_out`] to attach them.
    pub fn add_edge(&mut self, rule: RuleId) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge::new(rule));
        id
    }

    /// Attaches `path` to `edge` as an input or output. Registering an edge as the producer of
    /// an output that already has one is an error: each file may have at most one producer.
    pub fn add_in_out<P: Into<Vec<u8>>>(
        &mut self,
        edge_id: EdgeId,
        dir: InOut,
        path: P,
    ) -> Result<NodeId, GraphError> {
        let node_id = self.stat_cache.get_node(path);
        match dir {
            InOut::In => {
                self.edges[edge_id.0].inputs.push(node_id);
                self.stat_cache.node_mut(node_id).out_edges.push(edge_id);
            }
            InOut::Out => {
                if let Some(existing) = self.stat_cache.node(node_id).in_edge {
                    if existing != edge_id {
                        return Err(GraphError::DuplicateProducer {
                            path: self.stat_cache.path_string(node_id),
                        });
                    }
                }
                self.edges[edge_id.0].outputs.push(node_id);
                self.stat_cache.node_mut(node_id).in_edge = Some(edge_id);
            }
        }
        Ok(node_id)
    }

    pub fn get_node<P: Into<Vec<u8>>>(&mut self, path: P) -> NodeId {
        self.stat_cache.get_node(path)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.stat_cache.node(id)
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.0]
    }

    /// Every node that is an edge's output but is not itself consumed as any other edge's
    /// input: the targets a build with no explicit target list would build, mirroring how the
    /// original tool falls back to "build everything reachable from nowhere downstream".
    pub fn default_targets(&self) -> Vec<NodeId> {
        self.stat_cache
            .node_ids()
            .filter(|&id| {
                let node = self.stat_cache.node(id);
                node.in_edge.is_some() && node.out_edges.is_empty()
            })
            .collect()
    }

    pub fn path_string(&self, id: NodeId) -> String {
        self.stat_cache.path_string(id)
    }

    pub fn is_missing(&self, id: NodeId) -> bool {
        self.node(id).is_source() && !self.stat_cache.exists(id)
    }

    /// Expands `edge`'s rule's command template against this edge's inputs, outputs and the
    /// global bindings.
    pub fn evaluate_command(&self, edge_id: EdgeId) -> String {
        let edge = &self.edges[edge_id.0];
        let rule = &self.rules[edge.rule.0];
        let env = EdgeEnv { state: self, edge };
        rule.command.evaluate(&env)
    }

    /// Re-stats the filesystem and recomputes dirtiness from the ground up: every leaf edge
    /// (an edge with at least one source input) has its dirtiness recomputed, and dirtiness
    /// propagates upward from there through [`State::mark_edge_dirty`].
    pub fn reload<D: DiskInterface>(&mut self, disk: &D) {
        let leaf_edges = self.stat_cache.stat_all(disk);
        for edge_id in leaf_edges {
            self.recompute_edge_dirty(edge_id);
        }
    }

    /// Marks `node` dirty if it is not already, then propagates dirtiness to the edge it feeds
    /// (if any) and transitively to everything downstream.
    pub fn mark_node_dirty(&mut self, node_id: NodeId) {
        if self.stat_cache.node(node_id).dirty {
            return;
        }
        self.stat_cache.node_mut(node_id).dirty = true;
        let out_edges = self.stat_cache.node(node_id).out_edges.clone();
        for edge_id in out_edges {
            self.mark_edge_dirty(edge_id);
        }
    }

    /// Marks every output of `edge` dirty, which in turn propagates further downstream. An
    /// edge itself carries no dirty bit; only nodes do (see the invariants this crate upholds).
    pub fn mark_edge_dirty(&mut self, edge_id: EdgeId) {
        crate::explain!(edge_id, "rebuilding: an input is dirty");
        let outputs = self.edges[edge_id.0].outputs.clone();
        for output in outputs {
            self.mark_node_dirty(output);
        }
    }

    /// Clears `node`'s dirty bit. Called once per output after its producing edge's command has
    /// run to completion; never propagates, since downstream dirtiness was only ever a function
    /// of this node's *own* mtime relative to its consumers, which an external caller is
    /// responsible for re-stating via [`State::reload`] before relying on it again.
    pub fn clear_dirty(&mut self, node_id: NodeId) {
        self.stat_cache.node_mut(node_id).dirty = false;
    }

    /// Recomputes whether `edge` is dirty purely from its own inputs' current dirty bits and
    /// mtimes, without assuming any node is already marked: an input is considered "newer"
    /// than `edge`'s outputs if any output is missing, or if the input is dirty, or if the
    /// input's mtime is strictly newer than the oldest output's mtime.
    fn recompute_edge_dirty(&mut self, edge_id: EdgeId) {
        let edge = &self.edges[edge_id.0];
        let outputs = edge.outputs.clone();
        let inputs = edge.inputs.clone();

        let any_output_missing = outputs
            .iter()
            .any(|&id| !self.stat_cache.node(id).dirty && !self.stat_cache.exists(id));
        let oldest_output_mtime = outputs
            .iter()
            .map(|&id| self.stat_cache.mtime(id))
            .min()
            .unwrap_or(crate::model::ABSENT);

        if any_output_missing {
            crate::explain!(
                edge_id,
                "output {} doesn't exist",
                outputs
                    .first()
                    .map(|&id| self.path_string(id))
                    .unwrap_or_default()
            );
        }
        let newer_input = inputs.iter().find(|&&id| {
            self.stat_cache.node(id).dirty || self.stat_cache.mtime(id) > oldest_output_mtime
        });
        if let Some(&id) = newer_input {
            crate::explain!(
                edge_id,
                "{} is dirty or newer than the output it feeds",
                self.path_string(id)
            );
        }

        if any_output_missing || newer_input.is_some() {
            for &output in &outputs {
                self.mark_node_dirty(output);
            }
        }
    }
}
