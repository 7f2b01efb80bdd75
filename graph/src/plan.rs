use std::collections::{HashMap, HashSet, VecDeque};

use crate::{error::GraphError, model::EdgeId, state::State};

/// The execution plan: the subset of the graph that must run to bring a requested set of
/// targets up to date, plus bookkeeping for which edges are ready to run right now.
///
/// An edge becomes "wanted" the first time it's reached while walking backward from a target
/// through dirty outputs. Each wanted edge is enqueued for execution exactly once, as soon as
/// all of its inputs' producing edges (if any) have finished — tracked here with a pending
/// input counter rather than a boolean "already enqueued" bit, since the counter also tells
/// us when an edge's dependencies are actually satisfied.
#[derive(Debug, Default)]
pub struct Plan {
    want: HashSet<EdgeId>,
    pending_inputs: HashMap<EdgeId, usize>,
    ready: VecDeque<EdgeId>,
}

impl Plan {
    pub fn new() -> Self {
        Default::default()
    }

    /// Walks backward from `target` over dirty outputs, adding every edge that must run to the
    /// plan. Targets that are already clean, or that are source files present on disk, require
    /// no work. A source file that's dirty-reachable but doesn't exist and has no producing
    /// edge is a hard error: there is no way to satisfy the request.
    pub fn add_target(&mut self, state: &State, target: crate::model::NodeId) -> Result<(), GraphError> {
        let node = state.node(target);

        if node.is_source() {
            if state.is_missing(target) {
                return Err(GraphError::MissingSource {
                    path: state.path_string(target),
                });
            }
            return Ok(());
        }

        if !node.dirty {
            return Ok(());
        }

        let edge_id = node.in_edge.expect("non-source node always has a producing edge");
        if self.want.contains(&edge_id) {
            return Ok(());
        }
        self.want.insert(edge_id);

        let edge = state.edge(edge_id);
        let inputs = edge.inputs.clone();
        let mut pending = 0usize;
        for &input in &inputs {
            self.add_target(state, input)?;
            if state.node(input).in_edge.is_some() && self.want.contains(&state.node(input).in_edge.unwrap()) {
                pending += 1;
            }
        }

        self.pending_inputs.insert(edge_id, pending);
        if pending == 0 {
            self.ready.push_back(edge_id);
        }

        Ok(())
    }

    /// Returns true once every wanted edge has finished.
    pub fn is_want_empty(&self) -> bool {
        self.want.is_empty()
    }

    /// The number of wanted edges that have not yet finished.
    pub fn want_len(&self) -> usize {
        self.want.len()
    }

    /// Pops the next edge ready to run, if any. Returns `None` when nothing is currently
    /// runnable, which (while `!is_want_empty()`) means something else must finish first.
    pub fn find_work(&mut self) -> Option<EdgeId> {
        self.ready.pop_front()
    }

    /// Records that `edge` has finished running. Every output node it feeds forward into
    /// becomes a candidate for readiness: for each wanted edge depending on one of this edge's
    /// outputs, decrement its pending-input count, and enqueue it once the count hits zero.
    pub fn edge_finished(&mut self, state: &State, edge_id: EdgeId) {
        self.want.remove(&edge_id);
        self.pending_inputs.remove(&edge_id);

        let edge = state.edge(edge_id);
        for &output in &edge.outputs {
            for &downstream in &state.node(output).out_edges {
                if let Some(count) = self.pending_inputs.get_mut(&downstream) {
                    *count -= 1;
                    if *count == 0 {
                        self.ready.push_back(downstream);
                    }
                }
            }
        }
    }
}
