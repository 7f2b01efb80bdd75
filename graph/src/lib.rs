//! The in-memory build graph: interned files, nodes, edges and rules, dirty-state
//! propagation, and the execution plan that turns "these targets are stale" into "run these
//! edges in this order".

pub mod disk_interface;
pub mod dynout;
pub mod error;
pub mod explain;
mod model;
mod plan;
mod stat_cache;
mod state;

pub use disk_interface::{DiskInterface, SystemDiskInterface};
pub use error::GraphError;
pub use model::{Edge, EdgeId, FileStat, InOut, Mtime, Node, NodeId, Rule, RuleId, ABSENT};
pub use plan::Plan;
pub use state::State;

#[cfg(test)]
mod integration_test {
    use super::*;
    use std::collections::HashMap;

    struct FixedDisk(HashMap<Vec<u8>, Mtime>);

    impl DiskInterface for FixedDisk {
        fn modified(&self, path: &[u8]) -> std::io::Result<Mtime> {
            self.0
                .get(path)
                .copied()
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "mock"))
        }
    }

    fn disk(entries: &[(&str, u64)]) -> FixedDisk {
        let mut map = HashMap::new();
        for (path, mtime) in entries {
            map.insert(path.as_bytes().to_vec(), *mtime);
        }
        FixedDisk(map)
    }

    /// Wires State, reload and Plan together over a small two-rule project, matching the
    /// workflow a CLI driver would follow end to end.
    #[test]
    fn full_round_trip_from_state_to_a_ready_plan() {
        let mut state = State::new();
        state.add_binding("cflags", "-Wall");
        let cc = state.add_rule("cc", "gcc $cflags -c @in -o $out").unwrap();
        let link = state.add_rule("link", "gcc @in -o $out").unwrap();

        let compile = state.add_edge(cc);
        state.add_in_out(compile, InOut::In, "main.c").unwrap();
        let obj = state.add_in_out(compile, InOut::Out, "main.o").unwrap();

        let link_edge = state.add_edge(link);
        state.add_in_out(link_edge, InOut::In, "main.o").unwrap();
        let exe = state.add_in_out(link_edge, InOut::Out, "main").unwrap();

        state.reload(&disk(&[("main.c", 10), ("main.o", 5), ("main", 1)]));

        let mut plan = Plan::new();
        plan.add_target(&state, exe).unwrap();
        assert!(!plan.is_want_empty());

        let first = plan.find_work().expect("compile edge is immediately ready");
        assert_eq!(first, compile);
        assert_eq!(
            state.evaluate_command(first),
            "gcc -Wall -c main.c -o main.o"
        );
        plan.edge_finished(&state, first);

        let second = plan.find_work().expect("link edge ready once compile finishes");
        assert_eq!(second, link_edge);
        assert_eq!(state.evaluate_command(second), "gcc main.o -o main");
        plan.edge_finished(&state, second);

        assert!(plan.is_want_empty());
        let _ = obj;
    }
}
