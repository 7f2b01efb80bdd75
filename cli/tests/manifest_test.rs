use buildgraph_cli::manifest;
use buildgraph_graph::State;

#[test]
fn unknown_directive_message() {
    let mut state = State::new();
    let err = manifest::load("subninja other.manifest\n", &mut state).unwrap_err();
    assert_eq!(err.to_string(), "line 1: unknown directive 'subninja'");
}

#[test]
fn unknown_rule_message() {
    let mut state = State::new();
    let err = manifest::load("edge missing in a.c out a.o\n", &mut state).unwrap_err();
    assert_eq!(err.to_string(), "line 1: edge references undefined rule 'missing'");
}

#[test]
fn malformed_command_message() {
    let mut state = State::new();
    let err = manifest::load("rule cc gcc $\n", &mut state).unwrap_err();
    assert_eq!(
        err.to_string(),
        "line 1: rule 'cc' has an invalid command template: '$' at offset 4 is not followed by a variable name"
    );
}

#[test]
fn a_small_two_rule_manifest_loads_and_builds_a_usable_plan() {
    use buildgraph_graph::{DiskInterface, Mtime, Plan};

    let mut state = State::new();
    manifest::load(
        "bind cflags -Wall\n\
         rule cc gcc $cflags -c @in -o $out\n\
         rule link gcc @in -o $out\n\
         edge cc in main.c out main.o\n\
         edge link in main.o out main\n",
        &mut state,
    )
    .unwrap();

    struct AllStale;
    impl DiskInterface for AllStale {
        fn modified(&self, path: &[u8]) -> std::io::Result<Mtime> {
            Ok(if path == b"main.c" { 2 } else { 1 })
        }
    }
    state.reload(&AllStale);

    let mut plan = Plan::new();
    for target in state.default_targets() {
        plan.add_target(&state, target).unwrap();
    }
    assert!(!plan.is_want_empty());

    let compile = plan.find_work().expect("compile is immediately ready");
    assert_eq!(state.evaluate_command(compile), "gcc -Wall -c main.c -o main.o");
    plan.edge_finished(&state, compile);

    let link = plan.find_work().expect("link ready once compile finishes");
    assert_eq!(state.evaluate_command(link), "gcc main.o -o main");
    plan.edge_finished(&state, link);

    assert!(plan.is_want_empty());
}
