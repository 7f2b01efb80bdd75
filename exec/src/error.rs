use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Graph(#[from] buildgraph_graph::GraphError),

    #[error("failed to spawn command: {command}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command failed ({status}): {command}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
    },

    #[error("build stalled with {remaining} edge(s) still wanted but none runnable")]
    Stalled { remaining: usize },
}
