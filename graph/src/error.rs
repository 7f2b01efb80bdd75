use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("rule '{name}' has an invalid command template: {source}")]
    InvalidRule {
        name: String,
        #[source]
        source: buildgraph_eval::ParseError,
    },

    #[error("output '{path}' already has a producing edge; each file may have at most one producer")]
    DuplicateProducer { path: String },

    #[error("'{path}' is needed to build a requested target but is missing and has no rule to produce it")]
    MissingSource { path: String },
}
