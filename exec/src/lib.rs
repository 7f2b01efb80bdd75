//! Glues a [`buildgraph_graph::Plan`] to an external command shell: the [`Shell`] capability,
//! the synchronous single-threaded [`Builder`] loop, the [`error::BuildError`] it can fail
//! with, and a terminal status [`printer::Printer`].

mod builder;
mod error;
mod printer;
mod shell;

pub use builder::Builder;
pub use error::BuildError;
pub use shell::{Shell, SystemShell};
