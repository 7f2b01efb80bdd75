use std::process::{Command, Output};

/// The execution capability a `Builder` delegates a single edge's command to. Kept minimal and
/// synchronous (no async/thread-pool machinery, see the crate's design notes on why): one
/// command runs, to completion, and its captured output comes back whole.
pub trait Shell {
    fn run_command(&self, command: &str) -> std::io::Result<Output>;
}

/// Runs commands through the host shell, the same way the teacher's `CommandTask` does, minus
/// the `tokio::process` async wrapper this design has no use for.
pub struct SystemShell;

impl Shell for SystemShell {
    fn run_command(&self, command: &str) -> std::io::Result<Output> {
        Command::new("/bin/sh").arg("-c").arg(command).output()
    }
}
