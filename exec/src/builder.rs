use buildgraph_graph::{explain, Plan, State};

use crate::{error::BuildError, printer::Printer, shell::Shell};

/// Drains a [`Plan`] to completion against a [`State`], running each ready edge's command
/// through a [`Shell`] and feeding the result back to the plan: success clears the edge's
/// outputs' dirty bits and unblocks whatever was waiting on them, failure aborts the whole
/// build immediately (there is no partial-progress recovery or retry).
#[derive(Default)]
pub struct Builder {
    printer: Printer,
}

impl Builder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Runs `plan` to completion. On success every formerly-wanted node is clean and
    /// `plan.is_want_empty()` holds. A plan with nothing wanted at all is not an error: it is
    /// reported as success with an informational message, the way the teacher's `ninja` prints
    /// "no work to do" rather than treating an already-up-to-date build as a failure.
    pub fn build(
        &mut self,
        shell: &dyn Shell,
        state: &mut State,
        plan: &mut Plan,
    ) -> Result<(), BuildError> {
        if plan.is_want_empty() {
            println!("buildgraph: no work to do.");
            return Ok(());
        }

        while !plan.is_want_empty() {
            let edge_id = plan.find_work().ok_or(BuildError::Stalled {
                remaining: plan.want_len(),
            })?;

            if explain::is_explaining() {
                explain::print_explanations(edge_id);
            }

            let command = state.evaluate_command(edge_id);
            self.printer.started(&command);

            let output = shell.run_command(&command).map_err(|source| BuildError::SpawnFailed {
                command: command.clone(),
                source,
            })?;

            let combined_output = [output.stdout.as_slice(), output.stderr.as_slice()].concat();
            self.printer.finished(&command, &combined_output, output.status.success());

            if !output.status.success() {
                return Err(BuildError::CommandFailed {
                    command,
                    status: output.status,
                });
            }

            let outputs = state.edge(edge_id).outputs.clone();
            for node in outputs {
                state.clear_dirty(node);
            }
            plan.edge_finished(state, edge_id);
        }

        Ok(())
    }
}
