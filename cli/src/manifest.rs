//! A deliberately small line-oriented text format that drives [`State`]'s `add_*` primitives
//! directly, so the binary has something to load. This is not ninja's grammar — no lexer,
//! no indentation-based scoping, no `include`/`subninja` — just enough syntax to describe
//! bindings, rules and edges for the incremental engine underneath to operate on.
//!
//! Grammar, one directive per line (blank lines and lines starting with `#` are ignored):
//!
//! ```text
//! bind NAME VALUE...
//! rule NAME COMMAND...
//! edge RULE in PATH... out PATH...
//! ```
//!
//! `COMMAND` runs to the end of the line and may itself contain `@in`/`$out`/`$NAME`
//! references, evaluated later by `State::evaluate_command`.

use std::collections::HashMap;

use buildgraph_graph::{GraphError, InOut, State};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("line {line}: unknown directive '{directive}'")]
    UnknownDirective { line: usize, directive: String },

    #[error("line {line}: '{directive}' needs at least {needed} word(s)")]
    TooFewWords {
        line: usize,
        directive: String,
        needed: usize,
    },

    #[error("line {line}: edge references undefined rule '{rule}'")]
    UnknownRule { line: usize, rule: String },

    #[error("line {line}: edge's 'in'/'out' markers are malformed")]
    MalformedEdge { line: usize },

    #[error("line {line}: {source}")]
    Graph {
        line: usize,
        #[source]
        source: GraphError,
    },
}

/// Parses `text` and applies every directive to `state` in order. Rule names are resolved to
/// the `RuleId`s `State::add_rule` handed back as each `rule` line is processed.
pub fn load(text: &str, state: &mut State) -> Result<(), ManifestError> {
    let mut rules = HashMap::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut words = trimmed.split_whitespace();
        let directive = words.next().expect("non-empty line has a first word");

        match directive {
            "bind" => {
                let key = words.next().ok_or_else(|| ManifestError::TooFewWords {
                    line,
                    directive: directive.to_owned(),
                    needed: 2,
                })?;
                let value = words.collect::<Vec<_>>().join(" ");
                state.add_binding(key, value);
            }
            "rule" => {
                let name = words.next().ok_or_else(|| ManifestError::TooFewWords {
                    line,
                    directive: directive.to_owned(),
                    needed: 2,
                })?;
                let command = words.collect::<Vec<_>>().join(" ");
                let rule_id = state
                    .add_rule(name, &command)
                    .map_err(|source| ManifestError::Graph { line, source })?;
                rules.insert(name.to_owned(), rule_id);
            }
            "edge" => {
                let rule_name = words.next().ok_or_else(|| ManifestError::TooFewWords {
                    line,
                    directive: directive.to_owned(),
                    needed: 2,
                })?;
                let rule_id = *rules
                    .get(rule_name)
                    .ok_or_else(|| ManifestError::UnknownRule {
                        line,
                        rule: rule_name.to_owned(),
                    })?;

                let rest: Vec<&str> = words.collect();
                let in_pos = rest.iter().position(|&w| w == "in");
                let out_pos = rest.iter().position(|&w| w == "out");
                let (in_pos, out_pos) = match (in_pos, out_pos) {
                    (Some(i), Some(o)) if i < o => (i, o),
                    _ => return Err(ManifestError::MalformedEdge { line }),
                };

                let edge_id = state.add_edge(rule_id);
                for path in &rest[in_pos + 1..out_pos] {
                    state
                        .add_in_out(edge_id, InOut::In, path.as_bytes())
                        .map_err(|source| ManifestError::Graph { line, source })?;
                }
                for path in &rest[out_pos + 1..] {
                    state
                        .add_in_out(edge_id, InOut::Out, path.as_bytes())
                        .map_err(|source| ManifestError::Graph { line, source })?;
                }
            }
            other => {
                return Err(ManifestError::UnknownDirective {
                    line,
                    directive: other.to_owned(),
                })
            }
        }
    }

    Ok(())
}
