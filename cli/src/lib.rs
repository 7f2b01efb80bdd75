use anyhow::Context;
use thiserror::Error;

use buildgraph_exec::{Builder, SystemShell};
use buildgraph_graph::{explain, Plan, State, SystemDiskInterface};
use buildgraph_metrics::scoped_metric;

pub mod manifest;

/// Nothing to do with rustc debug vs. release; this is just a name for the handful of
/// observability/retention knobs the core exposes as process-wide flags.
#[derive(Debug, PartialEq, Eq)]
pub enum DebugMode {
    List,
    Stats,
    Explain,
    KeepDepfile,
    KeepDynout,
    KeepRsp,
    ExperimentalStatcache,
}

#[derive(Error, Debug)]
#[error("unknown debug setting '{0}'")]
pub struct DebugModeError(String);

impl std::str::FromStr for DebugMode {
    type Err = DebugModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(DebugMode::List),
            "stats" => Ok(DebugMode::Stats),
            "explain" => Ok(DebugMode::Explain),
            "keepdepfile" => Ok(DebugMode::KeepDepfile),
            "keepdynout" => Ok(DebugMode::KeepDynout),
            "keeprsp" => Ok(DebugMode::KeepRsp),
            "statcache" => Ok(DebugMode::ExperimentalStatcache),
            other => Err(DebugModeError(other.to_owned())),
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub execution_dir: Option<String>,
    pub manifest_file: String,
    pub debug_modes: Vec<DebugMode>,
    pub targets: Vec<String>,
}

fn apply_debug_modes(modes: &[DebugMode]) -> bool {
    let mut metrics_enabled = false;
    for mode in modes {
        match mode {
            DebugMode::List => {}
            DebugMode::Stats => metrics_enabled = true,
            DebugMode::Explain => explain::set_explaining(true),
            DebugMode::KeepDepfile => explain::set_keep_depfile(true),
            DebugMode::KeepDynout => explain::set_keep_dynout(true),
            DebugMode::KeepRsp => explain::set_keep_rsp(true),
            DebugMode::ExperimentalStatcache => explain::set_experimental_statcache(true),
        }
    }
    metrics_enabled
}

pub fn run(config: Config) -> anyhow::Result<()> {
    if let Some(dir) = &config.execution_dir {
        std::env::set_current_dir(dir).with_context(|| format!("changing to {} for -C", dir))?;
    }

    let metrics_enabled = apply_debug_modes(&config.debug_modes);
    if metrics_enabled {
        buildgraph_metrics::enable();
    }

    let text = std::fs::read_to_string(&config.manifest_file)
        .with_context(|| format!("reading {}", &config.manifest_file))?;

    let mut state = State::new();
    manifest::load(&text, &mut state).with_context(|| format!("loading {}", &config.manifest_file))?;

    state.reload(&SystemDiskInterface);

    let mut plan = Plan::new();
    if config.targets.is_empty() {
        for target in state.default_targets() {
            plan.add_target(&state, target)?;
        }
    } else {
        for target in &config.targets {
            let node = state.get_node(target.as_bytes());
            plan.add_target(&state, node)?;
        }
    }

    {
        scoped_metric!("build");
        let mut builder = Builder::new();
        builder.build(&SystemShell, &mut state, &mut plan)?;
    }

    if metrics_enabled {
        buildgraph_metrics::dump();
    }

    Ok(())
}
