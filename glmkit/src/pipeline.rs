//! Orchestration of one simulation run.
//!
//! A run moves through staging (sandbox, players, outputs), serialization,
//! simulator invocation, and harvesting, in that order. The first failing
//! step aborts the run; nothing is rolled back, so a failed run's sandbox
//! must be treated as unreliable. One registry, one sandbox root, one run at
//! a time — concurrent runs need their own of each.

use std::path::PathBuf;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::io::codec::ModelCodec;
use crate::io::config::PipelineConfig;
use crate::io::process::{SimulatorOutput, run_simulator};
use crate::io::results::{ResultTable, load_table};
use crate::io::sandbox::Sandbox;
use crate::registry::ModelRegistry;

/// Bytes of simulator stderr carried into a `SimulationFailed` error.
const STDERR_EXCERPT_BYTES: usize = 4096;

/// Per-run knobs that are not part of the on-disk configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Directory the `gld_tmp` sandbox is created under. Defaults to the
    /// registry's base directory.
    pub sandbox_root: Option<PathBuf>,
    /// Explicit result files to harvest (names under the sandbox's output
    /// directory). When unset, every file with the configured table
    /// extension in the output directory is harvested.
    pub output_files: Option<Vec<String>>,
}

/// Everything a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    /// Result tables keyed by output file name.
    pub results: IndexMap<String, ResultTable>,
    /// Captured simulator exit status and output.
    pub simulator: SimulatorOutput,
}

/// Stage, serialize, run, and harvest one simulation.
///
/// The registry is mutated in place: player `file` properties point at the
/// staged copies and sink outputs are redirected into the sandbox, exactly
/// as they will be serialized.
pub fn run(
    registry: &mut ModelRegistry,
    codec: &dyn ModelCodec,
    config: &PipelineConfig,
    options: &RunOptions,
) -> Result<RunOutcome> {
    let base_dir = registry
        .base_dir
        .clone()
        .ok_or(Error::MissingBaseDirectory)?;
    let sandbox_root = options.sandbox_root.clone().unwrap_or_else(|| base_dir.clone());

    debug!(root = %sandbox_root.display(), "staging sandbox");
    let sandbox = Sandbox::create(&sandbox_root)?;
    sandbox.stage_players(&mut registry.doc.model, &base_dir)?;
    sandbox.stage_outputs(&mut registry.doc.model)?;

    let model_file = sandbox.model_file_name(codec.extension());
    registry.serialize_to(codec, &sandbox.root().join(&model_file))?;

    info!(model_file, "invoking simulator");
    let timeout = match config.run_timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let simulator = run_simulator(
        &config.simulator,
        &model_file,
        sandbox.root(),
        timeout,
        config.output_limit_bytes,
    )?;
    if simulator.timed_out || !simulator.status.success() {
        return Err(Error::SimulationFailed {
            status: Some(simulator.status),
            timed_out: simulator.timed_out,
            stderr_excerpt: simulator.stderr_excerpt(STDERR_EXCERPT_BYTES),
        });
    }

    let results = harvest(&sandbox, config, options)?;
    info!(tables = results.len(), "run complete");
    Ok(RunOutcome { results, simulator })
}

/// Decode the run's result tables, keyed by file name.
fn harvest(
    sandbox: &Sandbox,
    config: &PipelineConfig,
    options: &RunOptions,
) -> Result<IndexMap<String, ResultTable>> {
    let output_dir = sandbox.output_dir();
    let names: Vec<String> = match &options.output_files {
        Some(names) => names.clone(),
        None => {
            let entries =
                std::fs::read_dir(&output_dir).map_err(|e| Error::io(&output_dir, e))?;
            let mut discovered: Vec<String> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .filter(|name| {
                    std::path::Path::new(name)
                        .extension()
                        .is_some_and(|ext| ext == config.table_extension.as_str())
                })
                .collect();
            // Directory order is platform-dependent; sort for determinism.
            discovered.sort();
            discovered
        }
    };

    let mut results = IndexMap::new();
    for name in names {
        let path = output_dir.join(&name);
        let key = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        debug!(file = %key, "harvesting result table");
        results.insert(key, load_table(&path)?);
    }
    Ok(results)
}
