//! Pipeline configuration (TOML).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Execution-pipeline configuration.
///
/// This file is intended to be edited by humans and must remain stable and
/// automatable. Missing fields default to sensible values; a missing file is
/// the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Simulator invocation as an argv vector (e.g. `["gridlabd"]`). The
    /// serialized model file name is appended as the final argument.
    pub simulator: Vec<String>,

    /// Wall-clock budget for one simulator run in seconds. `0` waits
    /// without bound.
    pub run_timeout_secs: u64,

    /// Truncate captured simulator stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,

    /// File extension of tabular result files discovered during harvest.
    pub table_extension: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            simulator: vec!["gridlabd".to_string()],
            run_timeout_secs: 60 * 60,
            output_limit_bytes: 1_000_000,
            table_extension: "csv".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.simulator.is_empty() || self.simulator[0].trim().is_empty() {
            return Err(anyhow!("simulator must be a non-empty argv array"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        if self.table_extension.trim().is_empty() {
            return Err(anyhow!("table_extension must be non-empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `PipelineConfig::default()`.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    if !path.exists() {
        let cfg = PipelineConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PipelineConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &PipelineConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("pipeline.toml");
        let cfg = PipelineConfig {
            simulator: vec!["gridlabd".to_string(), "--quiet".to_string()],
            run_timeout_secs: 120,
            ..PipelineConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn empty_simulator_rejected() {
        let cfg = PipelineConfig {
            simulator: Vec::new(),
            ..PipelineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
