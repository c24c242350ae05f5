//! Disposable per-run working directory and the staging steps that fill it.
//!
//! The sandbox name `gld_tmp` is reserved: creating a sandbox deletes any
//! existing directory of that name under the chosen root. On a failed run
//! the sandbox is left in whatever partial state staging reached; callers
//! must not reuse it without explicit cleanup.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::Model;

/// Directory name reserved for the per-run sandbox.
pub const SANDBOX_DIR: &str = "gld_tmp";
/// Subdirectory holding staged player input files.
pub const PLAYERS_DIR: &str = "players";
/// Subdirectory all sink outputs are redirected into.
pub const OUTPUT_DIR: &str = "output";
/// Base name of the serialized model file (extension comes from the codec).
pub const MODEL_FILE_STEM: &str = "system";

/// Filesystem layout of one run's sandbox.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Create `<root>/gld_tmp`, deleting any previous directory of that
    /// name first.
    pub fn create(root: &Path) -> Result<Self> {
        let dir = root.join(SANDBOX_DIR);
        if dir.exists() {
            debug!(path = %dir.display(), "removing stale sandbox");
            fs::remove_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        }
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        Ok(Self { root: dir })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn players_dir(&self) -> PathBuf {
        self.root.join(PLAYERS_DIR)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(OUTPUT_DIR)
    }

    /// File name of the serialized model inside the sandbox.
    pub fn model_file_name(&self, extension: &str) -> String {
        format!("{MODEL_FILE_STEM}.{extension}")
    }

    /// Copy every player's source file (resolved against `base_dir`) into
    /// `players/` and point the object's `file` property at the staged copy.
    ///
    /// A missing source file aborts with [`Error::FileNotFound`], leaving
    /// the sandbox partially populated. No-op when no `player` class exists.
    pub fn stage_players(&self, model: &mut Model, base_dir: &Path) -> Result<()> {
        let Some(table) = model.class("player") else {
            return Ok(());
        };
        let sources: Vec<(String, String)> = table
            .iter()
            .filter_map(|(name, props)| {
                props.get("file").map(|file| (name.clone(), file.clone()))
            })
            .collect();

        let players_dir = self.players_dir();
        fs::create_dir_all(&players_dir).map_err(|e| Error::io(&players_dir, e))?;

        for (player_name, file) in sources {
            let source = base_dir.join(&file);
            if !source.exists() {
                return Err(Error::FileNotFound { path: source });
            }
            let base_name = source
                .file_name()
                .ok_or_else(|| Error::FileNotFound {
                    path: source.clone(),
                })?
                .to_string_lossy()
                .into_owned();
            let staged = players_dir.join(&base_name);
            fs::copy(&source, &staged).map_err(|e| Error::io(&staged, e))?;
            debug!(player = %player_name, from = %source.display(), "staged player file");

            if let Some(props) = model.object_mut("player", &player_name) {
                props.insert("file".to_string(), format!("{PLAYERS_DIR}/{base_name}"));
            }
        }
        Ok(())
    }

    /// Create `output/` and redirect every sink output path into it.
    pub fn stage_outputs(&self, model: &mut Model) -> Result<()> {
        let output_dir = self.output_dir();
        fs::create_dir_all(&output_dir).map_err(|e| Error::io(&output_dir, e))?;
        model.rewrite_output_paths(OUTPUT_DIR);
        Ok(())
    }
}
