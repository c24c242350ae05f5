//! Caller-owned model registry: the six top-level structures plus their
//! load/serialize bindings through a [`ModelCodec`].
//!
//! The registry is plain mutable state with no internal locking; concurrent
//! pipeline runs must each own their own registry instance (and their own
//! sandbox root).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::io::codec::ModelCodec;
use crate::model::ModelDocument;

#[derive(Debug, Default, Clone)]
pub struct ModelRegistry {
    pub doc: ModelDocument,
    /// Source file the document was loaded from, if any.
    pub file_path: Option<PathBuf>,
    /// Directory that path-valued properties are resolved against until
    /// explicitly rewritten.
    pub base_dir: Option<PathBuf>,
}

impl ModelRegistry {
    /// Registry around an in-memory document with no source file.
    pub fn new(doc: ModelDocument) -> Self {
        Self {
            doc,
            file_path: None,
            base_dir: None,
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Load a model file, replacing all six structures wholesale.
    ///
    /// Fails with [`Error::FileNotFound`] when `file_path` does not exist.
    /// When `base_dir` is omitted it defaults to the file's containing
    /// directory.
    pub fn load_from(
        codec: &dyn ModelCodec,
        file_path: impl Into<PathBuf>,
        base_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let file_path = file_path.into();
        if !file_path.exists() {
            return Err(Error::FileNotFound { path: file_path });
        }
        let base_dir = match base_dir {
            Some(dir) => dir,
            None => file_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        let text = fs::read_to_string(&file_path).map_err(|e| Error::io(&file_path, e))?;
        let doc = codec.parse(&text, &base_dir)?;
        debug!(
            path = %file_path.display(),
            classes = doc.model.classes.len(),
            modules = doc.modules.len(),
            "model loaded"
        );
        Ok(Self {
            doc,
            file_path: Some(file_path),
            base_dir: Some(base_dir),
        })
    }

    /// Read a model file into this registry, replacing all current state
    /// (overwrite, never a merge).
    pub fn read(
        &mut self,
        codec: &dyn ModelCodec,
        file_path: impl Into<PathBuf>,
        base_dir: Option<PathBuf>,
    ) -> Result<()> {
        *self = Self::load_from(codec, file_path, base_dir)?;
        Ok(())
    }

    /// Serialize the full document to `path`; all six structures are always
    /// emitted, even when empty.
    pub fn serialize_to(&self, codec: &dyn ModelCodec, path: &Path) -> Result<()> {
        let text = codec.render(&self.doc)?;
        fs::write(path, text).map_err(|e| Error::io(path, e))?;
        debug!(path = %path.display(), "model serialized");
        Ok(())
    }
}
