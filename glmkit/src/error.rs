//! Error taxonomy for model lookups and pipeline runs.
//!
//! Lookup and resolution failures surface immediately and are never retried.
//! Overwrite situations in the builder are *not* errors; they are logged as
//! warnings and the caller proceeds.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// No candidate class contains an object with this name.
    #[error("object not found: {name}")]
    ObjectNotFound { name: String },

    /// The object exists but does not carry the requested property.
    #[error("property {property:?} not found on object {object:?}")]
    PropertyNotFound { object: String, property: String },

    /// A parent chain revisited a (class, name) pair.
    #[error("cyclic parent reference at {class}:{name}")]
    CyclicReference { class: String, name: String },

    /// A model file or staged input file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The registry has no base directory configured; staging needs one.
    #[error("no base directory configured; set one before running")]
    MissingBaseDirectory,

    /// The external simulator exited non-zero or was killed on timeout.
    #[error(
        "simulation failed (exit: {status:?}, timed out: {timed_out}): {stderr_excerpt}"
    )]
    SimulationFailed {
        status: Option<ExitStatus>,
        timed_out: bool,
        stderr_excerpt: String,
    },

    /// Filesystem failure while staging, serializing, or harvesting.
    #[error("io error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A harvested table could not be decoded at either known header offset.
    #[error("malformed result table {}: {reason}", path.display())]
    MalformedTable { path: PathBuf, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
