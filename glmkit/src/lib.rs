//! In-memory manipulation and sandboxed execution of GridLAB-D models.
//!
//! A [`ModelRegistry`] holds the six top-level structures of a model file
//! (objects by class, clock, directives, modules, class definitions,
//! schedules). Callers build or load a registry, mutate it through the pure
//! operations in [`core`] (reference resolution, quote normalization, path
//! rewriting, object/module building), then hand it to [`pipeline::run`],
//! which stages a disposable sandbox, invokes the external simulator, and
//! harvests the tabular results.
//!
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic model operations. No I/O, fully
//!   testable in isolation.
//! - **[`io`]**: Side-effecting pieces (codec seam, staging, process
//!   execution, result decoding, configuration).
//!
//! [`pipeline`] coordinates the two. The textual model grammar itself is a
//! collaborator behind the [`io::codec::ModelCodec`] trait, not part of this
//! crate.

pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod registry;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{Error, Result};
pub use io::codec::ModelCodec;
pub use io::config::PipelineConfig;
pub use io::results::ResultTable;
pub use model::{Model, ModelDocument, ObjectTable, PropertyMap};
pub use pipeline::{RunOptions, RunOutcome, run};
pub use registry::ModelRegistry;
