//! Side-effecting pieces of the pipeline: the codec seam, sandbox staging,
//! simulator invocation, result decoding, and the on-disk configuration.

pub mod codec;
pub mod config;
pub mod process;
pub mod results;
pub mod sandbox;
