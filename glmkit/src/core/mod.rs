//! Pure, deterministic model operations.
//!
//! Core modules must be free of I/O side effects. They operate on the
//! in-memory model structures and return deterministic outputs suitable for
//! tests; everything that touches the filesystem or spawns processes lives
//! under [`crate::io`].

pub mod builder;
pub mod normalize;
pub mod resolver;
pub mod rewrite;
