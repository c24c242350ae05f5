//! Seam to the textual model format.
//!
//! The grammar itself lives outside this crate; the registry and the
//! pipeline only need the two conversions. Implementations must always emit
//! all six top-level structures on render, even when empty, in the format's
//! canonical order.

use std::path::Path;

use crate::error::Result;
use crate::model::ModelDocument;

/// Parser/serializer pair for a concrete model-text dialect.
pub trait ModelCodec {
    /// File-name extension of the serialized form (e.g. `glm`).
    fn extension(&self) -> &str;

    /// Decode file text into the six top-level structures. Include-style
    /// references inside the text are resolved against `base_dir`.
    fn parse(&self, text: &str, base_dir: &Path) -> Result<ModelDocument>;

    /// Encode the full document back to text.
    fn render(&self, document: &ModelDocument) -> Result<String>;
}
