//! In-memory representation of a GridLAB-D model.
//!
//! A model is a three-level namespace: class -> object -> property. Object
//! names are unique only within a class; the true identity of an object is
//! the (class, name) pair. All mappings are insertion-ordered because
//! class-iteration order and object-insertion order are observable through
//! lookups and through the serialized output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Property name -> value. Values keep their textual form; numeric and
/// path-valued properties are not parsed at this layer.
pub type PropertyMap = IndexMap<String, String>;

/// Object name -> properties. Names may still carry a layer of quoting as
/// read from the source text.
pub type ObjectTable = IndexMap<String, PropertyMap>;

/// Class-partitioned object namespace.
///
/// Classes include both built-in simulation types and pseudo-classes such as
/// `player`, `recorder`, and `helics_msg`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Model {
    pub classes: IndexMap<String, ObjectTable>,
}

impl Model {
    /// Object table for `class`, if any object of that class exists.
    pub fn class(&self, class: &str) -> Option<&ObjectTable> {
        self.classes.get(class)
    }

    pub fn class_mut(&mut self, class: &str) -> Option<&mut ObjectTable> {
        self.classes.get_mut(class)
    }

    /// Properties of the object identified by (class, name).
    pub fn object(&self, class: &str, name: &str) -> Option<&PropertyMap> {
        self.classes.get(class).and_then(|table| table.get(name))
    }

    pub fn object_mut(&mut self, class: &str, name: &str) -> Option<&mut PropertyMap> {
        self.classes
            .get_mut(class)
            .and_then(|table| table.get_mut(name))
    }

    /// Current class names in iteration order.
    pub fn class_names(&self) -> Vec<String> {
        self.classes.keys().cloned().collect()
    }
}

/// The six top-level structures of a model file.
///
/// Populated wholesale by the codec on load (never merged with prior state)
/// or incrementally through the builder operations.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelDocument {
    pub model: Model,
    /// Singleton property map describing simulation time bounds.
    pub clock: PropertyMap,
    /// Top-of-file statements (includes/defines); order-significant.
    pub directives: Vec<String>,
    /// Module name -> parameters.
    pub modules: IndexMap<String, PropertyMap>,
    /// User-defined class name -> declared property schema.
    pub class_defs: IndexMap<String, PropertyMap>,
    /// Schedule name -> raw time-series rule text.
    pub schedules: IndexMap<String, String>,
}

/// Strip redundant quoting from a name or reference value.
///
/// Quoted and unquoted forms of the same string denote the same logical
/// object, so lookups and normalization both funnel through this. Trimming
/// all leading/trailing double quotes and then single quotes makes the
/// transform idempotent.
pub fn strip_quotes(name: &str) -> &str {
    name.trim_matches('"').trim_matches('\'')
}
