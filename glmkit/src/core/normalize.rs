//! Quote normalization for object names and the references that point at
//! them.
//!
//! Model text may wrap object names in single or double quotes; quoting is
//! never meaningful, and mixed quoting breaks exact-match lookups. The two
//! transforms here strip it from the name keys and from the known
//! reference-bearing properties. They must be applied together: stripping
//! keys but not references (or the reverse) leaves the model inconsistent.

use crate::model::{Model, ObjectTable, strip_quotes};

/// Classes whose `from`/`to` properties reference other objects.
const LINK_CLASSES: [&str; 12] = [
    "link",
    "overhead_line",
    "underground_line",
    "triplex_line",
    "transformer",
    "regulator",
    "fuse",
    "switch",
    "recloser",
    "relay",
    "sectionalizer",
    "series_reactor",
];

/// Link classes that also carry a `configuration` reference.
const CONFIGURED_LINK_CLASSES: [&str; 4] = [
    "overhead_line",
    "underground_line",
    "transformer",
    "regulator",
];

/// Classes whose `parent` property references another object.
const PARENTED_CLASSES: [&str; 8] = [
    "meter",
    "node",
    "triplex_node",
    "triplex_meter",
    "load",
    "pqload",
    "capacitor",
    "recorder",
];

impl Model {
    /// Strip redundant quoting from every object-name key and from all
    /// reference-bearing properties. Idempotent.
    pub fn normalize_quotes(&mut self) {
        self.normalize_object_names();
        self.normalize_references();
    }

    /// Strip quoting from object-name keys, class by class.
    ///
    /// If stripping makes two names in one class collide, the later entry
    /// overwrites the earlier one; which survives is an artifact of input
    /// order, not a contract.
    pub fn normalize_object_names(&mut self) {
        for table in self.classes.values_mut() {
            let stripped: ObjectTable = table
                .drain(..)
                .map(|(name, props)| (strip_quotes(&name).to_string(), props))
                .collect();
            *table = stripped;
        }
    }

    /// Strip quoting from reference values: `from`/`to` (and `configuration`
    /// where applicable) on link classes, `parent` on parented classes, and
    /// every property of `line_configuration`, whose values are all
    /// references.
    pub fn normalize_references(&mut self) {
        for class in LINK_CLASSES {
            let strip_configuration = CONFIGURED_LINK_CLASSES.contains(&class);
            let Some(table) = self.class_mut(class) else {
                continue;
            };
            for props in table.values_mut() {
                for key in ["from", "to"] {
                    if let Some(value) = props.get_mut(key) {
                        *value = strip_quotes(value).to_string();
                    }
                }
                if strip_configuration
                    && let Some(value) = props.get_mut("configuration")
                {
                    *value = strip_quotes(value).to_string();
                }
            }
        }

        for class in PARENTED_CLASSES {
            let Some(table) = self.class_mut(class) else {
                continue;
            };
            for props in table.values_mut() {
                if let Some(value) = props.get_mut("parent") {
                    *value = strip_quotes(value).to_string();
                }
            }
        }

        if let Some(table) = self.class_mut("line_configuration") {
            for props in table.values_mut() {
                for value in props.values_mut() {
                    *value = strip_quotes(value).to_string();
                }
            }
        }
    }
}
