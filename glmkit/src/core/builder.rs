//! Insertion and overwrite operations for objects and modules.
//!
//! Overwrites are deliberate and non-fatal: replacing an existing object or
//! module logs a warning and proceeds. `require_module` is the idempotent
//! variant used for optional-feature composition.

use std::path::Path;

use tracing::warn;

use crate::model::{ModelDocument, PropertyMap};

impl ModelDocument {
    /// Insert an object, overwriting any existing (class, name) entry.
    /// Replacement is logged, never an error.
    pub fn add_object(&mut self, class: &str, name: &str, properties: PropertyMap) {
        let table = self.model.classes.entry(class.to_string()).or_default();
        if table.contains_key(name) {
            warn!(class, name, "overwriting existing object");
        }
        table.insert(name.to_string(), properties);
    }

    /// Insert a module, overwriting an existing module's parameters.
    /// Replacement is logged, never an error.
    pub fn add_module(&mut self, name: &str, parameters: PropertyMap) {
        if self.modules.contains_key(name) {
            warn!(module = name, "overwriting existing module parameters");
        }
        self.modules.insert(name.to_string(), parameters);
    }

    /// Insert a module only if absent; a silent no-op when it already
    /// exists, existing parameters untouched.
    pub fn require_module(&mut self, name: &str, parameters: PropertyMap) {
        if !self.modules.contains_key(name) {
            self.modules.insert(name.to_string(), parameters);
        }
    }

    /// Wire the model up for co-simulation: ensure the `connection` module
    /// is loaded and add a `helics_msg` object pointing at the federate's
    /// configuration file.
    pub fn add_cosim_bridge(&mut self, federate_name: &str, config_path: &Path) {
        self.require_module("connection", PropertyMap::new());
        let mut props = PropertyMap::new();
        props.insert("configure".to_string(), posix_path(config_path));
        self.add_object("helics_msg", federate_name, props);
    }

    /// Drop the entire `helics_msg` class so the model can run standalone.
    /// No-op when the class is absent.
    pub fn remove_cosim_bridge(&mut self) {
        self.model.classes.shift_remove("helics_msg");
    }
}

/// Render a path with forward slashes regardless of platform.
fn posix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
