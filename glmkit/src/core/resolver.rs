//! Lookup and parent-chain traversal over the class-partitioned namespace.
//!
//! Object names are only unique within a class, so resolution scans candidate
//! classes in iteration order. A name of the form `class:name` short-circuits
//! the scan: the prefix is taken as the class without any existence check.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::{Model, strip_quotes};

impl Model {
    /// Names of objects whose `property` equals `value` exactly.
    ///
    /// Candidate classes default to every class currently in the model, in
    /// class-iteration order; within a class, matches come out in object
    /// insertion order. With `qualified` the entries are `class:name` with
    /// quotes stripped from both parts. No match yields an empty list.
    pub fn find_objects_by_property(
        &self,
        property: &str,
        value: &str,
        candidate_types: Option<&[&str]>,
        qualified: bool,
    ) -> Vec<String> {
        let classes: Vec<String> = match candidate_types {
            Some(types) => types.iter().map(|t| (*t).to_string()).collect(),
            None => self.class_names(),
        };
        let mut found = Vec::new();
        for class in &classes {
            let Some(table) = self.class(class) else {
                continue;
            };
            for (name, props) in table {
                if props.get(property).map(String::as_str) == Some(value) {
                    if qualified {
                        found.push(format!("{}:{}", strip_quotes(class), strip_quotes(name)));
                    } else {
                        found.push(name.clone());
                    }
                }
            }
        }
        found
    }

    /// Class that `object_name` belongs to.
    ///
    /// A name containing exactly one `:` is treated as already qualified and
    /// its prefix is returned directly, without checking that the class or
    /// object exists. Otherwise candidate classes are scanned for the first
    /// one whose table contains the name.
    pub fn resolve_type(
        &self,
        object_name: &str,
        candidate_types: Option<&[&str]>,
    ) -> Result<String> {
        if let Some(class) = qualified_prefix(object_name) {
            return Ok(class.to_string());
        }
        let classes: Vec<String> = match candidate_types {
            Some(types) => types.iter().map(|t| (*t).to_string()).collect(),
            None => self.class_names(),
        };
        for class in classes {
            if let Some(table) = self.class(&class)
                && table.contains_key(object_name)
            {
                return Ok(class);
            }
        }
        Err(Error::ObjectNotFound {
            name: object_name.to_string(),
        })
    }

    /// Value of `property` on the named object.
    ///
    /// Accepts either a bare name (class resolved by scanning) or the
    /// `class:name` form. A miss on the bare name is retried with the name
    /// wrapped in double quotes before failing, since stored keys may still
    /// carry quoting from the source text.
    pub fn property_value(
        &self,
        object_name: &str,
        property: &str,
        candidate_types: Option<&[&str]>,
    ) -> Result<String> {
        let (class, name) = match qualified_split(object_name) {
            Some((class, name)) => (class.to_string(), name.to_string()),
            None => (
                self.resolve_type(object_name, candidate_types)?,
                object_name.to_string(),
            ),
        };
        let table = self.class(&class).ok_or_else(|| Error::ObjectNotFound {
            name: format!("{class}:{name}"),
        })?;
        let props = match table.get(&name) {
            Some(props) => props,
            None => table
                .get(&format!("\"{name}\""))
                .ok_or_else(|| Error::ObjectNotFound {
                    name: format!("{class}:{name}"),
                })?,
        };
        props
            .get(property)
            .cloned()
            .ok_or_else(|| Error::PropertyNotFound {
                object: format!("{class}:{name}"),
                property: property.to_string(),
            })
    }

    /// Parent of (class, name), or `None` for an object with no `parent`
    /// property. The parent's class is resolved across the full model, not
    /// restricted to any candidate set.
    pub fn parent_of(
        &self,
        object_name: &str,
        object_class: &str,
    ) -> Result<Option<(String, String)>> {
        let props = self
            .object(object_class, object_name)
            .ok_or_else(|| Error::ObjectNotFound {
                name: format!("{object_class}:{object_name}"),
            })?;
        let Some(parent_name) = props.get("parent") else {
            return Ok(None);
        };
        let parent_class = self.resolve_type(parent_name, None)?;
        Ok(Some((parent_name.clone(), parent_class)))
    }

    /// Walk the parent chain until an object with no parent is reached.
    ///
    /// Returns `None` when the starting object itself has no parent (the
    /// walk never leaves the start). The walk is iterative with a visited
    /// set; revisiting a (class, name) pair fails with
    /// [`Error::CyclicReference`] instead of looping.
    pub fn ultimate_ancestor(
        &self,
        object_name: &str,
        object_class: &str,
    ) -> Result<Option<(String, String)>> {
        let mut visited: HashSet<(String, String)> = HashSet::new();
        visited.insert((object_class.to_string(), object_name.to_string()));

        let mut current = match self.parent_of(object_name, object_class)? {
            Some(parent) => parent,
            None => return Ok(None),
        };
        loop {
            let (name, class) = current.clone();
            if !visited.insert((class.clone(), name.clone())) {
                return Err(Error::CyclicReference { class, name });
            }
            match self.parent_of(&name, &class)? {
                Some(parent) => current = parent,
                None => return Ok(Some(current)),
            }
        }
    }
}

/// `Some(prefix)` when `name` is the `class:name` form (exactly one `:`).
fn qualified_prefix(name: &str) -> Option<&str> {
    qualified_split(name).map(|(class, _)| class)
}

fn qualified_split(name: &str) -> Option<(&str, &str)> {
    if name.matches(':').count() != 1 {
        return None;
    }
    name.split_once(':')
}
