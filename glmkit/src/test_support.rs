//! Test-only helpers: a line-oriented stub codec and small builders.
//!
//! The stub codec is not the real model grammar (that lives outside this
//! crate); it is a deterministic stand-in that honors the codec contract,
//! including emitting all six structures on render.

use std::path::Path;

use crate::error::Result;
use crate::io::codec::ModelCodec;
use crate::model::{ModelDocument, PropertyMap};

/// Build a property map from literal pairs.
pub fn props(pairs: &[(&str, &str)]) -> PropertyMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Line-oriented codec for tests.
///
/// One statement per line: `directive <text>`, `clock k=v`,
/// `module <name> [k=v ...]`, `class <name> [k=v ...]`,
/// `schedule <name> <text>`, `object <class> <name> [k=v ...]`.
/// Values must not contain spaces.
pub struct StubCodec;

impl ModelCodec for StubCodec {
    fn extension(&self) -> &str {
        "glm"
    }

    fn parse(&self, text: &str, _base_dir: &Path) -> Result<ModelDocument> {
        let mut doc = ModelDocument::default();
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            let mut words = line.split_whitespace();
            match words.next() {
                Some("directive") => {
                    doc.directives.push(words.collect::<Vec<_>>().join(" "));
                }
                Some("clock") => {
                    for (k, v) in pairs(words) {
                        doc.clock.insert(k, v);
                    }
                }
                Some("module") => {
                    let name = words.next().unwrap_or_default().to_string();
                    doc.modules.insert(name, pairs(words).collect());
                }
                Some("class") => {
                    let name = words.next().unwrap_or_default().to_string();
                    doc.class_defs.insert(name, pairs(words).collect());
                }
                Some("schedule") => {
                    let name = words.next().unwrap_or_default().to_string();
                    doc.schedules
                        .insert(name, words.collect::<Vec<_>>().join(" "));
                }
                Some("object") => {
                    let class = words.next().unwrap_or_default().to_string();
                    let name = words.next().unwrap_or_default().to_string();
                    doc.model
                        .classes
                        .entry(class)
                        .or_default()
                        .insert(name, pairs(words).collect());
                }
                _ => {}
            }
        }
        Ok(doc)
    }

    fn render(&self, document: &ModelDocument) -> Result<String> {
        let mut out = String::new();
        for directive in &document.directives {
            out.push_str(&format!("directive {directive}\n"));
        }
        for (k, v) in &document.clock {
            out.push_str(&format!("clock {k}={v}\n"));
        }
        for (name, params) in &document.modules {
            out.push_str(&format!("module {name}{}\n", render_pairs(params)));
        }
        for (name, schema) in &document.class_defs {
            out.push_str(&format!("class {name}{}\n", render_pairs(schema)));
        }
        for (name, rules) in &document.schedules {
            out.push_str(&format!("schedule {name} {rules}\n"));
        }
        for (class, table) in &document.model.classes {
            for (name, properties) in table {
                out.push_str(&format!(
                    "object {class} {name}{}\n",
                    render_pairs(properties)
                ));
            }
        }
        Ok(out)
    }
}

fn pairs<'a>(words: impl Iterator<Item = &'a str>) -> impl Iterator<Item = (String, String)> {
    words.filter_map(|word| {
        word.split_once('=')
            .map(|(k, v)| (k.to_string(), v.to_string()))
    })
}

fn render_pairs(map: &PropertyMap) -> String {
    map.iter()
        .map(|(k, v)| format!(" {k}={v}"))
        .collect::<String>()
}

/// Write an executable fake-simulator script and return its absolute path.
#[cfg(unix)]
pub fn write_fake_simulator(dir: &Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake_gridlabd.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake simulator");
    let mut perms = std::fs::metadata(&path).expect("metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod fake simulator");
    path
}
