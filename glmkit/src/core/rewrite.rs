//! Path redirection for sink and player files.
//!
//! Pure string transforms over path-valued properties; nothing here touches
//! the filesystem. The pipeline uses these to point outputs and staged
//! player files into the sandbox.

use std::path::Path;

use crate::model::Model;

/// Sink classes whose output path lives in the `filename` property.
const FILENAME_SINK_CLASSES: [&str; 3] = ["voltdump", "currdump", "impedance_dump"];

/// Sink classes whose output path lives in the `file` property.
const FILE_SINK_CLASSES: [&str; 4] = ["recorder", "collector", "group_recorder", "multi_recorder"];

impl Model {
    /// Redirect every sink output path into `new_output_dir`, keeping only
    /// the file's base name. Absent classes and objects without the path
    /// property are skipped.
    pub fn rewrite_output_paths(&mut self, new_output_dir: &str) {
        for class in FILENAME_SINK_CLASSES {
            rewrite_class(self, class, "filename", new_output_dir);
        }
        for class in FILE_SINK_CLASSES {
            rewrite_class(self, class, "file", new_output_dir);
        }
    }

    /// Redirect every `player` input path into `new_player_dir`, keeping
    /// only the file's base name.
    pub fn rewrite_player_paths(&mut self, new_player_dir: &str) {
        rewrite_class(self, "player", "file", new_player_dir);
    }
}

fn rewrite_class(model: &mut Model, class: &str, property: &str, new_dir: &str) {
    let Some(table) = model.class_mut(class) else {
        return;
    };
    for props in table.values_mut() {
        if let Some(value) = props.get_mut(property)
            && let Some(redirected) = redirect(value, new_dir)
        {
            *value = redirected;
        }
    }
}

/// `"old/dir/name.ext"` -> `"<new_dir>/name.ext"`, or `None` for a path with
/// no base name.
fn redirect(path: &str, new_dir: &str) -> Option<String> {
    let base = Path::new(path).file_name()?.to_string_lossy();
    Some(format!("{new_dir}/{base}"))
}
