//! Decoding of tabular simulator output files.
//!
//! The header row position depends on which internal mode produced the file:
//! recorder-style files put it right after a single banner line, dump-style
//! files put it after a longer metadata block. Decoding tries the primary
//! offset and falls back to the secondary on a structural mismatch.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// Known header-row offsets (line index from the file start), primary first.
const HEADER_OFFSETS: [usize; 2] = [1, 8];

/// One decoded result file.
///
/// The first column is the row key; remaining columns keep their header
/// names. Cell values keep their natural textual form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    pub index_name: String,
    pub columns: Vec<String>,
    pub index: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of a named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let pos = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[pos].as_str()).collect())
    }
}

/// Decode a delimiter-separated result file, trying each known header
/// offset in order. A structural failure at every offset propagates the
/// primary offset's error.
pub fn load_table(path: &Path) -> Result<ResultTable> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let lines: Vec<&str> = contents
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .collect();

    let mut first_failure = None;
    for offset in HEADER_OFFSETS {
        match parse_at(&lines, offset) {
            Ok(table) => return Ok(table),
            Err(reason) => {
                if first_failure.is_none() {
                    first_failure = Some(reason);
                }
            }
        }
    }
    Err(Error::MalformedTable {
        path: path.to_path_buf(),
        reason: first_failure.unwrap_or_else(|| "empty file".to_string()),
    })
}

fn parse_at(lines: &[&str], header_offset: usize) -> std::result::Result<ResultTable, String> {
    let header = lines
        .get(header_offset)
        .ok_or_else(|| format!("no header row at line {header_offset}"))?;
    let mut fields = header.split(',').map(str::trim);
    let index_name = fields
        .next()
        .ok_or_else(|| "empty header row".to_string())?
        .to_string();
    let columns: Vec<String> = fields.map(ToString::to_string).collect();
    let width = columns.len() + 1;

    let mut index = Vec::new();
    let mut rows = Vec::new();
    for (line_no, line) in lines.iter().enumerate().skip(header_offset + 1) {
        if line.is_empty() {
            continue;
        }
        let mut cells: Vec<String> = line.split(',').map(|c| c.trim().to_string()).collect();
        if cells.len() != width {
            return Err(format!(
                "line {line_no}: expected {width} fields, found {}",
                cells.len()
            ));
        }
        index.push(cells.remove(0));
        rows.push(cells);
    }

    Ok(ResultTable {
        index_name,
        columns,
        index,
        rows,
    })
}
