//! Item list parsing: one item id per line.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::SetupError;

/// One unit of work: an item id and its 0-based position in the list.
///
/// The position is only used for "i/N" progress output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub index: usize,
    pub id: String,
}

impl WorkItem {
    pub fn new(index: usize, id: impl Into<String>) -> Self {
        Self {
            index,
            id: id.into(),
        }
    }

    /// 1-based sequence number for progress output.
    pub fn seq(&self) -> usize {
        self.index + 1
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// C-locale `isspace`: ASCII space, \t, \n, \v, \f, \r.
fn is_c_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

/// Parse item ids from text. All ASCII whitespace inside a line is removed
/// (ids never contain spaces) and lines that end up empty are skipped.
/// Non-ASCII characters, including Unicode spaces, are kept as-is.
pub fn parse_item_list(text: &str) -> Vec<WorkItem> {
    text.lines()
        .map(|line| line.chars().filter(|c| !is_c_space(*c)).collect::<String>())
        .filter(|id| !id.is_empty())
        .enumerate()
        .map(|(index, id)| WorkItem { index, id })
        .collect()
}

/// Read and parse an item list file. Fails if the file cannot be read, is
/// not UTF-8, or contains no ids.
pub fn read_item_list(path: &Path) -> Result<Vec<WorkItem>, SetupError> {
    let bytes = fs::read(path).map_err(|source| SetupError::ItemListUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        SetupError::ItemListNotUtf8 {
            path: path.to_path_buf(),
            line: valid.iter().filter(|b| **b == b'\n').count() + 1,
        }
    })?;
    let items = parse_item_list(&text);
    if items.is_empty() {
        return Err(SetupError::ItemListEmpty {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(path = %path.display(), count = items.len(), "read item list");
    Ok(items)
}
