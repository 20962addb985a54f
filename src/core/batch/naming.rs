//! Batch file naming.
//!
//! Files are named `<index>.htmls.<codec extension>`, with the index
//! zero-padded to a fixed width. Indices wider than the width are written in
//! full, never truncated.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Inner extension shared by every batch file (a stream of HTML records).
pub const RECORD_STREAM_EXTENSION: &str = "htmls";

/// Default number of digits in a batch file index.
pub const DEFAULT_NAME_WIDTH: usize = 4;

/// Formats the file name for batch `index`.
///
/// ```rust
/// use zimpack::core::batch::batch_file_name;
///
/// assert_eq!(batch_file_name(7, 4, "gz"), "0007.htmls.gz");
/// assert_eq!(batch_file_name(12345, 4, "gz"), "12345.htmls.gz");
/// ```
pub fn batch_file_name(index: usize, width: usize, extension: &str) -> String {
    format!("{index:0width$}.{RECORD_STREAM_EXTENSION}.{extension}")
}

/// Parses the index out of a batch file name. Returns `None` for files that
/// don't look like batch files.
pub fn parse_batch_index(name: &str, extension: &str) -> Option<usize> {
    let stem = name
        .strip_suffix(extension)?
        .strip_suffix('.')?
        .strip_suffix(RECORD_STREAM_EXTENSION)?
        .strip_suffix('.')?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Lists the batch files in `dir`, ordered by index.
pub fn list_batch_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(index) = name.to_str().and_then(|n| parse_batch_index(n, extension)) else {
            continue;
        };
        if entry.file_type()?.is_file() {
            files.push((index, entry.path()));
        }
    }
    files.sort_by_key(|(index, _)| *index);
    Ok(files.into_iter().map(|(_, path)| path).collect())
}
