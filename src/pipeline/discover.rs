//! Input file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::text::{Script, matches_scripts};

/// Page files in `dir`, sorted by lower-cased name.
///
/// Only regular files directly inside `dir` count, and only those without
/// an extension and not hidden. `scripts` filters by the script of the file
/// name (empty keeps everything); `limit` is applied last.
pub fn discover_files(dir: &Path, scripts: &[Script], limit: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut files: Vec<(String, PathBuf)> = Vec::new();

    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if !is_page_name(&name) {
            continue;
        }
        // Follows symlinks, like the reader will.
        if !fs::metadata(&path).is_ok_and(|m| m.is_file()) {
            continue;
        }
        files.push((name.to_lowercase(), path));
    }

    files.sort();
    let total = files.len();

    let mut selected: Vec<PathBuf> = files
        .into_iter()
        .filter(|(_, path)| {
            path.file_name()
                .is_some_and(|n| matches_scripts(&n.to_string_lossy(), scripts))
        })
        .map(|(_, path)| path)
        .collect();

    if let Some(limit) = limit {
        selected.truncate(limit);
    }

    debug!(found = total, selected = selected.len(), "discovered input files");
    Ok(selected)
}

/// Not hidden, and no extension. A trailing dot (`etc.`) is not an
/// extension.
fn is_page_name(name: &str) -> bool {
    if name.starts_with('.') {
        return false;
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) => stem.is_empty() || ext.is_empty(),
        None => true,
    }
}
