//! Recursive file enumeration
//!
//! Walks a tree root and yields every regular file as a [`RelativePath`].
//! Symbolic links are followed; a link that resolves to a file counts as
//! that file, a broken link is skipped. Directories are never yielded.
//! The result is sorted by path so one invocation's order is stable.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::path::RelativePath;

/// Enumerate every regular file under `root`, as paths relative to `root`.
///
/// # Errors
///
/// Returns an error if `root` cannot be read. Unreadable entries deeper in
/// the tree (e.g. broken symlinks) are skipped rather than fatal.
pub fn walk_files(root: &Path) -> Result<Vec<RelativePath>> {
    // Surface an unreadable root as an error; walkdir would otherwise
    // swallow it into an empty iteration below.
    std::fs::read_dir(root).map_err(|e| Error::io(root, e))?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| Error::OutsideRoot {
                path: entry.path().to_path_buf(),
                root: root.to_path_buf(),
            })?;
        files.push(RelativePath::new(relative));
    }

    files.sort();
    Ok(files)
}
