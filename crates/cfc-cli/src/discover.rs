//! `.c` file discovery.
//!
//! Walks the target tree raw: no gitignore handling, hidden files
//! included. Scanned trees are often third-party checkouts whose ignore
//! rules have nothing to do with which sources get compiled, so complete
//! coverage wins.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// Collect every regular `.c` file under `root`, absolute and sorted.
///
/// Unreadable subtrees are logged and skipped; they never fail the scan.
pub fn find_c_files(root: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!(%error, "skipping unwalkable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("c") {
            continue;
        }
        match path.canonicalize() {
            Ok(absolute) => files.push(absolute),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "cannot resolve path");
            }
        }
    }

    files.sort();
    files
}
