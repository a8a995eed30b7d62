// Document directory scanner
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Regular files directly inside `root`, sorted by file name.
///
/// The listing is not recursive and does not filter by extension or hide
/// dotfiles; deciding what can be ingested (and reporting what cannot) is
/// the assembler's job.
pub fn scan_docs(root: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .max_depth(Some(1))
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .build();

    let mut files = Vec::new();
    for result in walker {
        match result {
            Ok(entry) => {
                if entry.file_type().map_or(false, |ft| ft.is_file()) {
                    files.push(entry.into_path());
                }
            }
            Err(err) => {
                warn!("Error scanning path: {}", err);
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Scanned {} files in {}", files.len(), root.display());
    files
}
