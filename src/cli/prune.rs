//! Checklist prune command.

use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::todo::{self, PruneStatus};

/// Run the prune command on `path` (relative to `root`).
///
/// Returns `false` only in check mode when the file would change, so
/// `--check` exits non-zero when pruning is needed.
pub fn run(root: &Path, path: &Path, check_only: bool) -> Result<bool, Error> {
    let status = todo::prune_file(&root.join(path), check_only)?;
    println!("{}", status_line(path, &status));
    Ok(!matches!(status, PruneStatus::WouldChange { .. }))
}

fn status_line(path: &Path, status: &PruneStatus) -> String {
    let name = path.display();
    match status {
        PruneStatus::UpToDate => format!("{}: up to date", name),
        PruneStatus::WouldChange { removed_items } => {
            debug!(path = %name, removed_items, "Checklist would change");
            format!("{}: changes needed", name)
        }
        PruneStatus::Rewritten { removed_items } => {
            format!("{}: removed {} completed item(s)", name, removed_items)
        }
    }
}
