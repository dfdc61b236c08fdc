//! Checklist pruning.
//!
//! Drops completed `- [x]` items, collapses runs of blank lines and trims
//! trailing blanks. Writes go through a temp file in the same directory so
//! the checklist is never left half-written.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Error;

const CHECKED_MARKERS: [&str; 2] = ["- [x]", "- [X]"];

/// Result of pruning a checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneOutcome {
    /// Pruned file content.
    pub content: String,
    /// Completed items dropped.
    pub removed_items: usize,
    /// Blank lines dropped by collapsing or trailing trim.
    pub removed_blanks: usize,
    changed: bool,
}

impl PruneOutcome {
    /// Whether the pruned content differs from the input.
    pub fn changed(&self) -> bool {
        self.changed
    }
}

/// What a prune run did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneStatus {
    /// Content already pruned.
    UpToDate,
    /// Check mode: the file would change.
    WouldChange { removed_items: usize },
    /// Apply mode: the file was rewritten.
    Rewritten { removed_items: usize },
}

fn is_checked_item(line: &str) -> bool {
    let trimmed = line.trim_start();
    CHECKED_MARKERS.iter().any(|m| trimmed.starts_with(m))
}

/// Prune checklist text in one forward pass.
pub fn prune(original: &str) -> PruneOutcome {
    let mut kept: Vec<&str> = Vec::new();
    let mut removed_items = 0;
    let mut removed_blanks = 0;
    let mut prev_blank = false;

    for line in original.lines() {
        // `lines` leaves a lone trailing `\r` in place.
        let line = line.strip_suffix('\r').unwrap_or(line);
        if is_checked_item(line) {
            // Dropped lines leave the blank state alone.
            removed_items += 1;
        } else if line.trim().is_empty() {
            if prev_blank {
                removed_blanks += 1;
            } else {
                kept.push("");
                prev_blank = true;
            }
        } else {
            kept.push(line);
            prev_blank = false;
        }
    }

    while kept.last().is_some_and(|l| l.is_empty()) {
        kept.pop();
        removed_blanks += 1;
    }

    let content = if kept.is_empty() {
        String::new()
    } else {
        let mut joined = kept.join("\n");
        joined.push('\n');
        joined
    };
    let changed = content != original;

    PruneOutcome {
        content,
        removed_items,
        removed_blanks,
        changed,
    }
}

/// Prune a checklist file, writing it back unless `check_only`.
pub fn prune_file(path: &Path, check_only: bool) -> Result<PruneStatus, Error> {
    if !path.is_file() {
        return Err(Error::ChecklistNotFound(path.to_path_buf()));
    }
    let original = fs::read_to_string(path)?;
    let outcome = prune(&original);
    debug!(
        path = %path.display(),
        removed_items = outcome.removed_items,
        removed_blanks = outcome.removed_blanks,
        "Pruned checklist"
    );

    if !outcome.changed() {
        return Ok(PruneStatus::UpToDate);
    }
    if check_only {
        return Ok(PruneStatus::WouldChange {
            removed_items: outcome.removed_items,
        });
    }

    replace_file(path, &outcome.content)?;
    info!(path = %path.display(), removed_items = outcome.removed_items, "Rewrote checklist");
    Ok(PruneStatus::Rewritten {
        removed_items: outcome.removed_items,
    })
}

/// Replace `path` atomically with `content`.
fn replace_file(path: &Path, content: &str) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }
    temp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_removes_checked_and_collapses_blanks() {
        let outcome = prune("- [x] done\n- [ ] todo\n\n\ntext\n");
        assert_eq!(outcome.content, "- [ ] todo\n\ntext\n");
        assert_eq!(outcome.removed_items, 1);
        assert_eq!(outcome.removed_blanks, 1);
        assert!(outcome.changed());
    }

    #[test]
    fn test_uppercase_and_indented_checked_items() {
        let outcome = prune("# Tasks\n  - [X] nested done\n\t- [x] tabbed\n- [ ] open\n");
        assert_eq!(outcome.content, "# Tasks\n- [ ] open\n");
        assert_eq!(outcome.removed_items, 2);
    }

    #[test]
    fn test_checked_item_between_blanks_still_collapses() {
        let outcome = prune("a\n\n- [x] gone\n\nb\n");
        assert_eq!(outcome.content, "a\n\nb\n");
    }

    #[test]
    fn test_whitespace_only_lines_are_blank() {
        let outcome = prune("a\n   \n\t\nb\n");
        assert_eq!(outcome.content, "a\n\nb\n");
    }

    #[test]
    fn test_trailing_blanks_trimmed_and_newline_added() {
        assert_eq!(prune("a\n\n\n").content, "a\n");
        assert_eq!(prune("a").content, "a\n");
    }

    #[test]
    fn test_all_items_done_leaves_empty_file() {
        let outcome = prune("- [x] one\n- [X] two\n");
        assert_eq!(outcome.content, "");
        assert!(outcome.changed());
        assert!(!prune("").changed());
    }

    #[test]
    fn test_kept_lines_are_verbatim() {
        let text = "# Title  \n  - [ ] indented open\n* [x] other bullet\nnote - [x] inline\n";
        let outcome = prune(text);
        assert_eq!(outcome.content, text);
        assert_eq!(outcome.removed_items, 0);
    }

    #[test]
    fn test_clean_input_is_unchanged() {
        let text = "# TODO\n\n- [ ] one\n- [ ] two\n";
        let outcome = prune(text);
        assert!(!outcome.changed());
        assert_eq!(outcome.content, text);
    }

    #[test]
    fn test_crlf_and_lone_carriage_return_normalized() {
        let outcome = prune("- [ ] a\r");
        assert_eq!(outcome.content, "- [ ] a\n");
        assert!(!prune(&outcome.content).changed());

        let outcome = prune("- [ ] a\r\n- [x] b\r\n\r\n\r\nend\r");
        assert_eq!(outcome.content, "- [ ] a\n\nend\n");
        assert!(!prune(&outcome.content).changed());
    }

    #[test]
    fn test_prune_is_idempotent() {
        let once = prune("\n\n- [x] a\n- [ ] b\n\n\n- [X] c\n\nend\n\n");
        let twice = prune(&once.content);
        assert!(!twice.changed());
        assert_eq!(twice.content, once.content);
    }

    #[test]
    fn test_apply_mode_rewrites_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("TODO.md");
        fs::write(&path, "- [x] done\n- [ ] todo\n\n\ntext\n").unwrap();

        let status = prune_file(&path, false).unwrap();
        assert_eq!(status, PruneStatus::Rewritten { removed_items: 1 });
        assert_eq!(fs::read_to_string(&path).unwrap(), "- [ ] todo\n\ntext\n");

        // Second run has nothing left to do.
        assert_eq!(prune_file(&path, false).unwrap(), PruneStatus::UpToDate);
    }

    #[test]
    fn test_check_mode_does_not_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("TODO.md");
        let original = "- [x] done\n- [ ] todo\n";
        fs::write(&path, original).unwrap();

        let status = prune_file(&path, true).unwrap();
        assert_eq!(status, PruneStatus::WouldChange { removed_items: 1 });
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_check_mode_clean_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("TODO.md");
        fs::write(&path, "- [ ] todo\n").unwrap();
        assert_eq!(prune_file(&path, true).unwrap(), PruneStatus::UpToDate);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("TODO.md");
        assert!(matches!(
            prune_file(&path, false),
            Err(Error::ChecklistNotFound(_))
        ));
        assert!(!path.exists());
    }
}
