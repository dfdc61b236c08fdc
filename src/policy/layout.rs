//! Structural rules: README presence, directory fan-out, file length.

use std::path::Path;

use crate::config::PolicyConfig;

use super::tree::{display_path, EntryKind, TreeEntry};
use super::Violation;

/// README presence and child-count rules for one directory.
///
/// `visible` must already exclude hidden entries.
pub fn check_directory(dir: &Path, visible: &[TreeEntry], config: &PolicyConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    if visible.len() > config.max_dir_children {
        violations.push(Violation::new(
            dir,
            None,
            format!(
                "Directory exceeds {} children ({}).",
                config.max_dir_children,
                visible.len()
            ),
        ));
    }

    // Exact, case-sensitive match.
    let readmes = visible
        .iter()
        .filter(|e| e.kind == EntryKind::File && e.name == config.readme_name)
        .count();
    if readmes != 1 {
        violations.push(Violation::new(
            dir,
            None,
            format!(
                "Directory must contain exactly one {} (found {}).",
                config.readme_name, readmes
            ),
        ));
    }

    violations
}

/// Newline-terminated lines, plus a trailing partial line if non-empty.
pub fn count_lines(text: &str) -> usize {
    let terminated = text.matches('\n').count();
    let partial = !text.is_empty() && !text.ends_with('\n');
    terminated + usize::from(partial)
}

/// Line-limit rule for one Markdown file.
pub fn check_line_count(path: &Path, text: &str, config: &PolicyConfig) -> Option<Violation> {
    if config.line_limit_exempt.contains(&display_path(path)) {
        return None;
    }
    let lines = count_lines(text);
    if lines <= config.max_file_lines {
        return None;
    }
    Some(Violation::new(
        path,
        None,
        format!(
            "Documentation file exceeds {} lines ({}).",
            config.max_file_lines, lines
        ),
    ))
}
