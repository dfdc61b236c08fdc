//! Documentation tree policy checker.
//!
//! Walks the docs root through a [`DocTree`] and collects every violation in
//! one pass. Violations are returned sorted; nothing here prints.

pub mod fences;
pub mod layout;
pub mod links;
pub mod tree;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::PolicyConfig;
use crate::error::Error;

pub use tree::{DocTree, EntryKind, FsTree, MemTree, TreeEntry};

/// A single policy infraction.
///
/// Field order gives the report order: path, then line (file-level
/// violations first), then message.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Violation {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl Violation {
    pub fn new(path: &Path, line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            path: tree::display_path(path),
            line,
            message: message.into(),
        }
    }

    pub fn at_line(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::new(path, Some(line), message)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.path, line, self.message),
            None => write!(f, "{}: {}", self.path, self.message),
        }
    }
}

/// Check the docs tree and return all violations, sorted.
///
/// Only a missing docs root is an error; unreadable files and directories
/// are reported as violations and the walk continues.
pub fn check_tree<T: DocTree + ?Sized>(
    tree: &T,
    config: &PolicyConfig,
) -> Result<Vec<Violation>, Error> {
    let docs_root = tree::normalize(&config.docs_dir)
        .ok_or_else(|| Error::DocsRootNotFound(config.docs_dir.clone()))?;
    if !tree.is_dir(&docs_root) {
        return Err(Error::DocsRootNotFound(config.docs_dir.clone()));
    }

    let mut violations = Vec::new();
    let mut pending: Vec<PathBuf> = vec![docs_root];
    let mut dirs_seen = 0usize;
    let mut files_seen = 0usize;

    while let Some(dir) = pending.pop() {
        dirs_seen += 1;
        let entries = match tree.list(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                violations.push(Violation::new(
                    &dir,
                    None,
                    format!("Directory could not be read: {}", e),
                ));
                continue;
            }
        };

        let visible: Vec<TreeEntry> = entries.into_iter().filter(|e| !e.is_hidden()).collect();
        violations.extend(layout::check_directory(&dir, &visible, config));

        for entry in visible.iter().rev() {
            let path = dir.join(&entry.name);
            match entry.kind {
                EntryKind::Dir => pending.push(path),
                EntryKind::File if is_markdown(&entry.name) => {
                    files_seen += 1;
                    violations.extend(check_file(tree, &path, config));
                }
                EntryKind::File => {}
            }
        }
    }

    violations.sort();
    info!(
        directories = dirs_seen,
        files = files_seen,
        violations = violations.len(),
        "Docs policy scan complete"
    );
    Ok(violations)
}

/// Apply the per-file rules to one Markdown file.
pub fn check_file<T: DocTree + ?Sized>(
    tree: &T,
    path: &Path,
    config: &PolicyConfig,
) -> Vec<Violation> {
    let bytes = match tree.read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return vec![Violation::new(
                path,
                None,
                format!("Doc file could not be read: {}", e),
            )]
        }
    };
    let Ok(text) = String::from_utf8(bytes) else {
        return vec![Violation::new(path, None, "Doc file must be valid UTF-8.")];
    };
    debug!(path = %path.display(), "Checking doc file");

    let mut violations = Vec::new();
    violations.extend(layout::check_line_count(path, &text, config));
    violations.extend(fences::check_fences(path, &text));
    violations.extend(links::check_links(tree, path, &text));
    violations
}

fn is_markdown(name: &str) -> bool {
    name.ends_with(".md")
}
