//! Docs policy check command.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::cli::OutputFormat;
use crate::config::PolicyConfig;
use crate::error::Error;
use crate::policy::{self, FsTree, Violation};

/// Command-line overrides for the policy config.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub docs_dir: Option<PathBuf>,
    pub max_children: Option<usize>,
    pub max_lines: Option<usize>,
    pub exempt: Vec<String>,
    pub readme_name: Option<String>,
}

impl Overrides {
    /// Layer flags over config file values.
    pub fn apply(self, mut config: PolicyConfig) -> PolicyConfig {
        if let Some(docs_dir) = self.docs_dir {
            config.docs_dir = docs_dir;
        }
        if let Some(max_children) = self.max_children {
            config.max_dir_children = max_children;
        }
        if let Some(max_lines) = self.max_lines {
            config.max_file_lines = max_lines;
        }
        config.line_limit_exempt.extend(self.exempt);
        if let Some(readme_name) = self.readme_name {
            config.readme_name = readme_name;
        }
        config
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    ok: bool,
    violations: &'a [Violation],
}

/// Text report: a summary line, then one violation per line.
pub fn render_text(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return "Documentation policy check passed.\n".to_string();
    }
    let mut out = format!(
        "Documentation policy violations found ({}):\n",
        violations.len()
    );
    for violation in violations {
        out.push_str(&violation.to_string());
        out.push('\n');
    }
    out
}

pub fn render_json(violations: &[Violation]) -> Result<String, Error> {
    let report = JsonReport {
        ok: violations.is_empty(),
        violations,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Run the check command. Returns whether the tree passed.
pub fn run(root: &Path, config: &PolicyConfig, format: OutputFormat) -> Result<bool, Error> {
    info!(root = %root.display(), docs_dir = %config.docs_dir.display(), "Checking docs policy");
    let tree = FsTree::new(root);
    let violations = policy::check_tree(&tree, config).map_err(|e| match e {
        Error::DocsRootNotFound(dir) => Error::DocsRootNotFound(tree.root().join(dir)),
        other => other,
    })?;

    match format {
        OutputFormat::Text => print!("{}", render_text(&violations)),
        OutputFormat::Json => println!("{}", render_json(&violations)?),
    }

    Ok(violations.is_empty())
}
