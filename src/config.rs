//! Configuration for docguard.
//!
//! Handles loading `docguard.toml` from the repository root. Every field has
//! a default, so a missing file or a partial file is fine.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

/// Default config file name, looked up in the repository root.
pub const CONFIG_FILE_NAME: &str = "docguard.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Documentation tree policy.
    #[serde(default)]
    pub docs: PolicyConfig,

    /// Checklist pruning.
    #[serde(default)]
    pub todo: TodoConfig,
}

/// Limits and names enforced by the docs policy checker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    /// Docs root, relative to the repository root.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,

    /// Maximum non-hidden direct children per directory.
    #[serde(default = "default_max_dir_children")]
    pub max_dir_children: usize,

    /// Maximum lines per Markdown file.
    #[serde(default = "default_max_file_lines")]
    pub max_file_lines: usize,

    /// Repo-root-relative paths exempt from the line limit.
    #[serde(default)]
    pub line_limit_exempt: BTreeSet<String>,

    /// File every directory must contain exactly once.
    #[serde(default = "default_readme_name")]
    pub readme_name: String,
}

/// Checklist pruning settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoConfig {
    /// Checklist path, relative to the repository root.
    #[serde(default = "default_todo_path")]
    pub path: PathBuf,
}

// Default value functions
fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_max_dir_children() -> usize {
    12
}

fn default_max_file_lines() -> usize {
    200
}

fn default_readme_name() -> String {
    "README.md".to_string()
}

fn default_todo_path() -> PathBuf {
    PathBuf::from("TODO.md")
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            max_dir_children: default_max_dir_children(),
            max_file_lines: default_max_file_lines(),
            line_limit_exempt: BTreeSet::new(),
            readme_name: default_readme_name(),
        }
    }
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            path: default_todo_path(),
        }
    }
}

impl Config {
    /// Default config file path for a repository.
    pub fn path(repo_root: &Path) -> PathBuf {
        repo_root.join(CONFIG_FILE_NAME)
    }

    /// Load config from an explicit file, or from the repository root.
    ///
    /// An explicit path must exist and, like every other path docguard
    /// takes, is relative to `repo_root`. The implicit one falls back to
    /// defaults.
    pub fn load(repo_root: &Path, explicit: Option<&Path>) -> Result<Self, Error> {
        let config_path = match explicit {
            Some(path) => repo_root.join(path),
            None => {
                let path = Self::path(repo_root);
                if !path.exists() {
                    debug!(path = %path.display(), "No config file, using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content).map_err(|e| Error::Config {
            path: config_path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %config_path.display(), "Loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.docs.docs_dir, PathBuf::from("docs"));
        assert_eq!(config.docs.max_dir_children, 12);
        assert_eq!(config.docs.max_file_lines, 200);
        assert_eq!(config.docs.readme_name, "README.md");
        assert!(config.docs.line_limit_exempt.is_empty());
        assert_eq!(config.todo.path, PathBuf::from("TODO.md"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path(), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            Config::path(dir.path()),
            "[docs]\nmax_file_lines = 300\nline_limit_exempt = [\"docs/big.md\"]\n",
        )
        .unwrap();

        let config = Config::load(dir.path(), None).unwrap();
        assert_eq!(config.docs.max_file_lines, 300);
        assert_eq!(config.docs.max_dir_children, 12);
        assert!(config.docs.line_limit_exempt.contains("docs/big.md"));
        assert_eq!(config.todo.path, PathBuf::from("TODO.md"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(dir.path(), Some(missing.as_path())),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_explicit_relative_path_resolves_against_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("ci")).unwrap();
        fs::write(
            dir.path().join("ci/docguard.toml"),
            "[todo]\npath = \"notes/TODO.md\"\n",
        )
        .unwrap();

        let config = Config::load(dir.path(), Some(Path::new("ci/docguard.toml"))).unwrap();
        assert_eq!(config.todo.path, PathBuf::from("notes/TODO.md"));

        let absolute = dir.path().join("ci/docguard.toml");
        let config = Config::load(Path::new("unused-root"), Some(absolute.as_path())).unwrap();
        assert_eq!(config.todo.path, PathBuf::from("notes/TODO.md"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(Config::path(dir.path()), "[docs\nmax_file_lines = ").unwrap();
        assert!(matches!(
            Config::load(dir.path(), None),
            Err(Error::Config { .. })
        ));
    }
}
