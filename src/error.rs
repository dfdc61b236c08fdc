//! Error types for docguard.

use std::path::PathBuf;

use thiserror::Error;

/// Crate error type.
///
/// Policy violations are not errors; they are collected as data by the
/// checker. Everything here aborts the current command.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Missing docs directory: {}", .0.display())]
    DocsRootNotFound(PathBuf),

    #[error("Checklist file not found: {}", .0.display())]
    ChecklistNotFound(PathBuf),

    #[error("Failed to replace file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
