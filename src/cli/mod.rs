//! CLI commands for docguard.

pub mod check;
pub mod prune;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// docguard - documentation policy checker and TODO pruner
#[derive(Parser)]
#[command(name = "docguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Repository root
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Config file, relative to the repository root (default: docguard.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the documentation tree against the docs policy
    Check {
        /// Docs directory, relative to the repository root
        #[arg(long)]
        docs_dir: Option<PathBuf>,

        /// Maximum non-hidden children per directory
        #[arg(long)]
        max_children: Option<usize>,

        /// Maximum lines per Markdown file
        #[arg(long)]
        max_lines: Option<usize>,

        /// Repo-relative file exempt from the line limit (repeatable)
        #[arg(long = "exempt", value_name = "PATH")]
        exempt: Vec<String>,

        /// File every directory must contain exactly once
        #[arg(long)]
        readme_name: Option<String>,

        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Remove completed items from a checklist file
    Prune {
        /// Checklist file (defaults to TODO.md)
        path: Option<PathBuf>,

        /// Only report whether the file would change
        #[arg(long)]
        check: bool,
    },
}

/// Violation report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
