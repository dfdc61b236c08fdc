//! docguard library.
//!
//! Documentation tree policy checks and TODO checklist pruning.

pub mod cli;
pub mod config;
pub mod error;
pub mod policy;
pub mod todo;

pub use error::Error;
