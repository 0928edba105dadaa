//! Command-line interface
//!
//! Data goes to stdout (or `--output`), progress and summaries to stderr.

pub mod commands;
pub mod indexeddb;
pub mod sessions;

pub use commands::{Cli, Commands, run};
