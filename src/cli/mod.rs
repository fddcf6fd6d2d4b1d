//! CLI module for flatorm
//!
//! Provides command-line interface for:
//! - init: Write a default config and create the backing store
//! - save: Insert or replace one record
//! - query: Resolve an equality filter into the results file
//! - demo: Seed and query the demonstration users

mod args;
mod commands;
mod errors;

pub use args::{parse_assignment, Cli, Command};
pub use commands::{demo, init, query, run, run_command, save};
pub use errors::{CliError, CliErrorCode, CliResult};
