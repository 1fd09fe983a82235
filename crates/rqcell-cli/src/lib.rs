//! rqcell CLI
//!
//! - [`error`] - CLI errors with hints, converted to miette reports in `main`
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines on stderr
//! - [`commands`] - `transform`, `key`, `config` and `query`
//!
//! Data (transformed code, keys, config, query results) goes to stdout;
//! logs and status lines go to stderr.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
