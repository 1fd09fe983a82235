//! Command-line interface definition
//!
//! - `rqcell transform` - wrap Cells in the configured wrapper
//! - `rqcell key` - print the cache key of a document
//! - `rqcell config` - validate and print the effective configuration
//! - `rqcell query` - run one operation against the configured endpoint

mod commands;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use commands::{Command, ConfigArgs, KeyArgs, QueryArgs, TransformArgs};
pub use validation::parse_variables;

/// rqcell - react-query backed Redwood Cells
#[derive(Parser, Debug)]
#[command(
    name = "rqcell",
    version,
    about = "Wrap Redwood Cells in withRQCell and inspect their queries",
    long_about = "rqcell rewrites Redwood Cell modules so their named exports are wrapped\n\
                  in withRQCell, and offers helpers to inspect cache keys, configuration\n\
                  and live query results."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to rqcell.toml or package.json
    ///
    /// Defaults to rqcell.toml in the current directory, then the
    /// `rqcell` field of package.json, then built-in defaults.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
