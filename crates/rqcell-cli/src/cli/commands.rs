use clap::{Args, Subcommand};
use rqcell_runtime::Variables;
use std::path::PathBuf;

use crate::cli::validation::parse_variables;

/// Available rqcell subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Wrap Cell modules in withRQCell
    ///
    /// Walks the given files and directories, skipping excluded path
    /// segments and files whose extension is not configured. Modules that
    /// are not Cells are never touched.
    Transform(TransformArgs),

    /// Print the cache key of a GraphQL document
    Key(KeyArgs),

    /// Validate and print the effective configuration
    Config(ConfigArgs),

    /// Run one operation against the configured GraphQL endpoint
    ///
    /// Prints the normalized result (loading, fetching, error, data,
    /// variables, status, isStale, dataUpdatedAt) as JSON.
    Query(QueryArgs),
}

/// Arguments for the transform command
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Files or directories to transform
    ///
    /// Examples:
    ///   rqcell transform web/src/components
    ///   rqcell transform web/src/components/PostsCell/PostsCell.js
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Rewrite Cells in place
    #[arg(short, long, conflicts_with_all = ["out_dir", "check"])]
    pub write: bool,

    /// Write transformed Cells below this directory, keeping relative paths
    #[arg(short, long, value_name = "DIR", conflicts_with = "check")]
    pub out_dir: Option<PathBuf>,

    /// Exit with an error if any file would be rewritten
    #[arg(long)]
    pub check: bool,
}

/// Arguments for the key command
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// File containing the GraphQL document
    #[arg(value_name = "DOCUMENT_FILE")]
    pub document: PathBuf,

    /// Variables as a JSON object
    #[arg(long, value_name = "JSON", value_parser = parse_variables)]
    pub variables: Option<Variables>,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub show: bool,
}

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// File containing the GraphQL document
    #[arg(value_name = "DOCUMENT_FILE")]
    pub document: PathBuf,

    /// Variables as a JSON object
    #[arg(long, value_name = "JSON", value_parser = parse_variables)]
    pub variables: Option<Variables>,

    /// Bearer token sent with the request
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Value of the auth-provider header when a token is given
    #[arg(long, value_name = "TYPE", default_value = "custom")]
    pub auth_provider: String,
}
