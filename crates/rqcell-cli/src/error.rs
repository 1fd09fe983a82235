//! CLI error handling
//!
//! Library errors convert into [`CliError`] through `#[from]`; messages that
//! have an obvious fix carry a `Hint:` section. `main` turns the final error
//! into a [`miette::Report`] with [`cli_error_to_miette`].
//!
//! ```rust,no_run
//! use rqcell_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_document(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//!         .with_hint("Pass the path of a .graphql file")
//! }
//! ```

use std::path::PathBuf;

use miette::Report;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] rqcell_config::ConfigError),

    #[error("Transform error: {0}")]
    Transform(#[from] rqcell_transform::TransformError),

    #[error("{0}")]
    Cell(#[from] rqcell_runtime::CellError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `--check` found Cells that are not wrapped yet
    #[error("{count} file(s) would be rewritten\n\nHint: Run `rqcell transform --write` to wrap them")]
    CheckFailed { count: usize },

    #[error("{count} file(s) could not be transformed\n\nHint: Fix the syntax errors reported above")]
    TransformFailed { count: usize },

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Context helpers for `Result`
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`]
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{err}\n\nHint: {hint}"))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{msg}: {err}"))
        })
    }
}

/// Convert a CLI error into a miette report, moving hints into `help`
pub fn cli_error_to_miette(err: CliError) -> Report {
    let message = err.to_string();
    match message.split_once("\n\nHint: ") {
        Some((message, hint)) => miette::miette!(help = hint.to_string(), "{message}"),
        None => match err {
            CliError::FileNotFound(_) => {
                miette::miette!(help = "Check the path and try again", "{message}")
            }
            _ => miette::miette!("{message}"),
        },
    }
}
