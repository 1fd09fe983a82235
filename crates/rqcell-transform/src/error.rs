//! Error types for Cell transformation

use std::path::PathBuf;

use rqcell_gen::GenError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransformError>;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to parse {}: {}", path.display(), diagnostics.join(", "))]
    Parse {
        path: PathBuf,
        diagnostics: Vec<String>,
    },

    #[error("failed to emit wrapper for {}: {source}", path.display())]
    Emit {
        path: PathBuf,
        #[source]
        source: GenError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TransformError {
    pub(crate) fn from_gen(path: PathBuf, err: GenError) -> Self {
        match err {
            GenError::ParseFailed { diagnostics } => TransformError::Parse { path, diagnostics },
            other => TransformError::Emit {
                path,
                source: other,
            },
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            TransformError::Parse { path, .. }
            | TransformError::Emit { path, .. }
            | TransformError::Io { path, .. } => path,
        }
    }
}
