//! Runtime error types

use std::sync::Arc;

use thiserror::Error;

/// Boxed error returned by injected capabilities such as token fetches
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, CellError>;

/// Errors raised while fetching or rendering a Cell
#[derive(Debug, Error)]
pub enum CellError {
    /// Transport rejected the request
    #[error("transport failed: {0}")]
    Transport(String),

    /// Server answered with a non-empty `errors` array
    #[error("GraphQL request failed: {}", messages.join("; "))]
    GraphQL { messages: Vec<String> },

    /// Server answered with a non-success status
    #[error("server responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Token fetch failed; the request was not sent
    #[error("failed to get auth token from provider '{provider}': {source}")]
    Auth {
        provider: String,
        #[source]
        source: BoxError,
    },

    #[error("Cannot render cell: GraphQL success but `data` is null")]
    NullData,

    #[error("invalid GraphQL document: {0}")]
    InvalidDocument(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("cell is missing the mandatory `{0}` slot")]
    MissingSlot(&'static str),

    /// A cached failure re-raised by a Cell without a Failure slot
    #[error(transparent)]
    Query(Arc<CellError>),

    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl CellError {
    pub fn transport(message: impl Into<String>) -> Self {
        CellError::Transport(message.into())
    }

    pub fn auth(provider: impl Into<String>, source: impl Into<BoxError>) -> Self {
        CellError::Auth {
            provider: provider.into(),
            source: source.into(),
        }
    }
}
