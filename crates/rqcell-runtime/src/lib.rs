//! Runtime half of rqcell: a react-query style adapter for Redwood Cells
//!
//! * [`QueryClient`] runs queries and mutations through an injected
//!   [`Transport`], adds auth headers from an optional [`AuthProvider`] and
//!   keeps results in a [`QueryCache`] keyed by [`QueryKey`].
//! * [`Cell`] is `withRQCell`: it maps each [`OperationResult`] to exactly
//!   one of the Failure, Loading, Fetching, Empty and Success slots.
//! * [`CellProvider`] wires a fetch config and auth into a client.
//!
//! ```no_run
//! use rqcell_runtime::{Cell, CellProvider, FetchConfig, Props, QueryDocument, SlotProps};
//!
//! # async fn run() -> Result<(), rqcell_runtime::CellError> {
//! let client = CellProvider::new(FetchConfig::new("/graphql")).client()?;
//! let cell = Cell::builder(QueryDocument::parse("query Posts { posts { id } }")?)
//!     .success(|p: SlotProps| format!("{} posts", p.fields["posts"].as_array().map_or(0, Vec::len)))
//!     .build()?;
//! let html: String = cell.render(&client, &Props::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cache;
pub mod cell;
pub mod client;
pub mod document;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod key;
pub mod provider;
pub mod result;
pub mod transport;

/// GraphQL variables
pub type Variables = serde_json::Map<String, serde_json::Value>;
/// The `data` object of a GraphQL response
pub type DataObject = serde_json::Map<String, serde_json::Value>;
/// Props a Cell is rendered with
pub type Props = serde_json::Map<String, serde_json::Value>;

pub use auth::{
    AUTH_PROVIDER_HEADER, AUTHORIZATION_HEADER, AuthHeaders, AuthProvider, StaticTokenAuth,
    resolve_auth,
};
pub use cache::{CacheEntry, QueryCache};
pub use cell::{Cell, CellBuilder, CellState, Placeholder, QuerySource, SlotProps, is_empty};
pub use client::{
    DEFAULT_CACHE_TIME, MutationOptions, MutationState, MutationTrigger, Query, QueryClient, QueryClientBuilder,
    QueryOptions, QuerySubscription,
};
pub use document::{OperationKind, QueryDocument};
pub use error::{BoxError, CellError, Result};
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use key::{QueryKey, build_query_key};
pub use provider::CellProvider;
pub use result::{MutationResult, OperationResult, QueryState, QueryStatus};
pub use transport::{FetchConfig, GraphQLRequest, GraphQLResponse, Headers, Transport};
