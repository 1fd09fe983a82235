//! Network boundary
//!
//! A [`Transport`] sends one GraphQL operation and returns the `data` member
//! of the response. Everything else in the runtime is transport-agnostic, so
//! tests inject an in-memory implementation.

use async_trait::async_trait;
use indexmap::IndexMap;
use rqcell_config::ClientSettings;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Variables;
use crate::document::QueryDocument;
use crate::error::{CellError, Result};

/// Request headers, in insertion order
pub type Headers = IndexMap<String, String>;

/// Sends GraphQL operations
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one operation with the given headers and return its `data`
    async fn request(
        &self,
        document: &QueryDocument,
        variables: &Variables,
        headers: &Headers,
    ) -> Result<Value>;
}

/// Endpoint and base headers shared by every request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    pub uri: String,
    #[serde(default)]
    pub headers: Headers,
}

impl FetchConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            headers: Headers::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

impl From<&ClientSettings> for FetchConfig {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            uri: settings.uri.clone(),
            headers: settings.headers.clone(),
        }
    }
}

/// JSON body of a GraphQL-over-HTTP request
#[derive(Debug, Serialize)]
pub struct GraphQLRequest<'a> {
    pub query: &'a str,
    pub variables: &'a Variables,
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<&'a str>,
}

impl<'a> GraphQLRequest<'a> {
    pub fn new(document: &'a QueryDocument, variables: &'a Variables) -> Self {
        Self {
            query: document.source(),
            variables,
            operation_name: document.operation_name(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GraphQLErrorMessage {
    pub message: String,
}

/// JSON body of a GraphQL response
#[derive(Debug, Default, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQLErrorMessage>>,
}

impl GraphQLResponse {
    /// `data`, or the error messages when the `errors` array is non-empty
    pub fn into_data(self) -> Result<Value> {
        match self.errors {
            Some(errors) if !errors.is_empty() => Err(CellError::GraphQL {
                messages: errors.into_iter().map(|e| e.message).collect(),
            }),
            _ => Ok(self.data.unwrap_or(Value::Null)),
        }
    }
}
