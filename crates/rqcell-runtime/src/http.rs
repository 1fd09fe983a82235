//! GraphQL over HTTP, backed by reqwest

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::debug;

use crate::Variables;
use crate::document::QueryDocument;
use crate::error::{CellError, Result};
use crate::transport::{GraphQLRequest, GraphQLResponse, Headers, Transport};

const USER_AGENT_VALUE: &str = concat!("rqcell/", env!("CARGO_PKG_VERSION"));

/// Posts `{ query, variables, operationName }` to a GraphQL endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    uri: String,
}

impl HttpTransport {
    pub fn new(uri: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CellError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, uri))
    }

    /// Use a preconfigured client (proxies, TLS roots, ...)
    pub fn with_client(client: reqwest::Client, uri: impl Into<String>) -> Self {
        Self {
            client,
            uri: uri.into(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        document: &QueryDocument,
        variables: &Variables,
        headers: &Headers,
    ) -> Result<Value> {
        debug!(uri = %self.uri, operation = ?document.operation_name(), "sending GraphQL request");

        let mut request = self
            .client
            .post(&self.uri)
            .header(CONTENT_TYPE, "application/json")
            .json(&GraphQLRequest::new(document, variables));
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CellError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GraphQLResponse = response.json().await?;
        payload.into_data()
    }
}
