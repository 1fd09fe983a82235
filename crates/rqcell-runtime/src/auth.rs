//! Authentication augmentation
//!
//! When an [`AuthProvider`] reports an authenticated session, every request
//! carries two extra headers:
//!
//! ```text
//! auth-provider: <provider type>
//! authorization: Bearer <token>
//! ```
//!
//! A failed token fetch fails the request; it is never sent without them.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{BoxError, CellError, Result};
use crate::transport::Headers;

pub const AUTH_PROVIDER_HEADER: &str = "auth-provider";
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Session and token source, injected by the application
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// Fetch a token for the current session. May suspend.
    async fn get_token(&self) -> std::result::Result<String, BoxError>;

    /// Provider identifier sent in the `auth-provider` header
    fn provider_type(&self) -> &str;
}

/// Token and provider type for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub provider_type: String,
    pub token: String,
}

impl AuthHeaders {
    pub fn apply(&self, headers: &mut Headers) {
        headers.insert(AUTH_PROVIDER_HEADER.to_string(), self.provider_type.clone());
        headers.insert(
            AUTHORIZATION_HEADER.to_string(),
            format!("Bearer {}", self.token),
        );
    }
}

/// Ask the provider for headers; `None` when no session is active.
/// Calls `get_token` at most once.
pub async fn resolve_auth(provider: Option<&dyn AuthProvider>) -> Result<Option<AuthHeaders>> {
    let Some(provider) = provider else {
        return Ok(None);
    };
    if !provider.is_authenticated() {
        debug!(provider = provider.provider_type(), "no active session");
        return Ok(None);
    }

    let token = provider
        .get_token()
        .await
        .map_err(|source| CellError::auth(provider.provider_type(), source))?;

    Ok(Some(AuthHeaders {
        provider_type: provider.provider_type().to_string(),
        token,
    }))
}

/// Provider backed by a fixed token, authenticated whenever a token is set
#[derive(Debug, Clone)]
pub struct StaticTokenAuth {
    provider_type: String,
    token: Option<String>,
}

impl StaticTokenAuth {
    pub fn new(provider_type: impl Into<String>, token: Option<String>) -> Self {
        Self {
            provider_type: provider_type.into(),
            token,
        }
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    async fn get_token(&self) -> std::result::Result<String, BoxError> {
        self.token
            .clone()
            .ok_or_else(|| BoxError::from("no token configured"))
    }

    fn provider_type(&self) -> &str {
        &self.provider_type
    }
}
