//! Application-level wiring of fetch config, auth and the query client

use std::sync::Arc;
use std::time::Duration;

use rqcell_config::ClientSettings;

use crate::auth::AuthProvider;
use crate::client::{DEFAULT_CACHE_TIME, QueryClient};
use crate::transport::{FetchConfig, Transport};

/// Builds the [`QueryClient`] every Cell of an application shares
///
/// ```no_run
/// use rqcell_runtime::{CellProvider, FetchConfig};
///
/// # fn main() -> Result<(), rqcell_runtime::CellError> {
/// let client = CellProvider::new(FetchConfig::new("https://api.example.com/graphql"))
///     .client()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CellProvider {
    fetch_config: FetchConfig,
    auth: Option<Arc<dyn AuthProvider>>,
    stale_time: Duration,
    cache_time: Duration,
}

impl CellProvider {
    pub fn new(fetch_config: FetchConfig) -> Self {
        Self {
            fetch_config,
            auth: None,
            stale_time: Duration::ZERO,
            cache_time: DEFAULT_CACHE_TIME,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(FetchConfig::from(settings))
            .with_stale_time(settings.stale_time())
            .with_cache_time(settings.cache_time())
    }

    pub fn with_auth(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(provider);
        self
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn with_cache_time(mut self, cache_time: Duration) -> Self {
        self.cache_time = cache_time;
        self
    }

    pub fn fetch_config(&self) -> &FetchConfig {
        &self.fetch_config
    }

    /// Client over any transport; the fetch config headers become base headers
    pub fn client_with_transport(&self, transport: Arc<dyn Transport>) -> QueryClient {
        let mut builder = QueryClient::builder(transport)
            .headers(self.fetch_config.headers.clone())
            .stale_time(self.stale_time)
            .cache_time(self.cache_time);
        if let Some(auth) = &self.auth {
            builder = builder.auth(Arc::clone(auth));
        }
        builder.build()
    }

    /// Client over HTTP to the configured URI
    #[cfg(feature = "http")]
    pub fn client(&self) -> crate::error::Result<QueryClient> {
        let transport = crate::http::HttpTransport::new(self.fetch_config.uri.clone())?;
        Ok(self.client_with_transport(Arc::new(transport)))
    }
}

impl std::fmt::Debug for CellProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellProvider")
            .field("fetch_config", &self.fetch_config)
            .field("auth", &self.auth.as_ref().map(|a| a.provider_type().to_string()))
            .field("stale_time", &self.stale_time)
            .field("cache_time", &self.cache_time)
            .finish()
    }
}
