//! Query/mutation adapter
//!
//! [`QueryClient`] is the one adapter for queries and mutations. Requests
//! go through the injected [`Transport`], optionally augmented with the
//! headers of an injected [`AuthProvider`], and land in the [`QueryCache`].

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::auth::{AuthProvider, resolve_auth};
use crate::cache::{CacheEntry, QueryCache};
use crate::document::QueryDocument;
use crate::error::{CellError, Result};
use crate::key::{QueryKey, build_query_key};
use crate::result::{MutationResult, OperationResult, QueryState, QueryStatus};
use crate::transport::{Headers, Transport};
use crate::{DataObject, Variables};

/// Per-query options, the output of a Cell's `beforeQuery`
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub variables: Variables,
    /// Overrides the client default
    pub stale_time: Option<Duration>,
    /// When false, observing never sends a request
    pub enabled: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            variables: Variables::new(),
            stale_time: None,
            enabled: true,
        }
    }
}

impl QueryOptions {
    pub fn with_variables(variables: Variables) -> Self {
        Self {
            variables,
            ..Self::default()
        }
    }

    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = Some(stale_time);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

type SuccessCallback = Arc<dyn Fn(&DataObject) + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&CellError) + Send + Sync>;

/// Callbacks and cache effects of a mutation
#[derive(Clone, Default)]
pub struct MutationOptions {
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
    invalidates: Vec<QueryKey>,
}

impl MutationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, f: impl Fn(&DataObject) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&CellError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Invalidate `key` after every successful call
    pub fn invalidates(mut self, key: QueryKey) -> Self {
        self.invalidates.push(key);
        self
    }
}

impl fmt::Debug for MutationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationOptions")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("invalidates", &self.invalidates)
            .finish()
    }
}

/// How long an unused cache entry is kept before eviction
pub const DEFAULT_CACHE_TIME: Duration = Duration::from_secs(5 * 60);

struct ClientInner {
    transport: Arc<dyn Transport>,
    auth: Option<Arc<dyn AuthProvider>>,
    base_headers: Headers,
    stale_time: Duration,
    cache_time: Duration,
    cache: QueryCache,
}

/// Cheap to clone; clones share the cache
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<ClientInner>,
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("authenticated", &self.inner.auth.is_some())
            .field("base_headers", &self.inner.base_headers)
            .field("stale_time", &self.inner.stale_time)
            .field("cache_time", &self.inner.cache_time)
            .field("cached_queries", &self.inner.cache.len())
            .finish()
    }
}

pub struct QueryClientBuilder {
    transport: Arc<dyn Transport>,
    auth: Option<Arc<dyn AuthProvider>>,
    base_headers: Headers,
    stale_time: Duration,
    cache_time: Duration,
}

impl QueryClientBuilder {
    pub fn auth(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(provider);
        self
    }

    /// Headers sent with every request, before auth headers
    pub fn headers(mut self, headers: Headers) -> Self {
        self.base_headers = headers;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_headers.insert(name.into(), value.into());
        self
    }

    /// Default freshness window; zero means every observer refetches
    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// How long entries without observers stay cached
    pub fn cache_time(mut self, cache_time: Duration) -> Self {
        self.cache_time = cache_time;
        self
    }

    pub fn build(self) -> QueryClient {
        QueryClient {
            inner: Arc::new(ClientInner {
                transport: self.transport,
                auth: self.auth,
                base_headers: self.base_headers,
                stale_time: self.stale_time,
                cache_time: self.cache_time,
                cache: QueryCache::new(),
            }),
        }
    }
}

impl QueryClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::builder(transport).build()
    }

    pub fn builder(transport: Arc<dyn Transport>) -> QueryClientBuilder {
        QueryClientBuilder {
            transport,
            auth: None,
            base_headers: Headers::new(),
            stale_time: Duration::ZERO,
            cache_time: DEFAULT_CACHE_TIME,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    pub fn default_stale_time(&self) -> Duration {
        self.inner.stale_time
    }

    /// Prepare a query. Nothing is sent until the query is observed.
    ///
    /// Entries idle for longer than the cache time are evicted first.
    pub fn query(&self, document: &QueryDocument, options: QueryOptions) -> Query {
        self.inner.cache.evict_idle(self.inner.cache_time);
        let key = build_query_key(document, &options.variables);
        let stale_time = options.stale_time.unwrap_or(self.inner.stale_time);
        Query {
            client: self.clone(),
            key,
            document: document.clone(),
            variables: options.variables,
            stale_time,
            enabled: options.enabled,
        }
    }

    /// Prepare a mutation: a trigger to call it and a handle on its state
    pub fn mutate(
        &self,
        document: &QueryDocument,
        options: MutationOptions,
    ) -> (MutationTrigger, MutationState) {
        let state = MutationState {
            inner: Arc::new(RwLock::new(MutationResult::default())),
        };
        let trigger = MutationTrigger {
            client: self.clone(),
            document: document.clone(),
            options,
            state: state.clone(),
        };
        (trigger, state)
    }

    pub fn invalidate(&self, key: &QueryKey) -> bool {
        self.inner.cache.invalidate(key)
    }

    pub fn set_query_data(&self, key: &QueryKey, data: DataObject) {
        self.inner.cache.set_data(key, data);
    }

    pub fn get_query_data(&self, key: &QueryKey) -> Option<DataObject> {
        self.inner.cache.get_data(key)
    }

    /// Run one request: auth headers, transport, response shape check
    async fn execute(
        &self,
        document: &QueryDocument,
        variables: &Variables,
    ) -> Result<Option<DataObject>> {
        let mut headers = self.inner.base_headers.clone();
        if let Some(auth) = resolve_auth(self.inner.auth.as_deref()).await? {
            auth.apply(&mut headers);
        }

        match self
            .inner
            .transport
            .request(document, variables, &headers)
            .await?
        {
            Value::Object(data) => Ok(Some(data)),
            Value::Null => Ok(None),
            other => Err(CellError::UnexpectedResponse(format!(
                "expected `data` to be an object, got {other}"
            ))),
        }
    }

    /// Fetch into `entry` unless the data is fresh or another observer
    /// settled it while we waited. A failed entry is never fresh.
    async fn fetch(
        &self,
        key: &QueryKey,
        entry: &CacheEntry,
        document: &QueryDocument,
        variables: &Variables,
        stale_time: Duration,
        force: bool,
    ) {
        let requested_at = Instant::now();

        if !force {
            let state = entry.state();
            if state.is_fresh(stale_time) {
                debug!(key = %key, "cache hit");
                return;
            }
        }

        let _guard = entry.lock_fetch().await;
        if entry.settled_since(requested_at) {
            debug!(key = %key, "joined in-flight request");
            return;
        }

        entry.update(QueryState::begin_fetch);
        let outcome = self.execute(document, variables).await;
        if let Err(err) = &outcome {
            warn!(key = %key, error = %err, "query failed");
        }
        entry.update(|state| state.settle(outcome));
    }
}

/// A prepared query
pub struct Query {
    client: QueryClient,
    key: QueryKey,
    document: QueryDocument,
    variables: Variables,
    stale_time: Duration,
    enabled: bool,
}

impl Query {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn document(&self) -> &QueryDocument {
        &self.document
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Current normalized result, without sending anything
    pub fn snapshot(&self) -> OperationResult {
        let state = self.client.cache().get(&self.key).unwrap_or_default();
        self.normalize(&state)
    }

    /// Fetch unless fresh, then return the settled result
    pub async fn observe(&self) -> OperationResult {
        self.run(false).await
    }

    /// Fetch even when fresh
    pub async fn refetch(&self) -> OperationResult {
        self.run(true).await
    }

    /// Follow state changes of this query's cache entry
    pub fn subscribe(&self) -> QuerySubscription {
        let entry = self.client.cache().entry(&self.key);
        QuerySubscription {
            receiver: entry.subscribe(),
            variables: self.variables.clone(),
            stale_time: self.stale_time,
        }
    }

    async fn run(&self, force: bool) -> OperationResult {
        let entry = self.client.cache().entry(&self.key);
        if self.enabled {
            self.client
                .fetch(
                    &self.key,
                    &entry,
                    &self.document,
                    &self.variables,
                    self.stale_time,
                    force,
                )
                .await;
        }
        self.normalize(&entry.state())
    }

    fn normalize(&self, state: &QueryState) -> OperationResult {
        OperationResult::from_state(state, self.variables.clone(), self.stale_time)
    }
}

/// Receives normalized results whenever the cache entry changes
pub struct QuerySubscription {
    receiver: watch::Receiver<QueryState>,
    variables: Variables,
    stale_time: Duration,
}

impl QuerySubscription {
    pub fn current(&self) -> OperationResult {
        let state = self.receiver.borrow().clone();
        OperationResult::from_state(&state, self.variables.clone(), self.stale_time)
    }

    /// Wait for the next change; `None` once the cache entry is gone
    pub async fn changed(&mut self) -> Option<OperationResult> {
        self.receiver.changed().await.ok()?;
        let state = self.receiver.borrow_and_update().clone();
        Some(OperationResult::from_state(
            &state,
            self.variables.clone(),
            self.stale_time,
        ))
    }
}

/// Calls a mutation. Clones share the same state.
#[derive(Clone)]
pub struct MutationTrigger {
    client: QueryClient,
    document: QueryDocument,
    options: MutationOptions,
    state: MutationState,
}

impl MutationTrigger {
    pub async fn mutate(
        &self,
        variables: Variables,
    ) -> std::result::Result<Option<DataObject>, Arc<CellError>> {
        {
            let mut state = self.state.inner.write();
            state.loading = true;
            state.variables = Some(variables.clone());
        }

        let outcome = self.client.execute(&self.document, &variables).await;

        let mut state = self.state.inner.write();
        state.loading = false;
        match outcome {
            Ok(data) => {
                state.status = QueryStatus::Success;
                state.error = None;
                state.data = data.clone();
                drop(state);

                for key in &self.options.invalidates {
                    self.client.invalidate(key);
                }
                if let (Some(callback), Some(data)) = (&self.options.on_success, &data) {
                    callback(data);
                }
                Ok(data)
            }
            Err(err) => {
                let err = Arc::new(err);
                state.status = QueryStatus::Error;
                state.error = Some(Arc::clone(&err));
                drop(state);

                warn!(operation = ?self.document.operation_name(), error = %err, "mutation failed");
                if let Some(callback) = &self.options.on_error {
                    callback(&err);
                }
                Err(err)
            }
        }
    }
}

/// Read handle on a mutation's normalized state
#[derive(Debug, Clone)]
pub struct MutationState {
    inner: Arc<RwLock<MutationResult>>,
}

impl MutationState {
    pub fn snapshot(&self) -> MutationResult {
        self.inner.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.read().loading
    }
}
