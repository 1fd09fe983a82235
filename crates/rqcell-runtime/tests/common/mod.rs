//! In-memory transport and auth used by the runtime tests

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rqcell_runtime::{
    AuthProvider, BoxError, CellError, Headers, QueryDocument, Transport, Variables,
};
use serde_json::{Map, Value};

type Responder = dyn Fn(usize, &Variables) -> Result<Value, CellError> + Send + Sync;

/// Records every request and answers through a closure of (call index, variables)
pub struct MockTransport {
    calls: AtomicUsize,
    delay: Duration,
    seen_headers: Mutex<Vec<Headers>>,
    respond: Box<Responder>,
}

impl MockTransport {
    pub fn new(
        respond: impl Fn(usize, &Variables) -> Result<Value, CellError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            seen_headers: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    /// Always answers with `data`
    pub fn returning(data: Value) -> Arc<Self> {
        Self::new(move |_, _| Ok(data.clone()))
    }

    pub fn slow(
        delay: Duration,
        respond: impl Fn(usize, &Variables) -> Result<Value, CellError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay,
            seen_headers: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_headers(&self) -> Option<Headers> {
        self.seen_headers.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        _document: &QueryDocument,
        variables: &Variables,
        headers: &Headers,
    ) -> Result<Value, CellError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_headers.lock().push(headers.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.respond)(index, variables)
    }
}

/// Auth provider whose token fetch can be made to fail
pub struct MockAuth {
    pub authenticated: bool,
    pub token: Result<String, String>,
    pub token_calls: AtomicUsize,
}

impl MockAuth {
    pub fn with_token(token: &str) -> Arc<Self> {
        Arc::new(Self {
            authenticated: true,
            token: Ok(token.to_string()),
            token_calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            authenticated: true,
            token: Err(message.to_string()),
            token_calls: AtomicUsize::new(0),
        })
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self {
            authenticated: false,
            token: Ok("unused".to_string()),
            token_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn get_token(&self) -> Result<String, BoxError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        self.token.clone().map_err(BoxError::from)
    }

    fn provider_type(&self) -> &str {
        "dbAuth"
    }
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub fn doc(source: &str) -> QueryDocument {
    QueryDocument::parse(source).unwrap()
}
