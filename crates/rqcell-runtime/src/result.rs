//! Query state and the normalized operation result

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::CellError;
use crate::{DataObject, Variables};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    /// Never fetched
    #[default]
    Idle,
    /// First fetch in flight, no data yet
    Loading,
    Success,
    Error,
}

/// State of one cache entry
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub status: QueryStatus,
    /// `None` after a successful fetch means the server returned `data: null`
    pub data: Option<DataObject>,
    pub error: Option<Arc<CellError>>,
    pub data_updated_at: Option<SystemTime>,
    /// When the last fetch settled, successfully or not
    pub settled_at: Option<Instant>,
    pub is_fetching: bool,
    pub is_invalidated: bool,
    pub fetch_count: u32,
}

impl QueryState {
    /// Data present, no failure, not invalidated and younger than `stale_time`
    pub fn is_fresh(&self, stale_time: Duration) -> bool {
        if self.data.is_none() || self.error.is_some() || self.is_invalidated {
            return false;
        }
        self.settled_at
            .is_some_and(|at| at.elapsed() < stale_time)
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.is_fetching = true;
        if self.data.is_none() {
            self.status = QueryStatus::Loading;
            self.error = None;
        }
    }

    pub(crate) fn settle(&mut self, outcome: Result<Option<DataObject>, CellError>) {
        self.is_fetching = false;
        self.is_invalidated = false;
        self.fetch_count += 1;
        self.settled_at = Some(Instant::now());
        match outcome {
            Ok(data) => {
                self.status = QueryStatus::Success;
                self.data = data;
                self.error = None;
                self.data_updated_at = Some(SystemTime::now());
            }
            Err(error) => {
                self.status = QueryStatus::Error;
                self.error = Some(Arc::new(error));
            }
        }
    }

    pub(crate) fn seed(&mut self, data: DataObject) {
        self.status = QueryStatus::Success;
        self.data = Some(data);
        self.error = None;
        self.is_invalidated = false;
        self.settled_at = Some(Instant::now());
        self.data_updated_at = Some(SystemTime::now());
    }
}

/// What a Cell sees: `loading`, `fetching`, `error`, `data`, `variables`
/// plus the ancillary "rest" fields.
#[derive(Debug, Clone)]
pub struct OperationResult {
    /// Pending with no data and no error
    pub loading: bool,
    /// Background refetch over existing data
    pub fetching: bool,
    pub error: Option<Arc<CellError>>,
    pub data: Option<DataObject>,
    pub variables: Variables,
    pub status: QueryStatus,
    pub is_stale: bool,
    pub data_updated_at: Option<SystemTime>,
}

impl OperationResult {
    pub fn from_state(state: &QueryState, variables: Variables, stale_time: Duration) -> Self {
        let pending = matches!(state.status, QueryStatus::Idle | QueryStatus::Loading);
        Self {
            loading: pending && state.data.is_none() && state.error.is_none(),
            fetching: state.is_fetching && state.data.is_some(),
            error: state.error.clone(),
            data: state.data.clone(),
            variables,
            status: state.status,
            is_stale: !state.is_fresh(stale_time),
            data_updated_at: state.data_updated_at,
        }
    }

    /// Ancillary fields handed to render slots next to the props
    pub fn rest_fields(&self) -> Map<String, Value> {
        let mut rest = Map::new();
        rest.insert("variables".into(), Value::Object(self.variables.clone()));
        rest.insert("status".into(), json!(self.status));
        rest.insert("isStale".into(), Value::Bool(self.is_stale));
        rest.insert(
            "dataUpdatedAt".into(),
            self.data_updated_at
                .map_or(Value::Null, |at| json!(epoch_millis(at))),
        );
        rest
    }

    /// Whole result as JSON, errors rendered as their message
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("loading".into(), Value::Bool(self.loading));
        out.insert("fetching".into(), Value::Bool(self.fetching));
        out.insert(
            "error".into(),
            self.error
                .as_ref()
                .map_or(Value::Null, |e| Value::String(e.to_string())),
        );
        out.insert(
            "data".into(),
            self.data.clone().map_or(Value::Null, Value::Object),
        );
        out.extend(self.rest_fields());
        Value::Object(out)
    }
}

/// Normalized state of a mutation
#[derive(Debug, Clone, Default)]
pub struct MutationResult {
    /// A call is in flight
    pub loading: bool,
    pub status: QueryStatus,
    pub error: Option<Arc<CellError>>,
    pub data: Option<DataObject>,
    pub variables: Option<Variables>,
}

fn epoch_millis(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
