//! `withRQCell`: the rendering adapter
//!
//! A [`Cell`] binds a query to rendering slots and picks exactly one slot
//! for every result, in priority order:
//!
//! 1. error → `Failure` (or the error is returned when there is no Failure slot)
//! 2. loading → `Loading`
//! 3. fetching → `Fetching`
//! 4. data → `afterQuery`, then `Empty` when supplied and the first field is
//!    null or an empty array, else `Success`
//! 5. none of the above → [`CellError::NullData`]
//!
//! Slots receive [`SlotProps`]; for Success the fields are the sanitized data,
//! then the rest fields of the result, then the props (later wins).

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::client::{QueryClient, QueryOptions};
use crate::document::QueryDocument;
use crate::error::{CellError, Result};
use crate::key::{QueryKey, build_query_key};
use crate::result::OperationResult;
use crate::{DataObject, Props};

/// What a slot is called with
#[derive(Debug, Clone, Default)]
pub struct SlotProps {
    /// Set for the Failure slot only
    pub error: Option<Arc<CellError>>,
    pub fields: Map<String, Value>,
}

impl SlotProps {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Output types with a default Loading/Fetching rendering
pub trait Placeholder {
    fn placeholder(text: &'static str) -> Self;
}

impl Placeholder for String {
    fn placeholder(text: &'static str) -> Self {
        text.to_string()
    }
}

pub const LOADING_PLACEHOLDER: &str = "Loading...";
pub const FETCHING_PLACEHOLDER: &str = "Fetching...";

pub type Slot<R> = Arc<dyn Fn(SlotProps) -> R + Send + Sync>;
pub type BeforeQuery = Arc<dyn Fn(&Props) -> QueryOptions + Send + Sync>;
pub type AfterQuery = Arc<dyn Fn(DataObject) -> DataObject + Send + Sync>;
pub type DocumentFn = Arc<dyn Fn(&QueryOptions) -> Result<QueryDocument> + Send + Sync>;

/// The `QUERY` export: a document, or a function of the query options
#[derive(Clone)]
pub enum QuerySource {
    Document(QueryDocument),
    Dynamic(DocumentFn),
}

impl QuerySource {
    pub fn dynamic(f: impl Fn(&QueryOptions) -> Result<QueryDocument> + Send + Sync + 'static) -> Self {
        QuerySource::Dynamic(Arc::new(f))
    }

    pub fn resolve(&self, options: &QueryOptions) -> Result<QueryDocument> {
        match self {
            QuerySource::Document(document) => Ok(document.clone()),
            QuerySource::Dynamic(f) => f(options),
        }
    }
}

impl From<QueryDocument> for QuerySource {
    fn from(document: QueryDocument) -> Self {
        QuerySource::Document(document)
    }
}

impl fmt::Debug for QuerySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuerySource::Document(document) => f.debug_tuple("Document").field(document).finish(),
            QuerySource::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// The single render state of a result
#[derive(Debug, Clone)]
pub enum CellState {
    Failure(Arc<CellError>),
    Loading,
    Fetching,
    Empty,
    /// Sanitized data
    Success(DataObject),
}

impl CellState {
    /// Resolve the state of `result`. `after_query` is applied to data;
    /// `Empty` is only produced when `has_empty` is set.
    pub fn from_result(
        result: &OperationResult,
        after_query: &dyn Fn(DataObject) -> DataObject,
        has_empty: bool,
    ) -> Result<CellState> {
        match (&result.error, result.loading, result.fetching, &result.data) {
            (Some(error), _, _, _) => Ok(CellState::Failure(Arc::clone(error))),
            (None, true, _, _) => Ok(CellState::Loading),
            (None, false, true, _) => Ok(CellState::Fetching),
            (None, false, false, Some(data)) => {
                let data = after_query(data.clone());
                if has_empty && is_empty(&data) {
                    Ok(CellState::Empty)
                } else {
                    Ok(CellState::Success(data))
                }
            }
            (None, false, false, None) => Err(CellError::NullData),
        }
    }
}

/// First field null or an empty array. Later fields are not inspected.
pub fn is_empty(data: &DataObject) -> bool {
    match data.values().next() {
        Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

/// A Cell: query plus rendering slots
pub struct Cell<R> {
    query: QuerySource,
    before_query: BeforeQuery,
    after_query: AfterQuery,
    loading: Slot<R>,
    fetching: Slot<R>,
    failure: Option<Slot<R>>,
    empty: Option<Slot<R>>,
    success: Slot<R>,
}

impl<R> Clone for Cell<R> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            before_query: Arc::clone(&self.before_query),
            after_query: Arc::clone(&self.after_query),
            loading: Arc::clone(&self.loading),
            fetching: Arc::clone(&self.fetching),
            failure: self.failure.clone(),
            empty: self.empty.clone(),
            success: Arc::clone(&self.success),
        }
    }
}

impl<R> fmt::Debug for Cell<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("query", &self.query)
            .field("failure", &self.failure.is_some())
            .field("empty", &self.empty.is_some())
            .finish_non_exhaustive()
    }
}

impl<R> Cell<R> {
    pub fn builder(query: impl Into<QuerySource>) -> CellBuilder<R> {
        CellBuilder {
            query: query.into(),
            before_query: None,
            after_query: None,
            loading: None,
            fetching: None,
            failure: None,
            empty: None,
            success: None,
        }
    }

    /// Query options for `props`, as `beforeQuery` computes them
    pub fn query_options(&self, props: &Props) -> QueryOptions {
        (self.before_query)(props)
    }

    /// Cache key the Cell uses for `props`
    pub fn query_key(&self, props: &Props) -> Result<QueryKey> {
        let options = self.query_options(props);
        let document = self.query.resolve(&options)?;
        Ok(build_query_key(&document, &options.variables))
    }

    /// Pick and call the slot for `result`. Pure.
    pub fn render_result(&self, props: &Props, result: &OperationResult) -> Result<R> {
        let state = CellState::from_result(result, &*self.after_query, self.empty.is_some())?;
        let rest = result.rest_fields();

        match state {
            CellState::Failure(error) => match &self.failure {
                Some(failure) => Ok(failure(SlotProps {
                    error: Some(error),
                    fields: merge([&rest, props]),
                })),
                None => Err(CellError::Query(error)),
            },
            CellState::Loading => Ok((self.loading)(SlotProps {
                error: None,
                fields: merge([&rest, props]),
            })),
            CellState::Fetching => Ok((self.fetching)(SlotProps {
                error: None,
                fields: merge([&rest, props]),
            })),
            CellState::Empty => match &self.empty {
                Some(empty) => Ok(empty(SlotProps {
                    error: None,
                    fields: merge([&rest, props]),
                })),
                None => Err(CellError::MissingSlot("Empty")),
            },
            CellState::Success(data) => Ok((self.success)(SlotProps {
                error: None,
                fields: merge([&data, &rest, props]),
            })),
        }
    }

    /// Mount: run `beforeQuery`, resolve the document, fetch, render
    pub async fn render(&self, client: &QueryClient, props: &Props) -> Result<R> {
        let options = self.query_options(props);
        let document = self.query.resolve(&options)?;
        let query = client.query(&document, options);
        debug!(key = %query.key(), "rendering cell");
        let result = query.observe().await;
        self.render_result(props, &result)
    }

    /// Render the cached state without sending anything
    pub fn render_snapshot(&self, client: &QueryClient, props: &Props) -> Result<R> {
        let options = self.query_options(props);
        let document = self.query.resolve(&options)?;
        let result = client.query(&document, options).snapshot();
        self.render_result(props, &result)
    }
}

fn merge<const N: usize>(sources: [&Map<String, Value>; N]) -> Map<String, Value> {
    let mut out = Map::new();
    for source in sources {
        for (key, value) in source {
            out.insert(key.clone(), value.clone());
        }
    }
    out
}

/// Builder mirroring the named exports of a Cell module
pub struct CellBuilder<R> {
    query: QuerySource,
    before_query: Option<BeforeQuery>,
    after_query: Option<AfterQuery>,
    loading: Option<Slot<R>>,
    fetching: Option<Slot<R>>,
    failure: Option<Slot<R>>,
    empty: Option<Slot<R>>,
    success: Option<Slot<R>>,
}

impl<R: Placeholder + 'static> CellBuilder<R> {
    /// Defaults: variables are the props, data passes through unchanged,
    /// Loading/Fetching render a placeholder.
    pub fn build(self) -> Result<Cell<R>> {
        let success = self.success.ok_or(CellError::MissingSlot("Success"))?;
        Ok(Cell {
            query: self.query,
            before_query: self
                .before_query
                .unwrap_or_else(|| Arc::new(|props: &Props| QueryOptions::with_variables(props.clone()))),
            after_query: self.after_query.unwrap_or_else(|| Arc::new(|data: DataObject| data)),
            loading: self
                .loading
                .unwrap_or_else(|| Arc::new(|_: SlotProps| R::placeholder(LOADING_PLACEHOLDER))),
            fetching: self
                .fetching
                .unwrap_or_else(|| Arc::new(|_: SlotProps| R::placeholder(FETCHING_PLACEHOLDER))),
            failure: self.failure,
            empty: self.empty,
            success,
        })
    }
}

impl<R> CellBuilder<R> {
    pub fn before_query(mut self, f: impl Fn(&Props) -> QueryOptions + Send + Sync + 'static) -> Self {
        self.before_query = Some(Arc::new(f));
        self
    }

    pub fn after_query(mut self, f: impl Fn(DataObject) -> DataObject + Send + Sync + 'static) -> Self {
        self.after_query = Some(Arc::new(f));
        self
    }

    pub fn loading(mut self, f: impl Fn(SlotProps) -> R + Send + Sync + 'static) -> Self {
        self.loading = Some(Arc::new(f));
        self
    }

    pub fn fetching(mut self, f: impl Fn(SlotProps) -> R + Send + Sync + 'static) -> Self {
        self.fetching = Some(Arc::new(f));
        self
    }

    pub fn failure(mut self, f: impl Fn(SlotProps) -> R + Send + Sync + 'static) -> Self {
        self.failure = Some(Arc::new(f));
        self
    }

    pub fn empty(mut self, f: impl Fn(SlotProps) -> R + Send + Sync + 'static) -> Self {
        self.empty = Some(Arc::new(f));
        self
    }

    pub fn success(mut self, f: impl Fn(SlotProps) -> R + Send + Sync + 'static) -> Self {
        self.success = Some(Arc::new(f));
        self
    }
}
