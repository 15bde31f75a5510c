//! Pagination types
//!
//! Page decoding, session states and the request template re-issued for
//! every page.

use crate::client::RequestOptions;
use crate::error::LarkError;
use reqwest::Method;
use serde_json::{Map, Value};
use std::time::Duration;

/// Response field signalling that another page exists
pub const HAS_MORE_FIELD: &str = "has_more";

/// Response fields that may carry the continuation token, in order of preference
pub const CURSOR_FIELDS: [&str; 2] = ["page_token", "next_page_token"];

/// Query parameter carrying the continuation token on the next request
pub const CURSOR_PARAM: &str = "page_token";

/// Query parameter carrying the page size
pub const PAGE_SIZE_PARAM: &str = "page_size";

/// Fixed parameters of one logical listing operation
///
/// The cursor is deliberately absent: it belongs to the iteration session and
/// is appended by the fetch for every page.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub options: RequestOptions,
}

impl PageRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Add a fixed query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when a value is present
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn page_size(self, page_size: Option<u32>) -> Self {
        self.query_opt(PAGE_SIZE_PARAM, page_size)
    }

    /// Set the JSON body sent with every page request
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// Decoded body of one page
#[derive(Debug, Clone, PartialEq)]
pub enum PageResult {
    /// A JSON object, with the control fields removed from `payload`
    Ok {
        payload: Map<String, Value>,
        has_more: bool,
        next_cursor: Option<String>,
    },
    /// Anything that is not a JSON object or `null`
    Malformed { raw_body: Value },
}

impl PageResult {
    /// Split a page body into payload and control fields
    ///
    /// Absent control fields mean "no more pages". A `null` body is an empty
    /// final page.
    pub fn decode(body: Value) -> Self {
        let mut payload = match body {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            raw_body => return Self::Malformed { raw_body },
        };

        let has_more = payload
            .remove(HAS_MORE_FIELD)
            .as_ref()
            .is_some_and(is_truthy);

        let mut next_cursor = None;
        for field in CURSOR_FIELDS {
            let token = payload.remove(field).and_then(cursor_value);
            if next_cursor.is_none() {
                next_cursor = token;
            }
        }

        Self::Ok {
            payload,
            has_more,
            next_cursor,
        }
    }
}

/// Truthiness as the server's JavaScript clients see it
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn cursor_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Result of pulling one item from a [`PageIterator`](super::PageIterator)
#[derive(Debug)]
pub enum PageOutcome<T> {
    /// One page payload, control fields stripped
    Page(T),
    /// Normal exhaustion, or any pull after a terminal state
    EndOfSequence,
    /// Fetch or decode failure; always the last item of a session
    Failure(LarkError),
}

impl<T> PageOutcome<T> {
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::EndOfSequence)
    }

    /// The page, or `None` for the end marker and the failure sentinel
    pub fn into_page(self) -> Option<T> {
        match self {
            Self::Page(page) => Some(page),
            _ => None,
        }
    }

    /// Map to a fail-loud result; `Ok(None)` marks the end of the sequence
    pub fn into_result(self) -> Result<Option<T>, LarkError> {
        match self {
            Self::Page(page) => Ok(Some(page)),
            Self::EndOfSequence => Ok(None),
            Self::Failure(error) => Err(error),
        }
    }
}

/// Lifecycle of one iteration session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No fetch issued yet
    Init,
    /// At least one page fetched and more are available
    Active,
    /// Exhausted cleanly
    Done,
    /// Stopped after yielding the failure sentinel
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// What to do when the server reports `has_more` without a continuation token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingTokenPolicy {
    /// End the sequence after yielding the page
    #[default]
    Terminate,
    /// Fetch again with an absent cursor, restarting from the first page.
    /// Loops for as long as the server keeps answering the same way, so pair
    /// it with [`PaginationConfig::max_pages`].
    RestartFromFirstPage,
}

/// Per-session pagination behaviour
#[derive(Debug, Clone, Default)]
pub struct PaginationConfig {
    pub missing_token: MissingTokenPolicy,
    /// Deadline for each single page fetch
    pub fetch_timeout: Option<Duration>,
    /// Upper bound on fetches for the whole session; hitting it sets
    /// [`PageIterator::truncated`](super::PageIterator::truncated)
    pub max_pages: Option<usize>,
}

impl PaginationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing_token(mut self, policy: MissingTokenPolicy) -> Self {
        self.missing_token = policy;
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}
