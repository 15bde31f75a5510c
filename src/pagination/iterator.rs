//! The page iteration session

use super::types::{MissingTokenPolicy, PageOutcome, PageResult, PaginationConfig, SessionState};
use crate::error::{LarkError, LarkResult};
use futures_util::future::BoxFuture;
use futures_util::Stream;
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

/// Future returned by a single page fetch
pub type FetchFuture<'a> = BoxFuture<'a, LarkResult<Value>>;

type FetchFn<'a> = Box<dyn FnMut(Option<String>) -> FetchFuture<'a> + Send + 'a>;

/// Lazy sequence of pages over a cursor-paginated endpoint
///
/// Every call to [`next_page`](Self::next_page) performs exactly one fetch
/// with the cursor returned by the previous page, or none for the first page.
/// Nothing is prefetched. Once the session is `Done` or `Failed` it never
/// fetches again; build a new iterator to start over.
///
/// Dropping the iterator (or its stream) drops any in-flight fetch, which
/// aborts the underlying HTTP call.
pub struct PageIterator<'a, T = Map<String, Value>> {
    fetch: FetchFn<'a>,
    config: PaginationConfig,
    state: SessionState,
    cursor: Option<String>,
    pages_fetched: usize,
    truncated: bool,
    _payload: PhantomData<fn() -> T>,
}

impl<'a, T> PageIterator<'a, T>
where
    T: DeserializeOwned,
{
    /// Wrap a single-page fetch, already bound to its filter parameters
    pub fn new<F, Fut>(mut fetch: F, config: PaginationConfig) -> Self
    where
        F: FnMut(Option<String>) -> Fut + Send + 'a,
        Fut: Future<Output = LarkResult<Value>> + Send + 'a,
    {
        Self {
            fetch: Box::new(move |cursor| Box::pin(fetch(cursor))),
            config,
            state: SessionState::Init,
            cursor: None,
            pages_fetched: 0,
            truncated: false,
            _payload: PhantomData,
        }
    }

    /// Replace the pagination behaviour; the cursor and state are kept
    pub fn with_config(mut self, config: PaginationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of fetches issued so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Whether the session ended on `max_pages` rather than server exhaustion
    ///
    /// Both end with `EndOfSequence`; only this flag tells them apart.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Pull the next page
    pub async fn next_page(&mut self) -> PageOutcome<T> {
        if self.state.is_terminal() {
            return PageOutcome::EndOfSequence;
        }

        if let Some(max_pages) = self.config.max_pages {
            if self.pages_fetched >= max_pages {
                debug!("Page limit of {} reached, ending iteration", max_pages);
                self.state = SessionState::Done;
                self.truncated = true;
                return PageOutcome::EndOfSequence;
            }
        }

        let cursor = self.cursor.clone();
        debug!(
            "Fetching page {} (cursor: {:?})",
            self.pages_fetched + 1,
            cursor
        );
        self.pages_fetched += 1;

        let fetched = match self.config.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, (self.fetch)(cursor))
                .await
                .unwrap_or(Err(LarkError::Timeout(limit))),
            None => (self.fetch)(cursor).await,
        };

        let body = match fetched {
            Ok(body) => body,
            Err(e) => return self.fail(e),
        };

        match PageResult::decode(body) {
            PageResult::Malformed { raw_body } => self.fail(LarkError::invalid_response(format!(
                "page body is not a JSON object: {}",
                raw_body
            ))),
            PageResult::Ok {
                payload,
                has_more,
                next_cursor,
            } => match serde_json::from_value::<T>(Value::Object(payload)) {
                Ok(page) => {
                    self.advance(has_more, next_cursor);
                    PageOutcome::Page(page)
                }
                Err(e) => self.fail(e.into()),
            },
        }
    }

    /// Drain every page, turning the failure sentinel into an error
    pub async fn collect_pages(mut self) -> LarkResult<Vec<T>> {
        let mut pages = Vec::new();
        loop {
            match self.next_page().await {
                PageOutcome::Page(page) => pages.push(page),
                PageOutcome::EndOfSequence => return Ok(pages),
                PageOutcome::Failure(e) => return Err(e),
            }
        }
    }

    /// Consume the session as a stream of pages
    ///
    /// The stream yields `Page` items and at most one trailing `Failure`;
    /// `EndOfSequence` is expressed by the stream ending.
    pub fn into_stream(self) -> impl Stream<Item = PageOutcome<T>> + Send + 'a
    where
        T: Send + 'a,
    {
        futures_util::stream::unfold(self, |mut iter| async move {
            match iter.next_page().await {
                PageOutcome::EndOfSequence => None,
                outcome => Some((outcome, iter)),
            }
        })
    }

    fn advance(&mut self, has_more: bool, next_cursor: Option<String>) {
        self.state = match (has_more, &next_cursor, self.config.missing_token) {
            (false, _, _) => SessionState::Done,
            (true, None, MissingTokenPolicy::Terminate) => {
                warn!(
                    "Server reported more pages without a continuation token after page {}, ending iteration",
                    self.pages_fetched
                );
                SessionState::Done
            }
            _ => SessionState::Active,
        };
        self.cursor = next_cursor;
    }

    fn fail(&mut self, e: LarkError) -> PageOutcome<T> {
        error!("Pagination failed on page {}: {}", self.pages_fetched, e);
        self.state = SessionState::Failed;
        PageOutcome::Failure(e)
    }
}

impl<T> fmt::Debug for PageIterator<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageIterator")
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("pages_fetched", &self.pages_fetched)
            .field("truncated", &self.truncated)
            .field("config", &self.config)
            .finish()
    }
}
