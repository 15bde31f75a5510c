//! Cursor pagination
//!
//! List, query and search endpoints return one page per call together with a
//! `has_more` flag and an opaque continuation token. [`PageIterator`] turns
//! such an endpoint into a lazy, pull-driven sequence of pages.
//!
//! # Overview
//!
//! - [`PageResult`] decodes a raw page body, stripping the control fields.
//! - [`PageIterator`] owns one iteration session: the current cursor and
//!   whether the session is still live. Each pull issues exactly one fetch.
//! - Failures never escape as `Err`; the session yields a single
//!   [`PageOutcome::Failure`] and then ends. Use
//!   [`PageIterator::collect_pages`] for fail-loud behaviour.

mod iterator;
mod types;

pub use iterator::{FetchFuture, PageIterator};
pub use types::{
    MissingTokenPolicy, PageOutcome, PageRequest, PageResult, PaginationConfig, SessionState,
    CURSOR_FIELDS, CURSOR_PARAM, HAS_MORE_FIELD, PAGE_SIZE_PARAM,
};
