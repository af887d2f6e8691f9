//! Resumable cursor pagination
//!
//! The iterator owns one cursor and buffers at most one page, so a single
//! instance is not meant for concurrent re-entrant use; independent
//! iterators over the same query run fully concurrently.

use crate::client::QueryClient;
use crate::error::{ConstructionError, Result};
use crate::query::SearchQuery;
use crate::results::ResultObject;
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use tracing::debug;
use uuid::Uuid;

/// Cursor state: Idle before the first fetch, Ready with a cursor between
/// fetches, Exhausted once a short page signaled end of stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Idle { resume_from: Option<Uuid> },
    Ready { cursor: Uuid },
    Exhausted,
}

/// Lazy forward-only iterator over one query
pub struct Paginator {
    client: QueryClient,
    query: SearchQuery,
    page_size: u32,
    state: PageState,
}

impl Paginator {
    pub(crate) fn new(
        client: QueryClient,
        query: SearchQuery,
        page_size: u32,
    ) -> Result<Self> {
        if page_size < 1 {
            return Err(ConstructionError::InvalidPageSize.into());
        }
        Ok(Self {
            client,
            query,
            page_size,
            state: PageState::Idle { resume_from: None },
        })
    }

    /// Seed the cursor so previously seen objects are never re-fetched.
    ///
    /// Only meaningful before the first fetch.
    pub fn resume_from(mut self, id: Uuid) -> Self {
        if let PageState::Idle { .. } = self.state {
            self.state = PageState::Idle {
                resume_from: Some(id),
            };
        }
        self
    }

    /// Fetch the next page.
    ///
    /// Returns `None` once the stream is exhausted. A page shorter than the
    /// configured page size is the explicit end-of-stream signal; otherwise
    /// the last id of the page becomes the new cursor.
    pub async fn next_page(&mut self) -> Result<Option<Vec<ResultObject>>> {
        let cursor = match self.state {
            PageState::Idle { resume_from } => resume_from,
            PageState::Ready { cursor } => Some(cursor),
            PageState::Exhausted => return Ok(None),
        };

        let mut query = self.query.clone().limit(self.page_size);
        query.options.after = cursor;

        let page = self.client.search(&query).await?;
        debug!(
            page_len = page.len(),
            page_size = self.page_size,
            "fetched page"
        );

        if (page.len() as u32) < self.page_size {
            self.state = PageState::Exhausted;
        } else if let Some(last) = page.last() {
            self.state = PageState::Ready { cursor: last.id };
        }

        if page.is_empty() {
            return Ok(None);
        }
        Ok(Some(page))
    }

    /// Consume the iterator as an async stream of objects.
    ///
    /// Yields the same order as repeated [`next_page`](Self::next_page)
    /// calls for the same dataset and page size.
    pub fn into_stream(self) -> impl Stream<Item = Result<ResultObject>> + Send {
        stream::unfold(
            (self, VecDeque::new(), false),
            |(mut paginator, mut buffer, mut done)| async move {
                loop {
                    if let Some(object) = buffer.pop_front() {
                        return Some((Ok(object), (paginator, buffer, done)));
                    }
                    if done {
                        return None;
                    }
                    match paginator.next_page().await {
                        Ok(Some(page)) => buffer.extend(page),
                        Ok(None) => return None,
                        Err(e) => {
                            // surface the error, then end the stream
                            done = true;
                            return Some((Err(e), (paginator, buffer, done)));
                        }
                    }
                }
            },
        )
    }
}
