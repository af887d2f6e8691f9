//! Blocking twins of the async surface
//!
//! Each blocking client owns a current-thread runtime and drives the async
//! implementation to completion per call. Do not use these from inside an
//! async context; use the async [`crate::client::QueryClient`] there.

use crate::error::{QueryError, Result};
use crate::query::{AggregateQuery, SearchQuery};
use crate::results::{AggregateResults, GroupedResults, PropertiesDeserializer, ResultObject};
use crate::transport::Transport;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use uuid::Uuid;

fn build_runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| QueryError::Runtime(e.to_string()))
}

/// Blocking query client
pub struct QueryClient {
    inner: crate::client::QueryClient,
    runtime: Arc<Runtime>,
}

impl QueryClient {
    pub fn new(collection: impl Into<String>, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self {
            inner: crate::client::QueryClient::new(collection, transport),
            runtime: Arc::new(build_runtime()?),
        })
    }

    /// Inject a schema-aware properties deserializer
    pub fn with_properties_deserializer(
        mut self,
        properties: Arc<dyn PropertiesDeserializer>,
    ) -> Self {
        self.inner = self.inner.with_properties_deserializer(properties);
        self
    }

    pub fn collection(&self) -> &str {
        self.inner.collection()
    }

    pub fn search(&self, query: &SearchQuery) -> Result<Vec<ResultObject>> {
        self.runtime.block_on(self.inner.search(query))
    }

    pub fn search_grouped(&self, query: &SearchQuery) -> Result<GroupedResults> {
        self.runtime.block_on(self.inner.search_grouped(query))
    }

    pub fn aggregate(&self, query: &AggregateQuery) -> Result<AggregateResults> {
        self.runtime.block_on(self.inner.aggregate(query))
    }

    /// Create a blocking pagination iterator over a query
    pub fn paginate(&self, query: SearchQuery, page_size: u32) -> Result<Paginator> {
        Ok(Paginator {
            inner: self.inner.paginate(query, page_size)?,
            runtime: self.runtime.clone(),
            buffer: VecDeque::new(),
            done: false,
        })
    }
}

/// Blocking pagination iterator.
///
/// Yields objects in the same order as the async stream for the same
/// dataset and page size.
pub struct Paginator {
    inner: crate::pagination::Paginator,
    runtime: Arc<Runtime>,
    buffer: VecDeque<ResultObject>,
    done: bool,
}

impl Paginator {
    /// Seed the cursor so previously seen objects are never re-fetched
    pub fn resume_from(mut self, id: Uuid) -> Self {
        self.inner = self.inner.resume_from(id);
        self
    }
}

impl Iterator for Paginator {
    type Item = Result<ResultObject>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(object) = self.buffer.pop_front() {
                return Some(Ok(object));
            }
            if self.done {
                return None;
            }
            match self.runtime.block_on(self.inner.next_page()) {
                Ok(Some(page)) => self.buffer.extend(page),
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
