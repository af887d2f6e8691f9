//! Transport seam
//!
//! The query layer never touches a connection directly; it hands one
//! encoded message and a request descriptor to a [`Transport`] and gets the
//! raw response bytes back. Connection pooling, TLS, retries and
//! cancellation all live behind this trait.

pub mod http;
pub mod token;

pub use http::HttpTransport;
pub use token::{AuthToken, RefreshingToken, StaticToken, TokenProvider, TokenSource};

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Which server procedure a message is destined for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    Search,
    Aggregate,
}

impl Procedure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Procedure::Search => "search",
            Procedure::Aggregate => "aggregate",
        }
    }
}

/// Routing information accompanying one encoded message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub procedure: Procedure,
    pub collection: String,
}

impl RequestDescriptor {
    pub fn new(procedure: Procedure, collection: impl Into<String>) -> Self {
        Self {
            procedure,
            collection: collection.into(),
        }
    }
}

/// Trait for request transports
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request, returning the raw response bytes.
    ///
    /// Implementations surface server rejections as [`crate::error::ApiError`]
    /// and connection/auth failures as [`crate::error::TransportError`]; they
    /// must not retry on behalf of this layer.
    async fn perform_request(&self, message: Bytes, descriptor: &RequestDescriptor)
        -> Result<Bytes>;
}
