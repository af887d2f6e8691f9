//! Meridian Client - Typed Query Construction and Wire Marshaling
//!
//! This library composes typed queries against the Meridian vector search
//! database and marshals them across its binary wire format: boolean filter
//! predicates, the closed set of search operator variants, multi-vector
//! target combination, grouped and aggregate results, and resumable cursor
//! pagination.
//!
//! ## Features
//!
//! - **Typed Predicates**: compositional filter trees checked at build time
//! - **Closed Operator Set**: near-vector/text/object/media, hybrid, BM25,
//!   plain fetch and fetch-by-id
//! - **Exact Wire Marshaling**: discriminated request messages and tagged
//!   vector byte payloads
//! - **Grouped Results**: order-preserving group reconstruction
//! - **Resumable Pagination**: cursor iterator with async stream and
//!   blocking forms
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meridian_client::prelude::*;
//! use meridian_client::transport::HttpTransport;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let transport = Arc::new(HttpTransport::new("http://localhost:9055")?);
//!     let client = QueryClient::new("Article", transport);
//!
//!     let query = SearchQuery::near_text("alpine lakes")
//!         .filter(property("wordCount").gte(500)?)
//!         .limit(10);
//!
//!     for object in client.search(&query).await? {
//!         println!("{} {:?}", object.id, object.properties);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod results;
pub mod transport;
pub mod wire;

pub use config::ClientConfig;
pub use error::{QueryError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::client::QueryClient;
    pub use crate::config::ClientConfig;
    pub use crate::error::{QueryError, Result};
    pub use crate::filter::{
        and, created_at, last_updated_at, not, or, property, reference, GeoRange, Predicate,
    };
    pub use crate::pagination::Paginator;
    pub use crate::query::{
        AggregateQuery, Bm25Query, CombinedTarget, ConsistencyLevel, Fusion, GroupBySpec,
        HybridQuery, MediaKind, MetadataRequest, Metric, Move, NearMediaQuery, NearObjectQuery,
        NearTextQuery, NearVectorQuery, PropertyAggregation, SearchOperator, SearchQuery,
        TokenOperator, VectorTarget,
    };
    pub use crate::results::{
        AggregateResults, GroupedResults, PropertiesDeserializer, ResultObject,
    };
    pub use crate::transport::{Transport, TokenProvider};
}
