//! Query client
//!
//! Composes the encoder, the binary codec, the transport and the injected
//! properties deserializer into one call path: build → encode → perform →
//! decode. The client holds no per-call state; a single instance may be
//! shared and used concurrently.

use crate::error::{ConstructionError, Result};
use crate::pagination::Paginator;
use crate::query::{AggregateQuery, SearchQuery};
use crate::results::{
    AggregateResults, GroupedResults, MessagePackProperties, PropertiesDeserializer, ResultObject,
};
use crate::transport::{Procedure, RequestDescriptor, Transport};
use crate::wire::{decode, encode, BinaryCodec, Codec};
use std::sync::Arc;
use tracing::debug;

/// Client for one collection of the Meridian search database
#[derive(Clone)]
pub struct QueryClient {
    collection: String,
    codec: Arc<dyn Codec>,
    transport: Arc<dyn Transport>,
    properties: Arc<dyn PropertiesDeserializer>,
}

impl QueryClient {
    /// Create a client over the given transport with the default binary
    /// codec and properties deserializer
    pub fn new(collection: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            collection: collection.into(),
            codec: Arc::new(BinaryCodec),
            transport,
            properties: Arc::new(MessagePackProperties),
        }
    }

    /// Replace the wire codec
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    /// Inject a schema-aware properties deserializer
    pub fn with_properties_deserializer(
        mut self,
        properties: Arc<dyn PropertiesDeserializer>,
    ) -> Self {
        self.properties = properties;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Run a search, returning flat result objects
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<ResultObject>> {
        let reply = self.perform_search(query).await?;
        let objects = decode::decode_results(&self.collection, &reply, self.properties.as_ref())?;
        debug!(collection = %self.collection, results = objects.len(), "search complete");
        Ok(objects)
    }

    /// Run a grouped search; the query must carry a group-by clause
    pub async fn search_grouped(&self, query: &SearchQuery) -> Result<GroupedResults> {
        if query.group_by_spec().is_none() {
            return Err(ConstructionError::MissingGroupBy.into());
        }
        let reply = self.perform_search(query).await?;
        let grouped = decode::decode_grouped(&self.collection, &reply, self.properties.as_ref())?;
        debug!(
            collection = %self.collection,
            groups = grouped.groups.len(),
            "grouped search complete"
        );
        Ok(grouped)
    }

    /// Run an aggregate query
    pub async fn aggregate(&self, query: &AggregateQuery) -> Result<AggregateResults> {
        let request = encode::encode_aggregate(&self.collection, query)?;
        let message = self.codec.encode_aggregate(&request)?;
        let descriptor = RequestDescriptor::new(Procedure::Aggregate, &self.collection);

        let response = self.transport.perform_request(message, &descriptor).await?;
        let reply = self.codec.decode_aggregate_reply(&response)?;
        Ok(decode::decode_aggregate(&reply)?)
    }

    /// Create a pagination iterator over a query
    pub fn paginate(&self, query: SearchQuery, page_size: u32) -> Result<Paginator> {
        Paginator::new(self.clone(), query, page_size)
    }

    async fn perform_search(&self, query: &SearchQuery) -> Result<crate::wire::SearchReply> {
        let request = encode::encode_search(&self.collection, query)?;
        let message = self.codec.encode_search(&request)?;
        let descriptor = RequestDescriptor::new(Procedure::Search, &self.collection);

        let response = self.transport.perform_request(message, &descriptor).await?;
        Ok(self.codec.decode_search_reply(&response)?)
    }
}
