//! Message encoding and decoding with size guards

use super::request::{AggregateRequest, SearchRequest};
use super::response::{AggregateReply, SearchReply};
use crate::error::DecodeError;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Maximum message size (10 MB)
const MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// Trait for wire message codecs
pub trait Codec: Send + Sync {
    /// Encode a search request to bytes
    fn encode_search(&self, request: &SearchRequest) -> Result<Bytes, DecodeError>;

    /// Decode bytes to a search reply
    fn decode_search_reply(&self, data: &[u8]) -> Result<SearchReply, DecodeError>;

    /// Encode an aggregate request to bytes
    fn encode_aggregate(&self, request: &AggregateRequest) -> Result<Bytes, DecodeError>;

    /// Decode bytes to an aggregate reply
    fn decode_aggregate_reply(&self, data: &[u8]) -> Result<AggregateReply, DecodeError>;

    /// Get codec name
    fn name(&self) -> &str;

    /// Get maximum message size
    fn max_size(&self) -> usize {
        MAX_MESSAGE_SIZE
    }
}

/// MessagePack codec implementation with size guards
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl BinaryCodec {
    fn to_bytes<T: Serialize>(&self, value: &T) -> Result<Bytes, DecodeError> {
        let encoded =
            rmp_serde::to_vec_named(value).map_err(|e| DecodeError::Encoding(e.to_string()))?;

        if encoded.len() > self.max_size() {
            return Err(DecodeError::MessageTooLarge {
                size: encoded.len(),
                max_size: self.max_size(),
            });
        }

        Ok(Bytes::from(encoded))
    }

    fn from_slice<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, DecodeError> {
        if data.len() > self.max_size() {
            return Err(DecodeError::MessageTooLarge {
                size: data.len(),
                max_size: self.max_size(),
            });
        }

        rmp_serde::from_slice(data).map_err(|e| DecodeError::Decoding(e.to_string()))
    }
}

impl Codec for BinaryCodec {
    fn encode_search(&self, request: &SearchRequest) -> Result<Bytes, DecodeError> {
        self.to_bytes(request)
    }

    fn decode_search_reply(&self, data: &[u8]) -> Result<SearchReply, DecodeError> {
        self.from_slice(data)
    }

    fn encode_aggregate(&self, request: &AggregateRequest) -> Result<Bytes, DecodeError> {
        self.to_bytes(request)
    }

    fn decode_aggregate_reply(&self, data: &[u8]) -> Result<AggregateReply, DecodeError> {
        self.from_slice(data)
    }

    fn name(&self) -> &str {
        "messagepack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::request::*;

    fn minimal_request() -> SearchRequest {
        SearchRequest {
            collection: "Article".to_string(),
            query: WireQuery::Fetch(FetchBody::default()),
            group_by: None,
            limit: Some(10),
            offset: None,
            after: None,
            autocut: None,
            consistency_level: None,
            filters: None,
            generative: None,
            metadata_request: WireMetadataRequest {
                uuid: true,
                ..Default::default()
            },
            properties_request: None,
            vectors_request: Vec::new(),
        }
    }

    #[test]
    fn test_request_roundtrip() {
        let codec = BinaryCodec;
        let request = minimal_request();

        let encoded = codec.encode_search(&request).unwrap();
        let decoded: SearchRequest = codec.from_slice(&encoded).unwrap();

        assert_eq!(request, decoded);
    }

    #[test]
    fn test_size_limit() {
        let codec = BinaryCodec;

        let large_data = vec![0u8; codec.max_size() + 1];
        let result = codec.decode_search_reply(&large_data);
        assert!(matches!(
            result,
            Err(DecodeError::MessageTooLarge { .. })
        ));
    }
}
