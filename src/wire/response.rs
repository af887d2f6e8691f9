//! Response message shapes

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::request::WireValue;

/// One search response: flat entries, or group entries for grouped
/// requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchReply {
    pub results: Vec<ResultEntry>,
    pub group_by_results: Vec<GroupEntry>,
    pub generative_grouped_result: Option<String>,
    pub took_seconds: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub metadata: WireResultMetadata,
    /// Opaque properties payload, handed to the injected deserializer
    pub properties: Bytes,
    pub generative: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireResultMetadata {
    pub id: Option<String>,
    pub distance: Option<f32>,
    pub certainty: Option<f32>,
    pub score: Option<f32>,
    pub explain_score: Option<String>,
    pub creation_time_unix: Option<i64>,
    pub last_update_time_unix: Option<i64>,
    pub is_consistent: Option<bool>,
    pub vectors: Vec<WireVectorPayload>,
}

/// One returned named vector: byte payload plus its declared type tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireVectorPayload {
    pub name: String,
    pub type_tag: u8,
    pub payload: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub name: String,
    pub min_distance: f32,
    pub max_distance: f32,
    pub number_of_objects: i64,
    pub members: Vec<ResultEntry>,
}

/// One aggregate response; an ungrouped request yields one entry with no
/// group key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateReply {
    pub groups: Vec<AggregateGroupEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateGroupEntry {
    pub grouped_by: Option<WireGroupedBy>,
    pub total_count: Option<i64>,
    pub properties: Vec<WirePropertyStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireGroupedBy {
    pub path: String,
    pub value: WireValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WirePropertyStats {
    pub property: String,
    pub count: Option<i64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
    pub sum: Option<f64>,
}
