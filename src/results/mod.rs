//! Decoded result types
//!
//! Result values are created fresh by decoding exactly one response and are
//! owned by the caller.

use crate::error::DecodeError;
use crate::query::VectorInput;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-result metadata returned by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub distance: Option<f32>,
    pub certainty: Option<f32>,
    pub score: Option<f32>,
    pub explain_score: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_update_time: Option<DateTime<Utc>>,
    pub is_consistent: Option<bool>,
}

/// One decoded result object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultObject {
    pub id: Uuid,
    /// Properties as produced by the injected deserializer
    pub properties: serde_json::Value,
    pub metadata: ResultMetadata,
    /// Named vectors decoded per their declared type tag; unrecognized
    /// tags are absent here, not errors
    pub vectors: IndexMap<String, VectorInput>,
    /// Generative-augmentation output for this object, when requested
    pub generated: Option<String>,
}

/// One reconstructed group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub min_distance: f32,
    pub max_distance: f32,
    pub number_of_objects: i64,
    pub members: Vec<ResultObject>,
}

/// A group member tagged with its owning group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub belongs_to_group: String,
    pub object: ResultObject,
}

/// Grouped decode output: the name-keyed group map in server order, plus
/// the flattened member list. Every member belongs to exactly one group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedResults {
    pub groups: IndexMap<String, Group>,
    pub objects: Vec<GroupMember>,
}

/// Scalar statistics computed for one property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyStats {
    pub count: Option<i64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
    pub sum: Option<f64>,
}

/// One aggregate group; ungrouped requests produce a single group with no
/// key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateGroup {
    /// Grouping property path and the group's key value
    pub grouped_by: Option<(String, serde_json::Value)>,
    pub total_count: Option<i64>,
    pub properties: IndexMap<String, PropertyStats>,
}

/// Decoded aggregate output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResults {
    pub groups: Vec<AggregateGroup>,
}

impl AggregateResults {
    /// The single group of an ungrouped aggregate, if that is what this is
    pub fn single(&self) -> Option<&AggregateGroup> {
        match self.groups.as_slice() {
            [only] if only.grouped_by.is_none() => Some(only),
            _ => None,
        }
    }
}

/// Turns the opaque properties payload into a typed value.
///
/// Injected by the caller; schema-aware implementations live outside this
/// layer.
pub trait PropertiesDeserializer: Send + Sync {
    fn deserialize(&self, collection: &str, payload: &[u8]) -> Result<serde_json::Value, DecodeError>;
}

/// Default deserializer: MessagePack into a dynamic value
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePackProperties;

impl PropertiesDeserializer for MessagePackProperties {
    fn deserialize(
        &self,
        _collection: &str,
        payload: &[u8],
    ) -> Result<serde_json::Value, DecodeError> {
        if payload.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        rmp_serde::from_slice(payload).map_err(|e| DecodeError::Properties(e.to_string()))
    }
}
