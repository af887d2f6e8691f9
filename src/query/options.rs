//! Shared search parameters carried by every operator variant

use crate::filter::Predicate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Write/read consistency level for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyLevel {
    One,
    Quorum,
    All,
}

/// Similarity threshold: a [0,1]-normalized certainty or a raw metric
/// distance.
///
/// The two are mutually exclusive by construction. Setting certainty always
/// replaces whatever was there; setting distance never displaces an
/// existing certainty, so certainty wins when callers set both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    Certainty(f64),
    Distance(f64),
}

pub(crate) fn apply_certainty(slot: &mut Option<Threshold>, value: f64) {
    *slot = Some(Threshold::Certainty(value));
}

pub(crate) fn apply_distance(slot: &mut Option<Threshold>, value: f64) {
    if !matches!(slot, Some(Threshold::Certainty(_))) {
        *slot = Some(Threshold::Distance(value));
    }
}

/// Metadata fields to return per result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRequest {
    pub uuid: bool,
    pub vector: bool,
    pub creation_time: bool,
    pub last_update_time: bool,
    pub distance: bool,
    pub certainty: bool,
    pub score: bool,
    pub explain_score: bool,
    pub is_consistent: bool,
}

impl Default for MetadataRequest {
    fn default() -> Self {
        Self {
            uuid: true,
            vector: false,
            creation_time: false,
            last_update_time: false,
            distance: false,
            certainty: false,
            score: false,
            explain_score: false,
            is_consistent: false,
        }
    }
}

impl MetadataRequest {
    /// Request every metadata field
    pub fn full() -> Self {
        Self {
            uuid: true,
            vector: true,
            creation_time: true,
            last_update_time: true,
            distance: true,
            certainty: true,
            score: true,
            explain_score: true,
            is_consistent: true,
        }
    }

    /// Request the similarity fields (distance, certainty, score)
    pub fn scores() -> Self {
        Self {
            distance: true,
            certainty: true,
            score: true,
            ..Self::default()
        }
    }
}

/// Which direct properties to return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertySelection {
    /// Return every non-reference property
    All,
    /// Return only the named properties
    Named(Vec<String>),
}

/// A requested cross-reference sub-query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSelection {
    /// Reference property to follow
    pub link_on: String,
    /// Restrict to one target collection of a multi-target reference
    pub target_collection: Option<String>,
    pub properties: Option<PropertySelection>,
    pub metadata: MetadataRequest,
}

impl ReferenceSelection {
    pub fn new(link_on: impl Into<String>) -> Self {
        Self {
            link_on: link_on.into(),
            target_collection: None,
            properties: None,
            metadata: MetadataRequest::default(),
        }
    }

    pub fn target_collection(mut self, collection: impl Into<String>) -> Self {
        self.target_collection = Some(collection.into());
        self
    }

    pub fn properties(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.properties = Some(PropertySelection::Named(
            names.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn metadata(mut self, metadata: MetadataRequest) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Generative-augmentation request, encoded and passed through verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerativeRequest {
    pub single_prompt: Option<String>,
    pub grouped_task: Option<String>,
    pub grouped_properties: Vec<String>,
}

impl GenerativeRequest {
    pub fn single_prompt(prompt: impl Into<String>) -> Self {
        Self {
            single_prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    pub fn grouped_task(task: impl Into<String>) -> Self {
        Self {
            grouped_task: Some(task.into()),
            ..Self::default()
        }
    }
}

/// The option set shared by every search operator variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Keep results until an automatically detected score cliff after N
    /// groups
    pub autocut: Option<u32>,
    /// Resume-after cursor (last-seen object id)
    pub after: Option<Uuid>,
    pub consistency_level: Option<ConsistencyLevel>,
    pub filter: Option<Predicate>,
    pub generative: Option<GenerativeRequest>,
    pub return_properties: Option<PropertySelection>,
    pub return_references: Vec<ReferenceSelection>,
    pub return_metadata: MetadataRequest,
    /// Named vectors to return with each result
    pub return_vectors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certainty_always_wins() {
        let mut slot = None;
        apply_distance(&mut slot, 0.4);
        assert_eq!(slot, Some(Threshold::Distance(0.4)));

        apply_certainty(&mut slot, 0.9);
        assert_eq!(slot, Some(Threshold::Certainty(0.9)));

        // distance never displaces certainty
        apply_distance(&mut slot, 0.2);
        assert_eq!(slot, Some(Threshold::Certainty(0.9)));
    }

    #[test]
    fn test_metadata_request_defaults_to_uuid_only() {
        let metadata = MetadataRequest::default();
        assert!(metadata.uuid);
        assert!(!metadata.distance);
        assert!(!metadata.vector);
    }
}
