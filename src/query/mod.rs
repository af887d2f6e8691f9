//! Search query composition
//!
//! A query is an immutable value: one operator variant from a closed set,
//! the shared option set, and an optional group-by clause. Builders consume
//! and return the value; nothing is shared or mutated after construction,
//! so a composed query can be reused and submitted concurrently.

pub mod aggregate;
pub mod group_by;
pub mod options;
pub mod targets;
pub mod variants;

pub use aggregate::{AggregateQuery, Metric, PropertyAggregation};
pub use group_by::GroupBySpec;
pub use options::{
    ConsistencyLevel, GenerativeRequest, MetadataRequest, PropertySelection, QueryOptions,
    ReferenceSelection, Threshold,
};
pub use targets::{CombinationMethod, CombinedTarget, TargetSpec, VectorInput, VectorTarget};
pub use variants::{
    Bm25Query, Fusion, HybridNear, HybridQuery, MediaKind, Move, NearMediaQuery, NearObjectQuery,
    NearTextQuery, NearVectorQuery, TokenOperator, WeightedProperty,
};

use crate::filter::Predicate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of search operator variants.
///
/// One variant is active per query; the wire request sets exactly the one
/// corresponding search-kind field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchOperator {
    NearVector(NearVectorQuery),
    NearText(NearTextQuery),
    NearObject(NearObjectQuery),
    NearMedia(NearMediaQuery),
    Hybrid(HybridQuery),
    Bm25(Bm25Query),
    /// Plain fetch constrained only by filters and options
    FetchObjects,
    /// Fetch one object by id; encoded as a UUID-equality filter on the
    /// identity path
    ById(Uuid),
}

/// One composed search: operator variant + shared options + optional
/// group-by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub(crate) operator: SearchOperator,
    pub(crate) options: QueryOptions,
    pub(crate) group_by: Option<GroupBySpec>,
}

impl SearchQuery {
    pub fn new(operator: SearchOperator) -> Self {
        Self {
            operator,
            options: QueryOptions::default(),
            group_by: None,
        }
    }

    pub fn near_vector(query: impl Into<NearVectorQuery>) -> Self {
        Self::new(SearchOperator::NearVector(query.into()))
    }

    pub fn near_text(query: impl Into<NearTextQuery>) -> Self {
        Self::new(SearchOperator::NearText(query.into()))
    }

    pub fn near_object(query: NearObjectQuery) -> Self {
        Self::new(SearchOperator::NearObject(query))
    }

    pub fn near_media(query: NearMediaQuery) -> Self {
        Self::new(SearchOperator::NearMedia(query))
    }

    pub fn hybrid(query: impl Into<HybridQuery>) -> Self {
        Self::new(SearchOperator::Hybrid(query.into()))
    }

    pub fn bm25(query: impl Into<Bm25Query>) -> Self {
        Self::new(SearchOperator::Bm25(query.into()))
    }

    pub fn fetch() -> Self {
        Self::new(SearchOperator::FetchObjects)
    }

    pub fn by_id(id: Uuid) -> Self {
        Self::new(SearchOperator::ById(id))
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.options.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.options.offset = Some(offset);
        self
    }

    pub fn autocut(mut self, jumps: u32) -> Self {
        self.options.autocut = Some(jumps);
        self
    }

    /// Seed the resume-after cursor with a previously seen object id
    pub fn after(mut self, id: Uuid) -> Self {
        self.options.after = Some(id);
        self
    }

    pub fn consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.options.consistency_level = Some(level);
        self
    }

    pub fn filter(mut self, filter: Predicate) -> Self {
        self.options.filter = Some(filter);
        self
    }

    pub fn generative(mut self, generative: GenerativeRequest) -> Self {
        self.options.generative = Some(generative);
        self
    }

    pub fn return_properties(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.options.return_properties = Some(PropertySelection::Named(
            names.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn return_all_properties(mut self) -> Self {
        self.options.return_properties = Some(PropertySelection::All);
        self
    }

    pub fn return_reference(mut self, reference: ReferenceSelection) -> Self {
        self.options.return_references.push(reference);
        self
    }

    pub fn return_metadata(mut self, metadata: MetadataRequest) -> Self {
        self.options.return_metadata = metadata;
        self
    }

    pub fn return_vectors(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.options.return_vectors = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn group_by(mut self, spec: GroupBySpec) -> Self {
        self.group_by = Some(spec);
        self
    }

    pub fn operator(&self) -> &SearchOperator {
        &self.operator
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn group_by_spec(&self) -> Option<&GroupBySpec> {
        self.group_by.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::property;

    #[test]
    fn test_query_composition_is_immutable_value() {
        let base = SearchQuery::bm25("mountain lake").limit(10);
        let with_offset = base.clone().offset(5);

        assert_eq!(base.options.offset, None);
        assert_eq!(with_offset.options.offset, Some(5));
    }

    #[test]
    fn test_filter_and_group_by_attach() {
        let query = SearchQuery::fetch()
            .filter(property("colour").eq("orange").unwrap())
            .group_by(GroupBySpec::new("category", 2, 5).unwrap());

        assert!(query.options.filter.is_some());
        assert_eq!(query.group_by.as_ref().unwrap().max_groups, 2);
    }
}
