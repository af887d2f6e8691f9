//! Aggregate query model
//!
//! Aggregates reuse the search operator set (filters, Near*, Hybrid, Bm25)
//! but compute scalar statistics per property instead of returning objects,
//! optionally grouped by a property.

use super::SearchOperator;
use crate::error::ConstructionError;
use crate::filter::Predicate;
use serde::{Deserialize, Serialize};

/// One scalar statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Count,
    Minimum,
    Maximum,
    Mean,
    Median,
    Mode,
    Sum,
}

impl Metric {
    /// Every metric, for callers that want the full set
    pub const ALL: [Metric; 7] = [
        Metric::Count,
        Metric::Minimum,
        Metric::Maximum,
        Metric::Mean,
        Metric::Median,
        Metric::Mode,
        Metric::Sum,
    ];
}

/// Requested statistics for one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAggregation {
    pub property: String,
    pub metrics: Vec<Metric>,
}

impl PropertyAggregation {
    pub fn new(
        property: impl Into<String>,
        metrics: impl IntoIterator<Item = Metric>,
    ) -> Result<Self, ConstructionError> {
        let metrics: Vec<Metric> = metrics.into_iter().collect();
        if metrics.is_empty() {
            return Err(ConstructionError::EmptyAggregation);
        }
        Ok(Self {
            property: property.into(),
            metrics,
        })
    }
}

/// An aggregate request over the search operator set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateQuery {
    pub(crate) operator: SearchOperator,
    pub(crate) filter: Option<Predicate>,
    pub(crate) aggregations: Vec<PropertyAggregation>,
    pub(crate) group_by_property: Option<String>,
    pub(crate) object_limit: Option<u32>,
    pub(crate) total_count: bool,
}

impl AggregateQuery {
    /// Aggregate over every object that passes the filter
    pub fn fetch() -> Self {
        Self::over(SearchOperator::FetchObjects)
    }

    /// Aggregate over the results of any search operator
    pub fn over(operator: SearchOperator) -> Self {
        Self {
            operator,
            filter: None,
            aggregations: Vec::new(),
            group_by_property: None,
            object_limit: None,
            total_count: true,
        }
    }

    pub fn filter(mut self, filter: Predicate) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn aggregate(mut self, aggregation: PropertyAggregation) -> Self {
        self.aggregations.push(aggregation);
        self
    }

    /// Group statistics by the value of a property
    pub fn group_by_property(mut self, property: impl Into<String>) -> Self {
        self.group_by_property = Some(property.into());
        self
    }

    /// Bound the number of objects considered by the underlying search
    pub fn object_limit(mut self, limit: u32) -> Self {
        self.object_limit = Some(limit);
        self
    }

    pub fn total_count(mut self, enabled: bool) -> Self {
        self.total_count = enabled;
        self
    }

    pub fn operator(&self) -> &SearchOperator {
        &self.operator
    }

    pub fn aggregations(&self) -> &[PropertyAggregation] {
        &self.aggregations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metrics_rejected() {
        let result = PropertyAggregation::new("size", []);
        assert_eq!(result, Err(ConstructionError::EmptyAggregation));
    }

    #[test]
    fn test_aggregate_composition() {
        let query = AggregateQuery::fetch()
            .aggregate(PropertyAggregation::new("size", [Metric::Mean, Metric::Sum]).unwrap())
            .group_by_property("category");
        assert_eq!(query.aggregations.len(), 1);
        assert_eq!(query.group_by_property.as_deref(), Some("category"));
    }
}
