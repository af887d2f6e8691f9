//! Group-by request specification

use crate::error::ConstructionError;
use serde::{Deserialize, Serialize};

/// Groups results by a property, bounding group count and group size.
///
/// Both counts must be at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBySpec {
    pub path: String,
    pub max_groups: u32,
    pub max_objects_per_group: u32,
}

impl GroupBySpec {
    pub fn new(
        path: impl Into<String>,
        max_groups: u32,
        max_objects_per_group: u32,
    ) -> Result<Self, ConstructionError> {
        if max_groups < 1 || max_objects_per_group < 1 {
            return Err(ConstructionError::InvalidGroupBy {
                max_groups,
                max_objects_per_group,
            });
        }
        Ok(Self {
            path: path.into(),
            max_groups,
            max_objects_per_group,
        })
    }
}
