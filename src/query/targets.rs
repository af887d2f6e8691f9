//! Vector target description and combination

use serde::{Deserialize, Serialize};

/// Query vector payload: one flat vector or one multi-vector matrix,
/// never mixed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VectorInput {
    Single(Vec<f32>),
    Multi(Vec<Vec<f32>>),
}

impl From<Vec<f32>> for VectorInput {
    fn from(values: Vec<f32>) -> Self {
        VectorInput::Single(values)
    }
}

impl From<Vec<Vec<f32>>> for VectorInput {
    fn from(rows: Vec<Vec<f32>>) -> Self {
        VectorInput::Multi(rows)
    }
}

/// One named or unnamed vector space compared against during search.
///
/// An unnamed target attaches its vector bytes directly to the request; a
/// named target is declared against a by-name vector collection, optionally
/// weighted for combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorTarget {
    pub name: Option<String>,
    pub weight: Option<f32>,
    pub input: VectorInput,
}

impl VectorTarget {
    pub fn unnamed(input: impl Into<VectorInput>) -> Self {
        Self {
            name: None,
            weight: None,
            input: input.into(),
        }
    }

    pub fn named(name: impl Into<String>, input: impl Into<VectorInput>) -> Self {
        Self {
            name: Some(name.into()),
            weight: None,
            input: input.into(),
        }
    }

    pub fn weighted(name: impl Into<String>, weight: f32, input: impl Into<VectorInput>) -> Self {
        Self {
            name: Some(name.into()),
            weight: Some(weight),
            input: input.into(),
        }
    }
}

/// How scores from multiple targets are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationMethod {
    Sum,
    Minimum,
    Average,
    RelativeScore,
    ManualWeights,
}

/// A weighted/aggregated set of named vector targets.
///
/// The target list must be non-empty, and `ManualWeights` requires exactly
/// one weight per target; both are checked when the query is encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedTarget {
    pub method: CombinationMethod,
    pub targets: Vec<VectorTarget>,
}

impl CombinedTarget {
    pub fn new(method: CombinationMethod, targets: Vec<VectorTarget>) -> Self {
        Self { method, targets }
    }

    pub fn sum(targets: Vec<VectorTarget>) -> Self {
        Self::new(CombinationMethod::Sum, targets)
    }

    pub fn minimum(targets: Vec<VectorTarget>) -> Self {
        Self::new(CombinationMethod::Minimum, targets)
    }

    pub fn average(targets: Vec<VectorTarget>) -> Self {
        Self::new(CombinationMethod::Average, targets)
    }

    pub fn relative_score(targets: Vec<VectorTarget>) -> Self {
        Self::new(CombinationMethod::RelativeScore, targets)
    }

    pub fn manual_weights(targets: Vec<VectorTarget>) -> Self {
        Self::new(CombinationMethod::ManualWeights, targets)
    }
}

/// The target of a near-vector search: one target, or a combined set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetSpec {
    Single(VectorTarget),
    Combined(CombinedTarget),
}

impl From<VectorTarget> for TargetSpec {
    fn from(target: VectorTarget) -> Self {
        TargetSpec::Single(target)
    }
}

impl From<CombinedTarget> for TargetSpec {
    fn from(combined: CombinedTarget) -> Self {
        TargetSpec::Combined(combined)
    }
}

impl From<Vec<f32>> for TargetSpec {
    fn from(values: Vec<f32>) -> Self {
        TargetSpec::Single(VectorTarget::unnamed(values))
    }
}

impl From<Vec<Vec<f32>>> for TargetSpec {
    fn from(rows: Vec<Vec<f32>>) -> Self {
        TargetSpec::Single(VectorTarget::unnamed(rows))
    }
}
