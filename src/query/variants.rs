//! Variant-specific payloads for the search operator set

use super::options::{apply_certainty, apply_distance, Threshold};
use super::targets::TargetSpec;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Vector similarity search against one target or a combined target set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearVectorQuery {
    pub target: TargetSpec,
    pub threshold: Option<Threshold>,
}

impl NearVectorQuery {
    pub fn new(target: impl Into<TargetSpec>) -> Self {
        Self {
            target: target.into(),
            threshold: None,
        }
    }

    pub fn certainty(mut self, value: f64) -> Self {
        apply_certainty(&mut self.threshold, value);
        self
    }

    pub fn distance(mut self, value: f64) -> Self {
        apply_distance(&mut self.threshold, value);
        self
    }
}

impl From<TargetSpec> for NearVectorQuery {
    fn from(target: TargetSpec) -> Self {
        Self::new(target)
    }
}

impl From<super::targets::VectorTarget> for NearVectorQuery {
    fn from(target: super::targets::VectorTarget) -> Self {
        Self::new(target)
    }
}

impl From<super::targets::CombinedTarget> for NearVectorQuery {
    fn from(combined: super::targets::CombinedTarget) -> Self {
        Self::new(combined)
    }
}

impl From<Vec<f32>> for NearVectorQuery {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

impl From<Vec<Vec<f32>>> for NearVectorQuery {
    fn from(rows: Vec<Vec<f32>>) -> Self {
        Self::new(rows)
    }
}

/// Concept bias for near-text search: a force weight plus either concept
/// phrases or object ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub force: f32,
    pub concepts: Vec<String>,
    pub objects: Vec<Uuid>,
}

impl Move {
    pub fn concepts(force: f32, concepts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            force,
            concepts: concepts.into_iter().map(Into::into).collect(),
            objects: Vec::new(),
        }
    }

    pub fn objects(force: f32, objects: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            force,
            concepts: Vec::new(),
            objects: objects.into_iter().collect(),
        }
    }
}

/// Text similarity search over one or more concept phrases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearTextQuery {
    pub concepts: Vec<String>,
    pub move_to: Option<Move>,
    pub move_away: Option<Move>,
    pub threshold: Option<Threshold>,
}

impl NearTextQuery {
    pub fn new(concepts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            concepts: concepts.into_iter().map(Into::into).collect(),
            move_to: None,
            move_away: None,
            threshold: None,
        }
    }

    pub fn move_to(mut self, bias: Move) -> Self {
        self.move_to = Some(bias);
        self
    }

    pub fn move_away(mut self, bias: Move) -> Self {
        self.move_away = Some(bias);
        self
    }

    pub fn certainty(mut self, value: f64) -> Self {
        apply_certainty(&mut self.threshold, value);
        self
    }

    pub fn distance(mut self, value: f64) -> Self {
        apply_distance(&mut self.threshold, value);
        self
    }
}

impl From<&str> for NearTextQuery {
    fn from(concept: &str) -> Self {
        Self::new([concept])
    }
}

impl From<String> for NearTextQuery {
    fn from(concept: String) -> Self {
        Self::new([concept])
    }
}

/// Similarity search anchored at a reference object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearObjectQuery {
    pub id: Uuid,
    pub threshold: Option<Threshold>,
}

impl NearObjectQuery {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            threshold: None,
        }
    }

    pub fn certainty(mut self, value: f64) -> Self {
        apply_certainty(&mut self.threshold, value);
        self
    }

    pub fn distance(mut self, value: f64) -> Self {
        apply_distance(&mut self.threshold, value);
        self
    }
}

/// Media kinds accepted by near-media search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    Thermal,
    Depth,
    Imu,
}

/// Similarity search against one encoded media payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearMediaQuery {
    pub kind: MediaKind,
    pub payload: Bytes,
    pub threshold: Option<Threshold>,
}

impl NearMediaQuery {
    pub fn new(kind: MediaKind, payload: impl Into<Bytes>) -> Self {
        Self {
            kind,
            payload: payload.into(),
            threshold: None,
        }
    }

    pub fn certainty(mut self, value: f64) -> Self {
        apply_certainty(&mut self.threshold, value);
        self
    }

    pub fn distance(mut self, value: f64) -> Self {
        apply_distance(&mut self.threshold, value);
        self
    }
}

/// Method for blending lexical and vector relevance scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fusion {
    #[default]
    Ranked,
    RelativeScore,
}

/// A lexically searched property, optionally boosted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedProperty {
    pub name: String,
    pub weight: Option<f32>,
}

impl WeightedProperty {
    pub fn boosted(name: impl Into<String>, weight: f32) -> Self {
        Self {
            name: name.into(),
            weight: Some(weight),
        }
    }
}

impl From<&str> for WeightedProperty {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            weight: None,
        }
    }
}

/// Optional vector component embedded in a hybrid search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HybridNear {
    Vector(NearVectorQuery),
    Text(NearTextQuery),
}

/// Blended lexical + vector search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridQuery {
    pub query: String,
    /// Blend weight: 0 is pure lexical, 1 is pure vector
    pub alpha: f32,
    pub properties: Vec<WeightedProperty>,
    pub fusion: Fusion,
    pub near: Option<HybridNear>,
    pub max_vector_distance: Option<f64>,
}

impl HybridQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            alpha: 0.7,
            properties: Vec::new(),
            fusion: Fusion::default(),
            near: None,
            max_vector_distance: None,
        }
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn properties(
        mut self,
        properties: impl IntoIterator<Item = impl Into<WeightedProperty>>,
    ) -> Self {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    pub fn fusion(mut self, fusion: Fusion) -> Self {
        self.fusion = fusion;
        self
    }

    pub fn near_vector(mut self, near: impl Into<NearVectorQuery>) -> Self {
        self.near = Some(HybridNear::Vector(near.into()));
        self
    }

    pub fn near_text(mut self, near: impl Into<NearTextQuery>) -> Self {
        self.near = Some(HybridNear::Text(near.into()));
        self
    }

    pub fn max_vector_distance(mut self, distance: f64) -> Self {
        self.max_vector_distance = Some(distance);
        self
    }
}

impl From<&str> for HybridQuery {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

/// Token-match operator for keyword search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenOperator {
    /// Every query token must match
    And,
    /// At least `minimum_match` query tokens must match
    Or { minimum_match: u32 },
}

/// Keyword (BM25) search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bm25Query {
    pub query: String,
    pub properties: Vec<String>,
    pub operator: Option<TokenOperator>,
}

impl Bm25Query {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            properties: Vec::new(),
            operator: None,
        }
    }

    pub fn properties(mut self, properties: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    pub fn operator(mut self, operator: TokenOperator) -> Self {
        self.operator = Some(operator);
        self
    }
}

impl From<&str> for Bm25Query {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certainty_wins_over_distance() {
        let query = NearVectorQuery::new(vec![0.1, 0.2]).distance(0.5).certainty(0.8);
        assert_eq!(query.threshold, Some(Threshold::Certainty(0.8)));

        let query = NearVectorQuery::new(vec![0.1, 0.2]).certainty(0.8).distance(0.5);
        assert_eq!(query.threshold, Some(Threshold::Certainty(0.8)));
    }

    #[test]
    fn test_distance_alone_is_kept() {
        let query = NearTextQuery::new(["animal"]).distance(0.3);
        assert_eq!(query.threshold, Some(Threshold::Distance(0.3)));
    }

    #[test]
    fn test_move_carries_concepts_or_objects() {
        let bias = Move::concepts(0.5, ["wild cats"]);
        assert_eq!(bias.concepts, vec!["wild cats".to_string()]);
        assert!(bias.objects.is_empty());
    }
}
