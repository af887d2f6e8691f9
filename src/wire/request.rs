//! Request message shapes
//!
//! These structs are the bit-exact request layout. The search kind is an
//! externally tagged enum, so the serialized message carries exactly one
//! active search-kind field; the same holds for comparison values inside
//! filter nodes.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One discriminated search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub collection: String,
    pub query: WireQuery,
    pub group_by: Option<WireGroupBy>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub after: Option<String>,
    pub autocut: Option<u32>,
    pub consistency_level: Option<WireConsistency>,
    pub filters: Option<FilterNode>,
    pub generative: Option<WireGenerative>,
    pub metadata_request: WireMetadataRequest,
    pub properties_request: Option<WirePropertiesRequest>,
    pub vectors_request: Vec<String>,
}

/// Exactly one search kind per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireQuery {
    NearVector(NearVectorBody),
    NearText(NearTextBody),
    NearObject(NearObjectBody),
    NearMedia(NearMediaBody),
    Hybrid(HybridBody),
    Bm25(Bm25Body),
    Fetch(FetchBody),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearVectorBody {
    /// Packed query vectors, grouped by target name
    pub vectors: Vec<WireVector>,
    /// Declared named targets and their combination, absent for a single
    /// unnamed target
    pub targets: Option<WireTargets>,
    pub certainty: Option<f64>,
    pub distance: Option<f64>,
}

/// One packed query vector with its type tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireVector {
    pub name: Option<String>,
    pub type_tag: u8,
    pub payload: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireTargets {
    pub combination: Option<WireCombination>,
    pub targets: Vec<WireTargetRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireTargetRef {
    pub name: String,
    pub weight: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireCombination {
    Sum,
    Min,
    Average,
    RelativeScore,
    ManualWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearTextBody {
    pub concepts: Vec<String>,
    pub move_to: Option<WireMove>,
    pub move_away: Option<WireMove>,
    pub certainty: Option<f64>,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMove {
    pub force: f32,
    pub concepts: Vec<String>,
    pub objects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearObjectBody {
    pub id: String,
    pub certainty: Option<f64>,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireMedium {
    Image,
    Audio,
    Video,
    Thermal,
    Depth,
    Imu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearMediaBody {
    pub medium: WireMedium,
    pub payload: Bytes,
    pub certainty: Option<f64>,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFusion {
    Ranked,
    RelativeScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireWeightedProperty {
    pub name: String,
    pub weight: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridBody {
    pub query: String,
    pub alpha: f32,
    pub properties: Vec<WireWeightedProperty>,
    pub fusion: WireFusion,
    pub near_vector: Option<NearVectorBody>,
    pub near_text: Option<NearTextBody>,
    pub max_vector_distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireTokenOperator {
    And,
    Or { minimum_match: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bm25Body {
    pub query: String,
    pub properties: Vec<String>,
    pub operator: Option<WireTokenOperator>,
}

/// Fetch constrained only by shared fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchBody {}

/// One filter node: logical operators recurse through `operands`,
/// comparison leaves set `path` and exactly one typed `value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterNode {
    pub operator: WireFilterOperator,
    pub path: Vec<String>,
    pub operands: Vec<FilterNode>,
    pub value: Option<WireValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFilterOperator {
    And,
    Or,
    Not,
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Like,
    IsNull,
    ContainsAny,
    ContainsAll,
    ContainsNone,
    WithinGeoRange,
}

/// Exactly one typed comparison value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    /// RFC 3339 timestamp
    Date(String),
    Geo(WireGeoRange),
    TextArray(Vec<String>),
    BoolArray(Vec<bool>),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
    DateArray(Vec<String>),
}

impl WireValue {
    /// Dynamic view of the value, used by group-key decoding
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            WireValue::Text(v) => json!(v),
            WireValue::Bool(v) => json!(v),
            WireValue::Int(v) => json!(v),
            WireValue::Float(v) => json!(v),
            WireValue::Date(v) => json!(v),
            WireValue::Geo(v) => json!({
                "latitude": v.latitude,
                "longitude": v.longitude,
                "max_distance_meters": v.max_distance_meters,
            }),
            WireValue::TextArray(v) => json!(v),
            WireValue::BoolArray(v) => json!(v),
            WireValue::IntArray(v) => json!(v),
            WireValue::FloatArray(v) => json!(v),
            WireValue::DateArray(v) => json!(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireGeoRange {
    pub latitude: f64,
    pub longitude: f64,
    pub max_distance_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireGroupBy {
    pub path: String,
    pub number_of_groups: u32,
    pub objects_per_group: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireConsistency {
    One,
    Quorum,
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireGenerative {
    pub single_prompt: Option<String>,
    pub grouped_task: Option<String>,
    pub grouped_properties: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMetadataRequest {
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WirePropertiesRequest {
    /// Return every non-reference property; wins over the name list
    pub return_all: bool,
    pub non_ref_properties: Vec<String>,
    pub ref_properties: Vec<WireRefProperties>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRefProperties {
    pub link_on: String,
    pub target_collection: Option<String>,
    pub properties: Option<Box<WirePropertiesRequest>>,
    pub metadata: WireMetadataRequest,
}

/// One aggregate request over the same operator set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRequest {
    pub collection: String,
    pub query: WireQuery,
    pub filters: Option<FilterNode>,
    pub aggregations: Vec<WireAggregation>,
    pub group_by: Option<String>,
    pub object_limit: Option<u32>,
    pub total_count: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAggregation {
    pub property: String,
    pub metrics: Vec<WireMetric>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireMetric {
    Count,
    Minimum,
    Maximum,
    Mean,
    Median,
    Mode,
    Sum,
}
