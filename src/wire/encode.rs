//! Request encoding
//!
//! One exhaustive pass from a composed query value to the discriminated
//! request message. Construction invariants that can only be checked once
//! the whole value is assembled (manual weight counts, empty target lists)
//! are enforced here, still before anything reaches the network.

use super::request::*;
use super::vectors;
use crate::error::ConstructionError;
use crate::filter::path::ID_PATH;
use crate::filter::{Comparison, ComparisonOperator, Operand, Predicate};
use crate::query::{
    AggregateQuery, CombinationMethod, ConsistencyLevel, Fusion, GenerativeRequest, GroupBySpec,
    HybridNear, HybridQuery, MediaKind, MetadataRequest, Metric, Move, NearTextQuery,
    NearVectorQuery, PropertySelection, QueryOptions, ReferenceSelection, SearchOperator,
    SearchQuery, TargetSpec, Threshold, TokenOperator, VectorTarget,
};
use indexmap::IndexMap;
use tracing::debug;

/// Encode a composed search into one request message
pub fn encode_search(
    collection: &str,
    query: &SearchQuery,
) -> Result<SearchRequest, ConstructionError> {
    let (wire_query, identity) = encode_operator(query.operator())?;
    let options = query.options();
    let filters = merge_filters(identity, options.filter.as_ref());

    debug!(collection, "encoded search request");
    Ok(SearchRequest {
        collection: collection.to_owned(),
        query: wire_query,
        group_by: query.group_by_spec().map(encode_group_by),
        limit: options.limit,
        offset: options.offset,
        after: options.after.map(|id| id.to_string()),
        autocut: options.autocut,
        consistency_level: options.consistency_level.map(encode_consistency),
        filters,
        generative: options.generative.as_ref().map(encode_generative),
        metadata_request: encode_metadata(&options.return_metadata),
        properties_request: encode_properties(options),
        vectors_request: options.return_vectors.clone(),
    })
}

/// Encode an aggregate query into one request message
pub fn encode_aggregate(
    collection: &str,
    query: &AggregateQuery,
) -> Result<AggregateRequest, ConstructionError> {
    let (wire_query, identity) = encode_operator(query.operator())?;
    let filters = merge_filters(identity, query.filter.as_ref());

    debug!(collection, "encoded aggregate request");
    Ok(AggregateRequest {
        collection: collection.to_owned(),
        query: wire_query,
        filters,
        aggregations: query
            .aggregations()
            .iter()
            .map(|agg| WireAggregation {
                property: agg.property.clone(),
                metrics: agg.metrics.iter().copied().map(encode_metric).collect(),
            })
            .collect(),
        group_by: query.group_by_property.clone(),
        object_limit: query.object_limit,
        total_count: query.total_count,
    })
}

/// Encode the active operator variant.
///
/// `ById` contributes no search body of its own; it becomes a plain fetch
/// plus a forced UUID-equality filter on the identity path, returned
/// separately so it can be merged with any caller filter.
fn encode_operator(
    operator: &SearchOperator,
) -> Result<(WireQuery, Option<FilterNode>), ConstructionError> {
    match operator {
        SearchOperator::NearVector(q) => Ok((WireQuery::NearVector(encode_near_vector(q)?), None)),
        SearchOperator::NearText(q) => Ok((WireQuery::NearText(encode_near_text(q)), None)),
        SearchOperator::NearObject(q) => {
            let (certainty, distance) = encode_threshold(q.threshold);
            Ok((
                WireQuery::NearObject(NearObjectBody {
                    id: q.id.to_string(),
                    certainty,
                    distance,
                }),
                None,
            ))
        }
        SearchOperator::NearMedia(q) => {
            let (certainty, distance) = encode_threshold(q.threshold);
            Ok((
                WireQuery::NearMedia(NearMediaBody {
                    medium: encode_medium(q.kind),
                    payload: q.payload.clone(),
                    certainty,
                    distance,
                }),
                None,
            ))
        }
        SearchOperator::Hybrid(q) => Ok((WireQuery::Hybrid(encode_hybrid(q)?), None)),
        SearchOperator::Bm25(q) => Ok((
            WireQuery::Bm25(Bm25Body {
                query: q.query.clone(),
                properties: q.properties.clone(),
                operator: q.operator.map(encode_token_operator),
            }),
            None,
        )),
        SearchOperator::FetchObjects => Ok((WireQuery::Fetch(FetchBody::default()), None)),
        SearchOperator::ById(id) => {
            let identity = FilterNode {
                operator: WireFilterOperator::Equal,
                path: vec![ID_PATH.to_owned()],
                operands: Vec::new(),
                value: Some(WireValue::Text(id.to_string())),
            };
            Ok((WireQuery::Fetch(FetchBody::default()), Some(identity)))
        }
    }
}

fn encode_near_vector(query: &NearVectorQuery) -> Result<NearVectorBody, ConstructionError> {
    let (vectors, targets) = resolve_targets(&query.target)?;
    let (certainty, distance) = encode_threshold(query.threshold);
    Ok(NearVectorBody {
        vectors,
        targets,
        certainty,
        distance,
    })
}

/// Resolve a target spec into packed query vectors plus the named-target
/// declaration.
///
/// Query vectors bound to the same target name are grouped together in
/// first-appearance order; a target may carry more than one query vector.
fn resolve_targets(
    spec: &TargetSpec,
) -> Result<(Vec<WireVector>, Option<WireTargets>), ConstructionError> {
    match spec {
        TargetSpec::Single(target) => {
            let (type_tag, payload) = vectors::pack(&target.input)?;
            let declaration = target.name.as_ref().map(|name| WireTargets {
                combination: None,
                targets: vec![WireTargetRef {
                    name: name.clone(),
                    weight: target.weight,
                }],
            });
            Ok((
                vec![WireVector {
                    name: target.name.clone(),
                    type_tag,
                    payload,
                }],
                declaration,
            ))
        }
        TargetSpec::Combined(combined) => {
            if combined.targets.is_empty() {
                return Err(ConstructionError::EmptyTargetList);
            }

            let mut grouped: IndexMap<String, (Option<f32>, Vec<&VectorTarget>)> = IndexMap::new();
            for target in &combined.targets {
                let name = target
                    .name
                    .as_ref()
                    .ok_or(ConstructionError::UnnamedCombinedTarget)?;
                let entry = grouped
                    .entry(name.clone())
                    .or_insert_with(|| (target.weight, Vec::new()));
                if entry.0.is_none() {
                    entry.0 = target.weight;
                }
                entry.1.push(target);
            }

            if combined.method == CombinationMethod::ManualWeights {
                let weighted = combined
                    .targets
                    .iter()
                    .filter(|t| t.weight.is_some())
                    .count();
                if weighted != combined.targets.len() {
                    return Err(ConstructionError::ManualWeightMismatch {
                        targets: combined.targets.len(),
                        weights: weighted,
                    });
                }
            }

            let mut wire_vectors = Vec::with_capacity(combined.targets.len());
            let mut declarations = Vec::with_capacity(grouped.len());
            for (name, (weight, members)) in &grouped {
                for member in members {
                    let (type_tag, payload) = vectors::pack(&member.input)?;
                    wire_vectors.push(WireVector {
                        name: Some(name.clone()),
                        type_tag,
                        payload,
                    });
                }
                declarations.push(WireTargetRef {
                    name: name.clone(),
                    weight: *weight,
                });
            }

            Ok((
                wire_vectors,
                Some(WireTargets {
                    combination: Some(encode_combination(combined.method)),
                    targets: declarations,
                }),
            ))
        }
    }
}

fn encode_combination(method: CombinationMethod) -> WireCombination {
    match method {
        CombinationMethod::Sum => WireCombination::Sum,
        CombinationMethod::Minimum => WireCombination::Min,
        CombinationMethod::Average => WireCombination::Average,
        CombinationMethod::RelativeScore => WireCombination::RelativeScore,
        CombinationMethod::ManualWeights => WireCombination::ManualWeights,
    }
}

fn encode_near_text(query: &NearTextQuery) -> NearTextBody {
    let (certainty, distance) = encode_threshold(query.threshold);
    NearTextBody {
        concepts: query.concepts.clone(),
        move_to: query.move_to.as_ref().map(encode_move),
        move_away: query.move_away.as_ref().map(encode_move),
        certainty,
        distance,
    }
}

fn encode_move(bias: &Move) -> WireMove {
    WireMove {
        force: bias.force,
        concepts: bias.concepts.clone(),
        objects: bias.objects.iter().map(|id| id.to_string()).collect(),
    }
}

fn encode_hybrid(query: &HybridQuery) -> Result<HybridBody, ConstructionError> {
    let (near_vector, near_text) = match &query.near {
        Some(HybridNear::Vector(nv)) => (Some(encode_near_vector(nv)?), None),
        Some(HybridNear::Text(nt)) => (None, Some(encode_near_text(nt))),
        None => (None, None),
    };

    Ok(HybridBody {
        query: query.query.clone(),
        alpha: query.alpha,
        properties: query
            .properties
            .iter()
            .map(|p| WireWeightedProperty {
                name: p.name.clone(),
                weight: p.weight,
            })
            .collect(),
        fusion: encode_fusion(query.fusion),
        near_vector,
        near_text,
        max_vector_distance: query.max_vector_distance,
    })
}

fn encode_fusion(fusion: Fusion) -> WireFusion {
    match fusion {
        Fusion::Ranked => WireFusion::Ranked,
        Fusion::RelativeScore => WireFusion::RelativeScore,
    }
}

fn encode_token_operator(operator: TokenOperator) -> WireTokenOperator {
    match operator {
        TokenOperator::And => WireTokenOperator::And,
        TokenOperator::Or { minimum_match } => WireTokenOperator::Or { minimum_match },
    }
}

fn encode_medium(kind: MediaKind) -> WireMedium {
    match kind {
        MediaKind::Image => WireMedium::Image,
        MediaKind::Audio => WireMedium::Audio,
        MediaKind::Video => WireMedium::Video,
        MediaKind::Thermal => WireMedium::Thermal,
        MediaKind::Depth => WireMedium::Depth,
        MediaKind::Imu => WireMedium::Imu,
    }
}

/// Split a threshold into the wire's certainty/distance fields.
///
/// At most one side is ever set; certainty wins by construction.
fn encode_threshold(threshold: Option<Threshold>) -> (Option<f64>, Option<f64>) {
    match threshold {
        Some(Threshold::Certainty(value)) => (Some(value), None),
        Some(Threshold::Distance(value)) => (None, Some(value)),
        None => (None, None),
    }
}

fn merge_filters(
    identity: Option<FilterNode>,
    filter: Option<&Predicate>,
) -> Option<FilterNode> {
    let encoded = filter.and_then(encode_filter);
    match (identity, encoded) {
        (Some(forced), Some(user)) => Some(FilterNode {
            operator: WireFilterOperator::And,
            path: Vec::new(),
            operands: vec![forced, user],
            value: None,
        }),
        (Some(forced), None) => Some(forced),
        (None, user) => user,
    }
}

/// Encode a predicate, omitting the node entirely when it is vacuous
pub fn encode_filter(predicate: &Predicate) -> Option<FilterNode> {
    if predicate.is_empty() {
        return None;
    }
    match predicate {
        Predicate::And(children) => Some(FilterNode {
            operator: WireFilterOperator::And,
            path: Vec::new(),
            operands: children.iter().filter_map(encode_filter).collect(),
            value: None,
        }),
        Predicate::Or(children) => Some(FilterNode {
            operator: WireFilterOperator::Or,
            path: Vec::new(),
            operands: children.iter().filter_map(encode_filter).collect(),
            value: None,
        }),
        Predicate::Not(child) => Some(FilterNode {
            operator: WireFilterOperator::Not,
            path: Vec::new(),
            operands: encode_filter(child).into_iter().collect(),
            value: None,
        }),
        Predicate::Comparison(comparison) => Some(encode_comparison(comparison)),
    }
}

fn encode_comparison(comparison: &Comparison) -> FilterNode {
    FilterNode {
        operator: encode_comparison_operator(comparison.operator),
        path: comparison.path.segments().to_vec(),
        operands: Vec::new(),
        value: Some(encode_operand(&comparison.operand)),
    }
}

fn encode_comparison_operator(operator: ComparisonOperator) -> WireFilterOperator {
    match operator {
        ComparisonOperator::Equal => WireFilterOperator::Equal,
        ComparisonOperator::NotEqual => WireFilterOperator::NotEqual,
        ComparisonOperator::LessThan => WireFilterOperator::LessThan,
        ComparisonOperator::LessThanEqual => WireFilterOperator::LessThanEqual,
        ComparisonOperator::GreaterThan => WireFilterOperator::GreaterThan,
        ComparisonOperator::GreaterThanEqual => WireFilterOperator::GreaterThanEqual,
        ComparisonOperator::Like => WireFilterOperator::Like,
        ComparisonOperator::IsNull => WireFilterOperator::IsNull,
        ComparisonOperator::ContainsAny => WireFilterOperator::ContainsAny,
        ComparisonOperator::ContainsAll => WireFilterOperator::ContainsAll,
        ComparisonOperator::ContainsNone => WireFilterOperator::ContainsNone,
        ComparisonOperator::WithinGeoRange => WireFilterOperator::WithinGeoRange,
    }
}

fn encode_operand(operand: &Operand) -> WireValue {
    match operand {
        Operand::Text(v) => WireValue::Text(v.clone()),
        Operand::Bool(v) => WireValue::Bool(*v),
        Operand::Int(v) => WireValue::Int(*v),
        Operand::Float(v) => WireValue::Float(*v),
        Operand::Date(v) => WireValue::Date(v.to_rfc3339()),
        Operand::GeoRange(v) => WireValue::Geo(WireGeoRange {
            latitude: v.latitude,
            longitude: v.longitude,
            max_distance_meters: v.max_distance_meters,
        }),
        Operand::TextArray(v) => WireValue::TextArray(v.clone()),
        Operand::BoolArray(v) => WireValue::BoolArray(v.clone()),
        Operand::IntArray(v) => WireValue::IntArray(v.clone()),
        Operand::FloatArray(v) => WireValue::FloatArray(v.clone()),
        Operand::DateArray(v) => {
            WireValue::DateArray(v.iter().map(|d| d.to_rfc3339()).collect())
        }
    }
}

fn encode_group_by(spec: &GroupBySpec) -> WireGroupBy {
    WireGroupBy {
        path: spec.path.clone(),
        number_of_groups: spec.max_groups,
        objects_per_group: spec.max_objects_per_group,
    }
}

fn encode_consistency(level: ConsistencyLevel) -> WireConsistency {
    match level {
        ConsistencyLevel::One => WireConsistency::One,
        ConsistencyLevel::Quorum => WireConsistency::Quorum,
        ConsistencyLevel::All => WireConsistency::All,
    }
}

fn encode_generative(request: &GenerativeRequest) -> WireGenerative {
    WireGenerative {
        single_prompt: request.single_prompt.clone(),
        grouped_task: request.grouped_task.clone(),
        grouped_properties: request.grouped_properties.clone(),
    }
}

fn encode_metadata(request: &MetadataRequest) -> WireMetadataRequest {
    WireMetadataRequest {
        uuid: request.uuid,
        vector: request.vector,
        creation_time: request.creation_time,
        last_update_time: request.last_update_time,
        distance: request.distance,
        certainty: request.certainty,
        score: request.score,
        explain_score: request.explain_score,
        is_consistent: request.is_consistent,
    }
}

fn encode_properties(options: &QueryOptions) -> Option<WirePropertiesRequest> {
    if options.return_properties.is_none() && options.return_references.is_empty() {
        return None;
    }
    Some(WirePropertiesRequest {
        return_all: matches!(options.return_properties, Some(PropertySelection::All)),
        non_ref_properties: match &options.return_properties {
            Some(PropertySelection::Named(names)) => names.clone(),
            _ => Vec::new(),
        },
        ref_properties: options
            .return_references
            .iter()
            .map(encode_reference)
            .collect(),
    })
}

fn encode_reference(reference: &ReferenceSelection) -> WireRefProperties {
    WireRefProperties {
        link_on: reference.link_on.clone(),
        target_collection: reference.target_collection.clone(),
        properties: reference.properties.as_ref().map(|selection| {
            Box::new(WirePropertiesRequest {
                return_all: matches!(selection, PropertySelection::All),
                non_ref_properties: match selection {
                    PropertySelection::Named(names) => names.clone(),
                    PropertySelection::All => Vec::new(),
                },
                ref_properties: Vec::new(),
            })
        }),
        metadata: encode_metadata(&reference.metadata),
    }
}

fn encode_metric(metric: Metric) -> WireMetric {
    match metric {
        Metric::Count => WireMetric::Count,
        Metric::Minimum => WireMetric::Minimum,
        Metric::Maximum => WireMetric::Maximum,
        Metric::Mean => WireMetric::Mean,
        Metric::Median => WireMetric::Median,
        Metric::Mode => WireMetric::Mode,
        Metric::Sum => WireMetric::Sum,
    }
}
