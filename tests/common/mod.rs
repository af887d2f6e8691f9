//! In-memory transport used by the integration tests.
//!
//! Implements the transport seam with a tiny stand-in server: it decodes
//! request messages, applies filters, cursors, limits and grouping over a
//! fixed dataset, and encodes reply messages with the real wire shapes.

use async_trait::async_trait;
use bytes::Bytes;
use meridian_client::error::Result;
use meridian_client::transport::{Procedure, RequestDescriptor, Transport};
use meridian_client::wire::request::{
    AggregateRequest, FilterNode, SearchRequest, WireFilterOperator, WireMetric, WireQuery,
    WireValue,
};
use meridian_client::wire::response::{
    AggregateGroupEntry, AggregateReply, GroupEntry, ResultEntry, SearchReply, WireGroupedBy,
    WirePropertyStats, WireResultMetadata, WireVectorPayload,
};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct MockObject {
    pub id: Uuid,
    pub properties: serde_json::Value,
}

impl MockObject {
    pub fn new(id: Uuid, properties: serde_json::Value) -> Self {
        Self { id, properties }
    }
}

/// Deterministic ids so tests can reason about order
pub fn test_uuid(n: u32) -> Uuid {
    Uuid::from_u128(0x1000_0000_0000_0000_0000_0000_0000_0000u128 + n as u128)
}

/// Opt-in test logging; respects RUST_LOG
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub struct InMemoryTransport {
    objects: Vec<MockObject>,
    pub search_requests: Mutex<Vec<SearchRequest>>,
}

impl InMemoryTransport {
    pub fn new(objects: Vec<MockObject>) -> Self {
        Self {
            objects,
            search_requests: Mutex::new(Vec::new()),
        }
    }

    fn handle_search(&self, request: &SearchRequest) -> SearchReply {
        let matched: Vec<&MockObject> = self
            .objects
            .iter()
            .filter(|object| eval_filter(request.filters.as_ref(), object))
            .collect();

        // resume-after cursor: everything strictly after the last-seen id
        let after = request
            .after
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok());
        let start = match after {
            Some(id) => matched
                .iter()
                .position(|object| object.id == id)
                .map(|pos| pos + 1)
                .unwrap_or(matched.len()),
            None => 0,
        };
        let limit = request.limit.unwrap_or(u32::MAX) as usize;

        if let Some(group_by) = &request.group_by {
            let mut groups: Vec<(String, Vec<(usize, &MockObject)>)> = Vec::new();
            for (index, object) in matched.iter().copied().enumerate().skip(start) {
                let key = lookup(object, &[group_by.path.clone()])
                    .map(value_label)
                    .unwrap_or_default();
                match groups.iter().position(|(name, _)| *name == key) {
                    Some(pos) => groups[pos].1.push((index, object)),
                    None => groups.push((key, vec![(index, object)])),
                }
            }
            groups.truncate(group_by.number_of_groups as usize);

            let group_by_results = groups
                .into_iter()
                .map(|(name, members)| {
                    let members: Vec<(usize, &MockObject)> = members
                        .into_iter()
                        .take(group_by.objects_per_group as usize)
                        .collect();
                    let distances: Vec<f32> =
                        members.iter().map(|(index, _)| fake_distance(*index)).collect();
                    GroupEntry {
                        name,
                        min_distance: distances.iter().copied().fold(f32::MAX, f32::min),
                        max_distance: distances.iter().copied().fold(f32::MIN, f32::max),
                        number_of_objects: members.len() as i64,
                        members: members
                            .iter()
                            .map(|(index, object)| result_entry(request, object, *index))
                            .collect(),
                    }
                })
                .collect();

            return SearchReply {
                group_by_results,
                ..Default::default()
            };
        }

        SearchReply {
            results: matched
                .iter()
                .copied()
                .enumerate()
                .skip(start)
                .take(limit)
                .map(|(index, object)| result_entry(request, object, index))
                .collect(),
            ..Default::default()
        }
    }

    fn handle_aggregate(&self, request: &AggregateRequest) -> AggregateReply {
        let matched: Vec<&MockObject> = self
            .objects
            .iter()
            .filter(|object| eval_filter(request.filters.as_ref(), object))
            .collect();

        let mut groups: Vec<(Option<WireGroupedBy>, Vec<&MockObject>)> = Vec::new();
        match &request.group_by {
            Some(path) => {
                for object in matched {
                    let value = lookup(object, &[path.clone()]).map(json_to_wire);
                    let key = value.map(|value| WireGroupedBy {
                        path: path.clone(),
                        value,
                    });
                    match groups.iter().position(|(existing, _)| *existing == key) {
                        Some(pos) => groups[pos].1.push(object),
                        None => groups.push((key, vec![object])),
                    }
                }
            }
            None => groups.push((None, matched)),
        }

        AggregateReply {
            groups: groups
                .into_iter()
                .map(|(grouped_by, members)| AggregateGroupEntry {
                    grouped_by,
                    total_count: request.total_count.then_some(members.len() as i64),
                    properties: request
                        .aggregations
                        .iter()
                        .map(|agg| property_stats(&agg.property, &agg.metrics, &members))
                        .collect(),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn perform_request(
        &self,
        message: Bytes,
        descriptor: &RequestDescriptor,
    ) -> Result<Bytes> {
        let reply = match descriptor.procedure {
            Procedure::Search => {
                let request: SearchRequest =
                    rmp_serde::from_slice(&message).expect("well-formed search request");
                let reply = self.handle_search(&request);
                self.search_requests.lock().unwrap().push(request);
                rmp_serde::to_vec_named(&reply).expect("encodable reply")
            }
            Procedure::Aggregate => {
                let request: AggregateRequest =
                    rmp_serde::from_slice(&message).expect("well-formed aggregate request");
                let reply = self.handle_aggregate(&request);
                rmp_serde::to_vec_named(&reply).expect("encodable reply")
            }
        };
        Ok(Bytes::from(reply))
    }
}

fn fake_distance(index: usize) -> f32 {
    0.01 * (index + 1) as f32
}

fn result_entry(request: &SearchRequest, object: &MockObject, index: usize) -> ResultEntry {
    // echo near-vector query payloads back as returned named vectors
    let vectors = match &request.query {
        WireQuery::NearVector(body) => body
            .vectors
            .iter()
            .map(|vector| WireVectorPayload {
                name: vector.name.clone().unwrap_or_else(|| "default".to_owned()),
                type_tag: vector.type_tag,
                payload: vector.payload.clone(),
            })
            .collect(),
        _ => Vec::new(),
    };

    ResultEntry {
        metadata: WireResultMetadata {
            id: Some(object.id.to_string()),
            distance: Some(fake_distance(index)),
            certainty: Some(1.0 - fake_distance(index)),
            score: None,
            explain_score: None,
            creation_time_unix: None,
            last_update_time_unix: None,
            is_consistent: None,
            vectors,
        },
        properties: Bytes::from(
            rmp_serde::to_vec_named(&object.properties).expect("encodable properties"),
        ),
        generative: None,
    }
}

fn property_stats(
    property: &str,
    metrics: &[WireMetric],
    members: &[&MockObject],
) -> WirePropertyStats {
    let values: Vec<f64> = members
        .iter()
        .filter_map(|object| {
            lookup(object, &[property.to_owned()]).and_then(|value| value.as_f64())
        })
        .collect();

    let mut stats = WirePropertyStats {
        property: property.to_owned(),
        ..Default::default()
    };
    for metric in metrics {
        match metric {
            WireMetric::Count => stats.count = Some(values.len() as i64),
            WireMetric::Minimum => {
                stats.minimum = values.iter().copied().fold(None, |acc: Option<f64>, v| {
                    Some(acc.map_or(v, |a| a.min(v)))
                })
            }
            WireMetric::Maximum => {
                stats.maximum = values.iter().copied().fold(None, |acc: Option<f64>, v| {
                    Some(acc.map_or(v, |a| a.max(v)))
                })
            }
            WireMetric::Mean => {
                stats.mean = (!values.is_empty())
                    .then(|| values.iter().sum::<f64>() / values.len() as f64)
            }
            WireMetric::Median => {
                let mut sorted = values.clone();
                sorted.sort_by(f64::total_cmp);
                stats.median = (!sorted.is_empty()).then(|| sorted[sorted.len() / 2]);
            }
            WireMetric::Mode => {
                stats.mode = values.first().copied();
            }
            WireMetric::Sum => stats.sum = Some(values.iter().sum()),
        }
    }
    stats
}

fn lookup<'a>(object: &'a MockObject, path: &[String]) -> Option<&'a serde_json::Value> {
    match path {
        [segment] if segment == "_id" => None,
        [segment] => object.properties.get(segment),
        _ => None,
    }
}

fn value_label(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_to_wire(value: &serde_json::Value) -> WireValue {
    match value {
        serde_json::Value::String(s) => WireValue::Text(s.clone()),
        serde_json::Value::Bool(b) => WireValue::Bool(*b),
        serde_json::Value::Number(n) if n.is_i64() => WireValue::Int(n.as_i64().unwrap()),
        other => WireValue::Float(other.as_f64().unwrap_or_default()),
    }
}

fn eval_filter(filter: Option<&FilterNode>, object: &MockObject) -> bool {
    match filter {
        None => true,
        Some(node) => eval_node(node, object),
    }
}

fn eval_node(node: &FilterNode, object: &MockObject) -> bool {
    match node.operator {
        WireFilterOperator::And => node.operands.iter().all(|child| eval_node(child, object)),
        WireFilterOperator::Or => node.operands.iter().any(|child| eval_node(child, object)),
        WireFilterOperator::Not => !node.operands.iter().all(|child| eval_node(child, object)),
        operator => eval_comparison(operator, node, object),
    }
}

fn eval_comparison(operator: WireFilterOperator, node: &FilterNode, object: &MockObject) -> bool {
    let value = node.value.as_ref().expect("comparison carries a value");

    // the identity path compares against the object id
    if node.path == ["_id".to_owned()] {
        if let WireValue::Text(expected) = value {
            let matches = object.id.to_string() == *expected;
            return match operator {
                WireFilterOperator::Equal => matches,
                WireFilterOperator::NotEqual => !matches,
                _ => false,
            };
        }
        return false;
    }

    let actual = match lookup(object, &node.path) {
        Some(actual) => actual,
        None => return matches!(operator, WireFilterOperator::IsNull if *value == WireValue::Bool(true)),
    };

    match operator {
        WireFilterOperator::Equal => wire_eq(value, actual),
        WireFilterOperator::NotEqual => !wire_eq(value, actual),
        WireFilterOperator::LessThan => compare(actual, value, |ord| ord < 0.0),
        WireFilterOperator::LessThanEqual => compare(actual, value, |ord| ord <= 0.0),
        WireFilterOperator::GreaterThan => compare(actual, value, |ord| ord > 0.0),
        WireFilterOperator::GreaterThanEqual => compare(actual, value, |ord| ord >= 0.0),
        WireFilterOperator::IsNull => *value == WireValue::Bool(false),
        WireFilterOperator::ContainsAny => match value {
            WireValue::TextArray(candidates) => candidates
                .iter()
                .any(|candidate| actual.as_str() == Some(candidate.as_str())),
            _ => false,
        },
        _ => false,
    }
}

fn wire_eq(expected: &WireValue, actual: &serde_json::Value) -> bool {
    match expected {
        WireValue::Text(v) => actual.as_str() == Some(v.as_str()),
        WireValue::Bool(v) => actual.as_bool() == Some(*v),
        WireValue::Int(v) => actual.as_i64() == Some(*v),
        WireValue::Float(v) => actual.as_f64() == Some(*v),
        _ => false,
    }
}

fn compare(actual: &serde_json::Value, expected: &WireValue, check: impl Fn(f64) -> bool) -> bool {
    let expected = match expected {
        WireValue::Int(v) => *v as f64,
        WireValue::Float(v) => *v,
        _ => return false,
    };
    match actual.as_f64() {
        Some(actual) => check(actual - expected),
        None => false,
    }
}
