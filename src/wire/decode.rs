//! Response decoding
//!
//! Strict for required fields on the active result path (a missing or
//! invalid id is a decode defect), permissive for optional
//! forward-compatible data (unrecognized vector type tags are skipped).

use super::response::{
    AggregateGroupEntry, AggregateReply, GroupEntry, ResultEntry, SearchReply,
};
use super::vectors;
use crate::error::DecodeError;
use crate::results::{
    AggregateGroup, AggregateResults, Group, GroupMember, GroupedResults, PropertiesDeserializer,
    PropertyStats, ResultMetadata, ResultObject,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;
use uuid::Uuid;

/// Decode a flat (ungrouped) reply into result objects
pub fn decode_results(
    collection: &str,
    reply: &SearchReply,
    properties: &dyn PropertiesDeserializer,
) -> Result<Vec<ResultObject>, DecodeError> {
    reply
        .results
        .iter()
        .map(|entry| decode_entry(collection, entry, properties))
        .collect()
}

/// Decode a grouped reply, reconstructing the ordered group map and the
/// flattened member list
pub fn decode_grouped(
    collection: &str,
    reply: &SearchReply,
    properties: &dyn PropertiesDeserializer,
) -> Result<GroupedResults, DecodeError> {
    let mut groups: IndexMap<String, Group> = IndexMap::with_capacity(reply.group_by_results.len());
    let mut objects = Vec::new();

    for entry in &reply.group_by_results {
        let group = decode_group(collection, entry, properties)?;
        for member in &group.members {
            objects.push(GroupMember {
                belongs_to_group: group.name.clone(),
                object: member.clone(),
            });
        }
        if groups.insert(group.name.clone(), group).is_some() {
            return Err(DecodeError::Decoding(format!(
                "duplicate group name {:?} in response",
                entry.name
            )));
        }
    }

    Ok(GroupedResults { groups, objects })
}

fn decode_group(
    collection: &str,
    entry: &GroupEntry,
    properties: &dyn PropertiesDeserializer,
) -> Result<Group, DecodeError> {
    let members = entry
        .members
        .iter()
        .map(|member| decode_entry(collection, member, properties))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Group {
        name: entry.name.clone(),
        min_distance: entry.min_distance,
        max_distance: entry.max_distance,
        number_of_objects: entry.number_of_objects,
        members,
    })
}

fn decode_entry(
    collection: &str,
    entry: &ResultEntry,
    properties: &dyn PropertiesDeserializer,
) -> Result<ResultObject, DecodeError> {
    let raw_id = entry
        .metadata
        .id
        .as_deref()
        .ok_or(DecodeError::MissingField("metadata.id"))?;
    let id = Uuid::parse_str(raw_id).map_err(|e| DecodeError::InvalidId {
        value: raw_id.to_owned(),
        reason: e.to_string(),
    })?;

    let mut decoded_vectors = IndexMap::with_capacity(entry.metadata.vectors.len());
    for vector in &entry.metadata.vectors {
        match vectors::unpack(&vector.name, vector.type_tag, &vector.payload)? {
            Some(values) => {
                decoded_vectors.insert(vector.name.clone(), values);
            }
            None => {
                debug!(
                    name = %vector.name,
                    type_tag = vector.type_tag,
                    "skipping vector with unrecognized type tag"
                );
            }
        }
    }

    Ok(ResultObject {
        id,
        properties: properties.deserialize(collection, &entry.properties)?,
        metadata: ResultMetadata {
            distance: entry.metadata.distance,
            certainty: entry.metadata.certainty,
            score: entry.metadata.score,
            explain_score: entry.metadata.explain_score.clone(),
            creation_time: entry.metadata.creation_time_unix.and_then(millis_to_utc),
            last_update_time: entry.metadata.last_update_time_unix.and_then(millis_to_utc),
            is_consistent: entry.metadata.is_consistent,
        },
        vectors: decoded_vectors,
        generated: entry.generative.clone(),
    })
}

fn millis_to_utc(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Decode an aggregate reply
pub fn decode_aggregate(reply: &AggregateReply) -> Result<AggregateResults, DecodeError> {
    let groups = reply
        .groups
        .iter()
        .map(decode_aggregate_group)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AggregateResults { groups })
}

fn decode_aggregate_group(entry: &AggregateGroupEntry) -> Result<AggregateGroup, DecodeError> {
    let mut properties = IndexMap::with_capacity(entry.properties.len());
    for stats in &entry.properties {
        properties.insert(
            stats.property.clone(),
            PropertyStats {
                count: stats.count,
                minimum: stats.minimum,
                maximum: stats.maximum,
                mean: stats.mean,
                median: stats.median,
                mode: stats.mode,
                sum: stats.sum,
            },
        );
    }

    Ok(AggregateGroup {
        grouped_by: entry
            .grouped_by
            .as_ref()
            .map(|key| (key.path.clone(), key.value.to_json())),
        total_count: entry.total_count,
        properties,
    })
}
