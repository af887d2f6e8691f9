//! Typed operands for comparison predicates

use crate::error::ConstructionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geographic range operand: a circle around a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRange {
    pub latitude: f64,
    pub longitude: f64,
    pub max_distance_meters: f64,
}

impl GeoRange {
    pub fn new(latitude: f64, longitude: f64, max_distance_meters: f64) -> Self {
        Self {
            latitude,
            longitude,
            max_distance_meters,
        }
    }
}

/// A typed comparison operand.
///
/// Exactly one scalar value or one non-empty homogeneous array. Array
/// variants are only constructible through the fallible conversions, which
/// reject empty input at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Operand {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(DateTime<Utc>),
    GeoRange(GeoRange),
    TextArray(Vec<String>),
    BoolArray(Vec<bool>),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
    DateArray(Vec<DateTime<Utc>>),
}

impl Operand {
    /// Operand kind name, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Text(_) => "text",
            Operand::Bool(_) => "bool",
            Operand::Int(_) => "int",
            Operand::Float(_) => "float",
            Operand::Date(_) => "date",
            Operand::GeoRange(_) => "geo_range",
            Operand::TextArray(_) => "text_array",
            Operand::BoolArray(_) => "bool_array",
            Operand::IntArray(_) => "int_array",
            Operand::FloatArray(_) => "float_array",
            Operand::DateArray(_) => "date_array",
        }
    }

    /// Build an operand from a dynamic JSON value.
    ///
    /// Arrays must be non-empty and homogeneous; nested arrays, objects and
    /// null are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ConstructionError> {
        use serde_json::Value;

        match value {
            Value::String(s) => Ok(Operand::Text(s.clone())),
            Value::Bool(b) => Ok(Operand::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Operand::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Operand::Float(f))
                } else {
                    Err(ConstructionError::UnsupportedOperand(n.to_string()))
                }
            }
            Value::Array(items) => Self::array_from_json(items),
            Value::Null => Err(ConstructionError::UnsupportedOperand("null".to_string())),
            Value::Object(_) => Err(ConstructionError::UnsupportedOperand("object".to_string())),
        }
    }

    fn array_from_json(items: &[serde_json::Value]) -> Result<Self, ConstructionError> {
        let first = items.first().ok_or(ConstructionError::EmptyOperandList)?;

        let head = Self::from_json(first)?;
        match head {
            Operand::Text(_) => collect_homogeneous(items, "text", |v| {
                v.as_str().map(str::to_owned)
            })
            .map(Operand::TextArray),
            Operand::Bool(_) => {
                collect_homogeneous(items, "bool", serde_json::Value::as_bool).map(Operand::BoolArray)
            }
            Operand::Int(_) => {
                collect_homogeneous(items, "int", serde_json::Value::as_i64).map(Operand::IntArray)
            }
            Operand::Float(_) => {
                collect_homogeneous(items, "float", serde_json::Value::as_f64).map(Operand::FloatArray)
            }
            other => Err(ConstructionError::UnsupportedOperand(format!(
                "array of {}",
                other.kind()
            ))),
        }
    }
}

fn collect_homogeneous<T>(
    items: &[serde_json::Value],
    expected: &str,
    extract: impl Fn(&serde_json::Value) -> Option<T>,
) -> Result<Vec<T>, ConstructionError> {
    items
        .iter()
        .map(|item| {
            extract(item).ok_or_else(|| ConstructionError::MixedOperandArray {
                expected: expected.to_string(),
                found: json_kind(item).to_string(),
            })
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(n) if n.as_i64().is_some() => "int",
        serde_json::Value::Number(_) => "float",
        serde_json::Value::String(_) => "text",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Conversion into a typed operand.
///
/// Scalar conversions are infallible; array conversions reject empty input
/// with [`ConstructionError::EmptyOperandList`] before anything reaches the
/// wire.
pub trait IntoOperand {
    fn into_operand(self) -> Result<Operand, ConstructionError>;
}

impl IntoOperand for Operand {
    fn into_operand(self) -> Result<Operand, ConstructionError> {
        Ok(self)
    }
}

macro_rules! scalar_operand {
    ($ty:ty, $variant:ident) => {
        impl IntoOperand for $ty {
            fn into_operand(self) -> Result<Operand, ConstructionError> {
                Ok(Operand::$variant(self.into()))
            }
        }
    };
}

scalar_operand!(String, Text);
scalar_operand!(bool, Bool);
scalar_operand!(i64, Int);
scalar_operand!(f64, Float);
scalar_operand!(GeoRange, GeoRange);
scalar_operand!(DateTime<Utc>, Date);

impl IntoOperand for &str {
    fn into_operand(self) -> Result<Operand, ConstructionError> {
        Ok(Operand::Text(self.to_owned()))
    }
}

impl IntoOperand for i32 {
    fn into_operand(self) -> Result<Operand, ConstructionError> {
        Ok(Operand::Int(i64::from(self)))
    }
}

impl IntoOperand for f32 {
    fn into_operand(self) -> Result<Operand, ConstructionError> {
        Ok(Operand::Float(f64::from(self)))
    }
}

impl IntoOperand for Uuid {
    fn into_operand(self) -> Result<Operand, ConstructionError> {
        Ok(Operand::Text(self.to_string()))
    }
}

macro_rules! array_operand {
    ($ty:ty, $variant:ident) => {
        impl IntoOperand for Vec<$ty> {
            fn into_operand(self) -> Result<Operand, ConstructionError> {
                if self.is_empty() {
                    return Err(ConstructionError::EmptyOperandList);
                }
                Ok(Operand::$variant(self))
            }
        }
    };
}

array_operand!(String, TextArray);
array_operand!(bool, BoolArray);
array_operand!(i64, IntArray);
array_operand!(f64, FloatArray);
array_operand!(DateTime<Utc>, DateArray);

impl IntoOperand for Vec<&str> {
    fn into_operand(self) -> Result<Operand, ConstructionError> {
        if self.is_empty() {
            return Err(ConstructionError::EmptyOperandList);
        }
        Ok(Operand::TextArray(
            self.into_iter().map(str::to_owned).collect(),
        ))
    }
}

impl IntoOperand for Vec<Uuid> {
    fn into_operand(self) -> Result<Operand, ConstructionError> {
        if self.is_empty() {
            return Err(ConstructionError::EmptyOperandList);
        }
        Ok(Operand::TextArray(
            self.into_iter().map(|id| id.to_string()).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(
            "orange".into_operand().unwrap(),
            Operand::Text("orange".to_string())
        );
        assert_eq!(5i64.into_operand().unwrap(), Operand::Int(5));
        assert_eq!(true.into_operand().unwrap(), Operand::Bool(true));
    }

    #[test]
    fn test_empty_array_is_rejected() {
        let result = Vec::<String>::new().into_operand();
        assert_eq!(result, Err(ConstructionError::EmptyOperandList));
    }

    #[test]
    fn test_from_json_rejects_mixed_array() {
        let value = serde_json::json!(["a", 1]);
        let err = Operand::from_json(&value).unwrap_err();
        assert!(matches!(err, ConstructionError::MixedOperandArray { .. }));
    }

    #[test]
    fn test_from_json_rejects_empty_array() {
        let value = serde_json::json!([]);
        assert_eq!(
            Operand::from_json(&value),
            Err(ConstructionError::EmptyOperandList)
        );
    }

    #[test]
    fn test_from_json_homogeneous_array() {
        let value = serde_json::json!([1, 2, 3]);
        assert_eq!(
            Operand::from_json(&value).unwrap(),
            Operand::IntArray(vec![1, 2, 3])
        );
    }
}
