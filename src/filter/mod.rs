//! Boolean filter expression tree
//!
//! Predicates are immutable values composed from logical operators and typed
//! comparisons on a path root. A vacuous predicate (no operands, or only
//! empty children) is omitted from the encoded request entirely rather than
//! sent as an empty AND/OR.

pub mod operand;
pub mod path;

pub use operand::{GeoRange, IntoOperand, Operand};
pub use path::{created_at, last_updated_at, property, reference, uuid, FilterPath};

use crate::error::ConstructionError;
use serde::{Deserialize, Serialize};

/// One boolean filter node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    Comparison(Comparison),
}

/// A comparison leaf: one path, one operator, exactly one typed operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub path: FilterPath,
    pub operator: ComparisonOperator,
    pub operand: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
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

/// All operands must match
pub fn and(operands: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::And(operands.into_iter().collect())
}

/// At least one operand must match
pub fn or(operands: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::Or(operands.into_iter().collect())
}

/// The operand must not match
pub fn not(operand: Predicate) -> Predicate {
    Predicate::Not(Box::new(operand))
}

impl Predicate {
    /// True if this node carries no operands, or all children report empty.
    ///
    /// Empty predicates are dropped at encode time instead of being sent as
    /// an empty AND/OR.
    pub fn is_empty(&self) -> bool {
        match self {
            Predicate::And(children) | Predicate::Or(children) => {
                children.iter().all(Predicate::is_empty)
            }
            Predicate::Not(child) => child.is_empty(),
            Predicate::Comparison(_) => false,
        }
    }
}

impl FilterPath {
    fn compare(
        self,
        operator: ComparisonOperator,
        operand: impl IntoOperand,
    ) -> Result<Predicate, ConstructionError> {
        Ok(Predicate::Comparison(Comparison {
            path: self,
            operator,
            operand: operand.into_operand()?,
        }))
    }

    pub fn eq(self, operand: impl IntoOperand) -> Result<Predicate, ConstructionError> {
        self.compare(ComparisonOperator::Equal, operand)
    }

    pub fn ne(self, operand: impl IntoOperand) -> Result<Predicate, ConstructionError> {
        self.compare(ComparisonOperator::NotEqual, operand)
    }

    pub fn lt(self, operand: impl IntoOperand) -> Result<Predicate, ConstructionError> {
        self.compare(ComparisonOperator::LessThan, operand)
    }

    pub fn lte(self, operand: impl IntoOperand) -> Result<Predicate, ConstructionError> {
        self.compare(ComparisonOperator::LessThanEqual, operand)
    }

    pub fn gt(self, operand: impl IntoOperand) -> Result<Predicate, ConstructionError> {
        self.compare(ComparisonOperator::GreaterThan, operand)
    }

    pub fn gte(self, operand: impl IntoOperand) -> Result<Predicate, ConstructionError> {
        self.compare(ComparisonOperator::GreaterThanEqual, operand)
    }

    /// Wildcard text match (`?` one character, `*` any run)
    pub fn like(self, pattern: impl Into<String>) -> Predicate {
        Predicate::Comparison(Comparison {
            path: self,
            operator: ComparisonOperator::Like,
            operand: Operand::Text(pattern.into()),
        })
    }

    /// Match objects where the property is (or is not) null
    pub fn is_null(self, expected: bool) -> Predicate {
        Predicate::Comparison(Comparison {
            path: self,
            operator: ComparisonOperator::IsNull,
            operand: Operand::Bool(expected),
        })
    }

    pub fn contains_any(self, operand: impl IntoOperand) -> Result<Predicate, ConstructionError> {
        self.compare(ComparisonOperator::ContainsAny, operand)
    }

    pub fn contains_all(self, operand: impl IntoOperand) -> Result<Predicate, ConstructionError> {
        self.compare(ComparisonOperator::ContainsAll, operand)
    }

    pub fn contains_none(self, operand: impl IntoOperand) -> Result<Predicate, ConstructionError> {
        self.compare(ComparisonOperator::ContainsNone, operand)
    }

    pub fn within_geo_range(self, range: GeoRange) -> Predicate {
        Predicate::Comparison(Comparison {
            path: self,
            operator: ComparisonOperator::WithinGeoRange,
            operand: Operand::GeoRange(range),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_or_report_empty() {
        assert!(and([]).is_empty());
        assert!(or([]).is_empty());
        assert!(and([or([]), and([])]).is_empty());
        assert!(not(and([])).is_empty());
    }

    #[test]
    fn test_comparison_is_never_empty() {
        let pred = property("colour").eq("orange").unwrap();
        assert!(!pred.is_empty());
        assert!(!and([or([]), pred]).is_empty());
    }

    #[test]
    fn test_comparison_carries_one_operand() {
        let pred = property("size").gte(1i64).unwrap();
        match pred {
            Predicate::Comparison(cmp) => {
                assert_eq!(cmp.operator, ComparisonOperator::GreaterThanEqual);
                assert_eq!(cmp.operand, Operand::Int(1));
            }
            other => panic!("expected comparison, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_list_comparison_fails_at_build_time() {
        let result = property("tags").contains_any(Vec::<String>::new());
        assert_eq!(result, Err(ConstructionError::EmptyOperandList));
    }

    #[test]
    fn test_nested_composition() {
        let pred = or([
            property("colour").eq("orange").unwrap(),
            and([
                property("size").gte(1i64).unwrap(),
                property("size").lt(6i64).unwrap(),
            ]),
        ]);
        assert!(!pred.is_empty());
        match pred {
            Predicate::Or(children) => assert_eq!(children.len(), 2),
            other => panic!("expected or, got {other:?}"),
        }
    }
}
