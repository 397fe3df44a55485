use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A coded concept drawn from a terminology system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// A measured amount with an optional unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// A single user-entered answer, tagged by its leaf type.
///
/// Comparison semantics are type-specific: numeric for `Integer`/`Decimal`/
/// `Quantity` (which compare against each other), lexicographic for `Date`
/// (valid for ISO-8601 strings), identity for `Boolean`/`String`, and
/// system+code equality for `Coding` (codings have no ordering).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerValue {
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
    Date(String),
    Coding(Coding),
    Quantity(Quantity),
}

impl AnswerValue {
    /// Numeric view of the value, where one exists.
    fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Integer(n) => Some(*n as f64),
            AnswerValue::Decimal(n) => Some(*n),
            AnswerValue::Quantity(q) => Some(q.value),
            _ => None,
        }
    }

    /// True for answers that carry no information, like an empty string.
    pub fn is_blank(&self) -> bool {
        matches!(self, AnswerValue::String(s) if s.is_empty())
    }

    /// Whether two values belong to the same comparison family.
    pub fn same_kind(&self, other: &AnswerValue) -> bool {
        if self.as_number().is_some() && other.as_number().is_some() {
            return true;
        }
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Type-specific equality.
    pub fn matches(&self, other: &AnswerValue) -> bool {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a == b;
        }
        match (self, other) {
            (AnswerValue::Boolean(a), AnswerValue::Boolean(b)) => a == b,
            (AnswerValue::String(a), AnswerValue::String(b)) => a == b,
            (AnswerValue::Date(a), AnswerValue::Date(b)) => a == b,
            (AnswerValue::Coding(a), AnswerValue::Coding(b)) => {
                a.system == b.system && a.code == b.code
            }
            _ => false,
        }
    }

    /// Type-specific ordering. `None` when the pair has no defined order,
    /// which makes every ordered operator evaluate to false for it.
    pub fn compare(&self, other: &AnswerValue) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a.partial_cmp(&b);
        }
        match (self, other) {
            (AnswerValue::Date(a), AnswerValue::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Boolean(b) => write!(f, "{}", b),
            AnswerValue::Integer(n) => write!(f, "{}", n),
            AnswerValue::Decimal(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            AnswerValue::String(s) => write!(f, "{}", s),
            AnswerValue::Date(d) => write!(f, "{}", d),
            AnswerValue::Coding(c) => match &c.display {
                Some(display) => write!(f, "{}", display),
                None => write!(f, "{}", c.code),
            },
            AnswerValue::Quantity(q) => match &q.unit {
                Some(unit) => write!(f, "{} {}", q.value, unit),
                None => write!(f, "{}", q.value),
            },
        }
    }
}
