//! Condition predicates and their scalar/list values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A single `field` / `operator` / `value` predicate within a rule.
///
/// The operator vocabulary is owned by the backend (`equals`, `in`, ...) and
/// is passed through without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    pub value: ConditionValue,
    /// Backend-defined modifiers this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<ConditionValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
            extra: Map::new(),
        }
    }

    /// `syscall_name equals openat`, the condition given to new rules.
    pub fn default_match() -> Self {
        Self::new("syscall_name", "equals", "openat")
    }
}

/// A condition value: one scalar or a list of scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

/// A string or numeric literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(Number),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Lists render comma-separated, scalars as-is.
impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Scalar(s) => write!(f, "{s}"),
            ConditionValue::List(items) => {
                let joined: Vec<String> = items.iter().map(|s| s.to_string()).collect();
                write!(f, "{}", joined.join(", "))
            }
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<Scalar> for ConditionValue {
    fn from(value: Scalar) -> Self {
        ConditionValue::Scalar(value)
    }
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        ConditionValue::Scalar(s.into())
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self {
        ConditionValue::Scalar(s.into())
    }
}

impl From<i64> for ConditionValue {
    fn from(n: i64) -> Self {
        ConditionValue::Scalar(n.into())
    }
}

impl From<Vec<Scalar>> for ConditionValue {
    fn from(items: Vec<Scalar>) -> Self {
        ConditionValue::List(items)
    }
}
