//! A single detection rule.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::Condition;

/// Prefix for ids of rules created by the "add rule" quick action.
pub const NEW_RULE_ID_PREFIX: &str = "RULE_NEW_";

/// Description given to rules created by the "add rule" quick action.
pub const NEW_RULE_DESCRIPTION: &str = "New rule description";

/// A named set of conditions matched against syscall events by the detection engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Expected to be unique within a document. Not enforced here.
    pub rule_id: String,
    #[serde(default)]
    pub description: String,
    /// `null` (what the backend writes for a rule without conditions) reads as empty.
    #[serde(deserialize_with = "null_as_empty")]
    pub conditions: Vec<Condition>,
    /// Rule-level keys this client does not model, kept for the save round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Condition>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Condition>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Rule {
    pub fn new(rule_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            description: description.into(),
            conditions: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Build the placeholder rule inserted by the "add rule" quick action.
    ///
    /// The id is `RULE_NEW_<seed>`; the single condition matches `openat` calls.
    pub fn placeholder(seed: i64) -> Self {
        Self::new(format!("{NEW_RULE_ID_PREFIX}{seed}"), NEW_RULE_DESCRIPTION)
            .with_condition(Condition::default_match())
    }
}
