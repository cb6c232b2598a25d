//! Top-level ruleset document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Rule;

/// A versioned ruleset as served by `GET /rules` and accepted by `PUT /rules`.
///
/// `rules` is an ordered sequence. Order carries no matching semantics but is
/// the edit order shown to operators, so it is preserved across every edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    /// Opaque version token assigned by the backend.
    pub ruleset_version: String,
    #[serde(default)]
    pub description: String,
    pub rules: Vec<Rule>,
    /// Top-level keys this client does not model. Carried through untouched
    /// so a load/save cycle never strips backend-owned fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RuleDocument {
    /// Create an empty ruleset at the given version.
    pub fn new(ruleset_version: impl Into<String>) -> Self {
        Self {
            ruleset_version: ruleset_version.into(),
            description: String::new(),
            rules: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Set the ruleset description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a rule, keeping insertion order.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Find a rule by id. Ids are not guaranteed unique; the first match wins.
    pub fn rule(&self, rule_id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.rule_id == rule_id)
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.rule_id.as_str()).collect()
    }
}
