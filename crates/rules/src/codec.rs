//! Text form of a ruleset: two-space pretty JSON.
//!
//! `parse` checks syntax, then shape (see [`crate::validation`]), then builds
//! the typed document. `serialize` is stable: feeding its output back through
//! `parse` and `serialize` yields identical text.
//!
//! [`Draft`] is the lenient form used by structural quick actions: only the
//! syntax and the `rules` array are required, and the rest of the buffer is
//! written back as it was.

use serde_json::{Map, Value};

use crate::error::{Result, RuleError};
use crate::schema::{Rule, RuleDocument};
use crate::validation::{validate_value, ValidationReport};

/// Render a document as the editor's buffer text.
pub fn serialize(document: &RuleDocument) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(RuleError::Serialize)
}

/// Parse buffer text into a validated document.
pub fn parse(text: &str) -> Result<RuleDocument> {
    let value: Value = serde_json::from_str(text)?;
    let report = validate_value(&value);
    if !report.is_valid() {
        return Err(RuleError::Validation(report));
    }
    Ok(serde_json::from_value(value)?)
}

/// A buffer opened for adding or removing rules.
///
/// Every key is kept in order, entries the typed model would reject included,
/// so a quick action changes nothing but the `rules` entry it targets.
#[derive(Debug, Clone)]
pub struct Draft {
    root: Map<String, Value>,
}

impl Draft {
    /// Parse text that must be a JSON object with a `rules` array.
    pub fn parse(text: &str) -> Result<Self> {
        let Value::Object(root) = serde_json::from_str::<Value>(text)? else {
            return Err(invalid(|r| r.wrong_type("", "an object")));
        };
        let mut draft = Self { root };
        draft.rules_mut()?;
        Ok(draft)
    }

    pub fn rule_count(&self) -> usize {
        match self.root.get("rules") {
            Some(Value::Array(rules)) => rules.len(),
            _ => 0,
        }
    }

    /// Append `rule` and return the new rule count.
    pub fn push_rule(&mut self, rule: &Rule) -> Result<usize> {
        let value = serde_json::to_value(rule).map_err(RuleError::Serialize)?;
        let rules = self.rules_mut()?;
        rules.push(value);
        Ok(rules.len())
    }

    /// Remove the entry at `index`, returned as written.
    pub fn remove_rule(&mut self, index: usize) -> Result<Value> {
        let rules = self.rules_mut()?;
        if index >= rules.len() {
            return Err(RuleError::RuleIndexOutOfRange {
                index,
                len: rules.len(),
            });
        }
        Ok(rules.remove(index))
    }

    pub fn to_text(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.root).map_err(RuleError::Serialize)
    }

    fn rules_mut(&mut self) -> Result<&mut Vec<Value>> {
        match self.root.get_mut("rules") {
            Some(Value::Array(rules)) => Ok(rules),
            None | Some(Value::Null) => Err(invalid(|r| r.missing("rules"))),
            Some(_) => Err(invalid(|r| r.wrong_type("rules", "an array"))),
        }
    }
}

fn invalid(record: impl FnOnce(&mut ValidationReport)) -> RuleError {
    let mut report = ValidationReport::new();
    record(&mut report);
    RuleError::Validation(report)
}
