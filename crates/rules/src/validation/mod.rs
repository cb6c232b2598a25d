//! Structural validation of ruleset documents.
//!
//! Runs against the raw JSON value before typed deserialization so that a
//! missing field is reported as such, with its location, instead of as an
//! opaque deserializer message. Returns a [`ValidationReport`]; any issue
//! blocks a save.

mod shape_checks;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Result types ────────────────────────────────────────────────────

/// What is wrong at a given location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// A required key is absent.
    MissingField,
    /// A required string is present but empty.
    EmptyField,
    /// The key is present with the wrong JSON type.
    WrongType { expected: String },
}

/// A single blocking problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// JSON-path-like location, e.g. `"rules[1].conditions[0].value"`.
    /// Empty for the document root.
    pub path: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "document"
        } else {
            self.path.as_str()
        };
        match &self.kind {
            IssueKind::MissingField => write!(f, "missing {path}"),
            IssueKind::EmptyField => write!(f, "{path} must not be empty"),
            IssueKind::WrongType { expected } => write!(f, "{path} must be {expected}"),
        }
    }
}

/// Overall validation outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Paths of required fields that are absent.
    pub fn missing_fields(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter(|i| i.kind == IssueKind::MissingField)
            .map(|i| i.path.as_str())
            .collect()
    }

    /// Whether a specific path was reported as missing.
    pub fn is_missing(&self, path: &str) -> bool {
        self.missing_fields().contains(&path)
    }

    pub(crate) fn missing(&mut self, path: impl Into<String>) {
        self.push(path, IssueKind::MissingField);
    }

    pub(crate) fn empty(&mut self, path: impl Into<String>) {
        self.push(path, IssueKind::EmptyField);
    }

    pub(crate) fn wrong_type(&mut self, path: impl Into<String>, expected: &str) {
        self.push(
            path,
            IssueKind::WrongType {
                expected: expected.to_string(),
            },
        );
    }

    fn push(&mut self, path: impl Into<String>, kind: IssueKind) {
        self.issues.push(ValidationIssue {
            path: path.into(),
            kind,
        });
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a raw JSON value against the ruleset shape.
pub fn validate_value(value: &Value) -> ValidationReport {
    let mut report = ValidationReport::new();
    shape_checks::validate_document(value, &mut report);
    report
}

/// Parse raw text and validate. A syntax error is reported as `Err`; shape
/// problems come back in the report.
pub fn validate_text(text: &str) -> Result<ValidationReport, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    Ok(validate_value(&value))
}
