//! Responses returned by the rules endpoint.

use serde::{Deserialize, Serialize};

/// Body of a successful `PUT /rules`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateRulesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Version token of the stored ruleset. Older backends omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
}

impl UpdateRulesResponse {
    pub fn with_version(new_version: impl Into<String>) -> Self {
        Self {
            status: Some("success".to_string()),
            message: None,
            new_version: Some(new_version.into()),
        }
    }
}
