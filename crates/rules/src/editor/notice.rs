//! Banner messages produced by editor operations.

use crate::error::{ErrorCategory, RuleError};

/// Shown in place of a version token when the service does not return one.
pub const VERSION_PLACEHOLDER: &str = "N/A";

/// The editor operation a notice refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Load,
    AddRule,
    DeleteRule,
    Save,
}

/// A dismissible, non-blocking banner.
///
/// Carries structured data so a front end can render it in its own language;
/// [`Notice::message`] gives the default English text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The ruleset was stored by the service.
    Saved { new_version: Option<String> },
    /// An operation failed. The buffer was left untouched.
    Failed {
        action: EditorAction,
        category: ErrorCategory,
        detail: String,
    },
}

impl Notice {
    pub(crate) fn failed(action: EditorAction, err: &RuleError) -> Self {
        Notice::Failed {
            action,
            category: err.category(),
            detail: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Failed { .. })
    }

    /// Version token to display for a save, falling back to [`VERSION_PLACEHOLDER`].
    pub fn version_label(new_version: Option<&str>) -> &str {
        match new_version {
            Some(v) if !v.is_empty() => v,
            _ => VERSION_PLACEHOLDER,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::Saved { new_version } => format!(
                "Rules updated successfully! New version: {}",
                Self::version_label(new_version.as_deref())
            ),
            Notice::Failed { action, detail, .. } => match action {
                EditorAction::Load => format!("Failed to load rules: {detail}"),
                EditorAction::AddRule => format!("Failed to add rule: {detail}"),
                EditorAction::DeleteRule => format!("Failed to delete rule: {detail}"),
                EditorAction::Save => detail.clone(),
            },
        }
    }
}
