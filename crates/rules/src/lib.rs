//! Ruleset model and editing workflow for the IPS admin console.
//!
//! This crate provides:
//! - Serde types for the ruleset document served by the backend
//! - Path-qualified structural validation of raw JSON
//! - A stable pretty-JSON text codec
//! - The [`RulesService`](service::RulesService) contract the editor persists through
//! - [`RuleDocumentEditor`](editor::RuleDocumentEditor), the load/edit/validate/save state holder

pub mod codec;
pub mod editor;
pub mod error;
pub mod schema;
pub mod service;
pub mod validation;

pub use editor::{EditorState, Notice, RuleDocumentEditor};
pub use error::{ErrorCategory, Result, RuleError};
pub use schema::{Condition, ConditionValue, Rule, RuleDocument, Scalar, UpdateRulesResponse};
pub use service::{RulesService, ServiceError};
