//! Ruleset document types with serde (de)serialization.
//!
//! Defines the wire shape exchanged with the rules endpoint:
//! - `RuleDocument`: versioned ruleset (`ruleset_version`, `description`, `rules`)
//! - `Rule`: a detection rule with an ordered list of conditions
//! - `Condition`: a single `field` / `operator` / `value` predicate
//!
//! Field names match the JSON produced by the backend (snake_case).

mod condition;
mod document;
mod response;
mod rule;

pub use condition::*;
pub use document::*;
pub use response::*;
pub use rule::*;
