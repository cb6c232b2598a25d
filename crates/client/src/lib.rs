//! REST client for the IPS admin backend (`/api/v1`).
//!
//! [`ApiClient`] implements every service trait the console consumes:
//! [`RulesService`](ips_rules::RulesService) for the ruleset editor, plus
//! [`AlertsService`], [`SyscallsService`], and [`TestTriggerService`].
//! [`AlertPoller`] wraps an `AlertsService` in a cancellable polling task.

pub mod api_client;
pub mod error;
pub mod models;
pub mod poller;
pub mod services;

pub use api_client::{ApiClient, DEFAULT_BASE_PATH};
pub use error::ClientError;
pub use models::*;
pub use poller::{AlertFeed, AlertPoller, PollerHandle};
pub use services::{AlertsService, SyscallsService, TestTriggerService};
