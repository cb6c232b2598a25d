//! Read-side service traits. The rules contract lives in `ips_rules::service`.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::models::{Alert, AlertQuery, Syscall, TriggerTestResponse};

/// `GET /alerts`.
#[async_trait]
pub trait AlertsService: Send + Sync {
    async fn alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>, ClientError>;
}

/// `GET /syscalls`.
#[async_trait]
pub trait SyscallsService: Send + Sync {
    async fn syscalls(&self) -> Result<Vec<Syscall>, ClientError>;
}

/// `POST /tests/trigger`.
#[async_trait]
pub trait TestTriggerService: Send + Sync {
    /// Start a test attack job. `test_type` is the id of the rule to exercise.
    async fn trigger_test(&self, test_type: &str) -> Result<TriggerTestResponse, ClientError>;
}
