//! Request and response bodies for the read-side endpoints.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default number of alerts requested per poll.
pub const DEFAULT_ALERT_LIMIT: u32 = 50;

// ── Alerts ──────────────────────────────────────────────────────────

/// A record emitted when a monitored workload's syscall matched a rule.
///
/// Every field tolerates absence; the backend fills them from webhook
/// payloads that are not always complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub alert_id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub rule_id: String,
    #[serde(default)]
    pub rule_description: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub pod_name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syscall_log: Option<Map<String, Value>>,
}

/// Alert severity buckets used for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
    Low,
    Unknown,
}

impl Alert {
    pub fn severity_level(&self) -> Severity {
        match self.severity.to_lowercase().as_str() {
            "high" | "critical" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    /// Timestamp in local time when it is RFC 3339, otherwise the raw string.
    pub fn display_timestamp(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.timestamp) {
            Ok(ts) => ts
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            Err(_) => self.timestamp.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsResponse {
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

/// Parameters for `GET /alerts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertQuery {
    pub limit: u32,
    /// Only alerts at or after this instant. Sent as RFC 3339.
    pub since: Option<DateTime<Utc>>,
}

impl Default for AlertQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_ALERT_LIMIT,
            since: None,
        }
    }
}

impl AlertQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit,
            since: None,
        }
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", self.limit.to_string())];
        if let Some(since) = self.since {
            params.push((
                "since",
                since.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            ));
        }
        params
    }
}

// ── Syscalls ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyscallArg {
    #[serde(rename = "type")]
    pub arg_type: String,
    pub name: String,
}

/// A system call the monitored cluster is able to make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syscall {
    pub name: String,
    #[serde(default)]
    pub args: Vec<SyscallArg>,
}

impl Syscall {
    /// Case-insensitive substring match on the name. An empty term matches all.
    pub fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }

    /// C-style signature, e.g. `openat(int dfd, const char * filename)`.
    pub fn signature(&self) -> String {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| format!("{} {}", a.arg_type, a.name))
            .collect();
        format!("{}({})", self.name, args.join(", "))
    }
}

/// Keep the syscalls whose names contain `term`, preserving order.
pub fn filter_syscalls<'a>(syscalls: &'a [Syscall], term: &str) -> Vec<&'a Syscall> {
    syscalls.iter().filter(|s| s.matches(term)).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyscallsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
    #[serde(default)]
    pub syscalls: Vec<Syscall>,
}

// ── Test trigger ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerTestRequest {
    pub test_type: String,
}

/// Response of `POST /tests/trigger`: the Kubernetes job that runs the attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerTestResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub job_name: String,
}

// ── Errors ──────────────────────────────────────────────────────────

/// Structured error body sent by the backend on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}
