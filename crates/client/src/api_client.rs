//! HTTP client for the admin backend's REST API.

use std::time::Duration;

use async_trait::async_trait;
use ips_rules::{RuleDocument, RulesService, ServiceError, UpdateRulesResponse};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::models::{
    Alert, AlertQuery, AlertsResponse, ApiErrorBody, Syscall, SyscallsResponse,
    TriggerTestRequest, TriggerTestResponse,
};
use crate::services::{AlertsService, SyscallsService, TestTriggerService};

/// Path prefix of every endpoint.
pub const DEFAULT_BASE_PATH: &str = "/api/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the admin backend REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client for `server_url` (e.g. `http://localhost:8080`) using
    /// the default `/api/v1` prefix.
    pub fn new(server_url: &str) -> Self {
        Self::with_base_path(server_url, DEFAULT_BASE_PATH)
    }

    /// Create a client with an explicit API path prefix.
    pub fn with_base_path(server_url: &str, base_path: &str) -> Self {
        let server = server_url.trim_end_matches('/');
        let path = base_path.trim_matches('/');
        let base_url = if path.is_empty() {
            server.to_string()
        } else {
            format!("{server}/{path}")
        };
        Self {
            base_url,
            http: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /rules`.
    pub async fn get_rules(&self) -> Result<RuleDocument, ClientError> {
        let url = self.url("/rules");
        debug!(method = "GET", url = %url, "API request");
        let resp = self.http.get(&url).timeout(self.timeout).send().await;
        decode(resp, &url).await
    }

    /// `PUT /rules`.
    pub async fn put_rules(&self, document: &RuleDocument) -> Result<UpdateRulesResponse, ClientError> {
        let url = self.url("/rules");
        debug!(method = "PUT", url = %url, rules = document.rules.len(), "API request");
        let resp = self
            .http
            .put(&url)
            .timeout(self.timeout)
            .json(document)
            .send()
            .await;
        decode(resp, &url).await
    }

    /// `GET /alerts?limit=N[&since=T]`.
    pub async fn get_alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>, ClientError> {
        let url = self.url("/alerts");
        debug!(method = "GET", url = %url, limit = query.limit, "API request");
        let resp = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .query(&query.params())
            .send()
            .await;
        let body: AlertsResponse = decode(resp, &url).await?;
        Ok(body.alerts)
    }

    /// `GET /syscalls`.
    pub async fn get_syscalls(&self) -> Result<Vec<Syscall>, ClientError> {
        let url = self.url("/syscalls");
        debug!(method = "GET", url = %url, "API request");
        let resp = self.http.get(&url).timeout(self.timeout).send().await;
        let body: SyscallsResponse = decode(resp, &url).await?;
        Ok(body.syscalls)
    }

    /// `POST /tests/trigger`.
    pub async fn post_test_trigger(&self, test_type: &str) -> Result<TriggerTestResponse, ClientError> {
        let url = self.url("/tests/trigger");
        debug!(method = "POST", url = %url, test_type = %test_type, "API request");
        let resp = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(&TriggerTestRequest {
                test_type: test_type.to_string(),
            })
            .send()
            .await;
        decode(resp, &url).await
    }
}

/// Turn a send result into a typed body, mapping non-2xx to [`ClientError::Api`].
async fn decode<T: DeserializeOwned>(
    sent: Result<reqwest::Response, reqwest::Error>,
    url: &str,
) -> Result<T, ClientError> {
    let resp = sent.inspect_err(|e| warn!(url = %url, error = %e, "API request failed"))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let err = api_error(status.as_u16(), &body);
        warn!(url = %url, status = status.as_u16(), error = %err, "API error response");
        return Err(err);
    }

    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        warn!(url = %url, error = %e, "Failed to decode API response");
        ClientError::Decode(e.to_string())
    })
}

/// Prefer the service's own `{"error": "..."}` text over a generic message.
fn api_error(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("server returned {status}: {body}"));
    ClientError::Api { status, message }
}

#[async_trait]
impl RulesService for ApiClient {
    async fn fetch(&self) -> Result<RuleDocument, ServiceError> {
        Ok(self.get_rules().await?)
    }

    async fn save(&self, document: &RuleDocument) -> Result<UpdateRulesResponse, ServiceError> {
        Ok(self.put_rules(document).await?)
    }
}

#[async_trait]
impl AlertsService for ApiClient {
    async fn alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>, ClientError> {
        self.get_alerts(query).await
    }
}

#[async_trait]
impl SyscallsService for ApiClient {
    async fn syscalls(&self) -> Result<Vec<Syscall>, ClientError> {
        self.get_syscalls().await
    }
}

#[async_trait]
impl TestTriggerService for ApiClient {
    async fn trigger_test(&self, test_type: &str) -> Result<TriggerTestResponse, ClientError> {
        self.post_test_trigger(test_type).await
    }
}
