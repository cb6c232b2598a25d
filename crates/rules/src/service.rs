//! The rules service contract consumed by the editor.
//!
//! The trait lives here rather than in the HTTP client crate because the
//! editor defines what it needs. `ips-client` provides the REST
//! implementation; tests use [`mock::MockRulesService`].

use async_trait::async_trait;

use crate::schema::{RuleDocument, UpdateRulesResponse};

/// Fetches and persists the active ruleset.
#[async_trait]
pub trait RulesService: Send + Sync {
    /// Load the current ruleset (`GET /rules`).
    async fn fetch(&self) -> Result<RuleDocument, ServiceError>;

    /// Replace the ruleset (`PUT /rules`). The response carries the new version token.
    async fn save(&self, document: &RuleDocument) -> Result<UpdateRulesResponse, ServiceError>;
}

/// Failure reported by a rules service implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service answered with an error status. `message` is the service's
    /// own `error` text when it sent one.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a response (connection refused, timeout, ...).
    #[error("{0}")]
    Transport(String),

    /// A response arrived but its body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// In-memory rules service for tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Serves a stored document and records every save.
    ///
    /// Successful saves replace the stored document, so a later `fetch`
    /// returns what was saved.
    pub struct MockRulesService {
        document: Mutex<Option<RuleDocument>>,
        fetch_errors: Mutex<VecDeque<ServiceError>>,
        save_results: Mutex<VecDeque<Result<UpdateRulesResponse, ServiceError>>>,
        saved: Mutex<Vec<RuleDocument>>,
        fetch_calls: Mutex<usize>,
    }

    impl MockRulesService {
        pub fn new(document: RuleDocument) -> Self {
            Self {
                document: Mutex::new(Some(document)),
                fetch_errors: Mutex::new(VecDeque::new()),
                save_results: Mutex::new(VecDeque::new()),
                saved: Mutex::new(Vec::new()),
                fetch_calls: Mutex::new(0),
            }
        }

        /// A service whose fetches fail until a document is set.
        pub fn unavailable(error: ServiceError) -> Self {
            let service = Self::new(RuleDocument::new("unused"));
            *service.document.lock().unwrap() = None;
            service.fail_next_fetch(error);
            service
        }

        pub fn set_document(&self, document: RuleDocument) {
            *self.document.lock().unwrap() = Some(document);
        }

        /// Fail the next fetch with `error`.
        pub fn fail_next_fetch(&self, error: ServiceError) {
            self.fetch_errors.lock().unwrap().push_back(error);
        }

        /// Queue the result of the next save.
        pub fn queue_save(&self, result: Result<UpdateRulesResponse, ServiceError>) {
            self.save_results.lock().unwrap().push_back(result);
        }

        /// Documents passed to `save`, in call order (including failed ones).
        pub fn saved(&self) -> Vec<RuleDocument> {
            self.saved.lock().unwrap().clone()
        }

        pub fn save_calls(&self) -> usize {
            self.saved.lock().unwrap().len()
        }

        pub fn fetch_calls(&self) -> usize {
            *self.fetch_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl RulesService for MockRulesService {
        async fn fetch(&self) -> Result<RuleDocument, ServiceError> {
            *self.fetch_calls.lock().unwrap() += 1;
            if let Some(err) = self.fetch_errors.lock().unwrap().pop_front() {
                return Err(err);
            }
            self.document
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ServiceError::Transport("no ruleset stored".into()))
        }

        async fn save(&self, document: &RuleDocument) -> Result<UpdateRulesResponse, ServiceError> {
            self.saved.lock().unwrap().push(document.clone());
            let result = self
                .save_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(UpdateRulesResponse::default()));
            if result.is_ok() {
                *self.document.lock().unwrap() = Some(document.clone());
            }
            result
        }
    }
}
