//! One handler per subcommand. Service failures are rendered as banners and
//! turned into a failing exit code; only terminal I/O errors propagate.

use std::future::Future;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ips_client::{
    AlertFeed, AlertPoller, AlertQuery, AlertsService, SyscallsService, TestTriggerService,
};
use ips_rules::{codec, RuleDocumentEditor, RulesService};
use tracing::{debug, info, warn};

use crate::session::EditSession;
use crate::terminal::Terminal;

/// How a command ended. Anything but `Success` exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failed => ExitCode::FAILURE,
        }
    }
}

/// `ips-admin rules`
pub async fn show_rules(term: &Terminal, rules: &dyn RulesService, raw: bool) -> Result<Outcome> {
    let doc = match rules.fetch().await {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "Failed to fetch rules");
            term.print_error(&e.to_string())?;
            return Ok(Outcome::Failed);
        }
    };

    if raw {
        match codec::serialize(&doc) {
            Ok(text) => term.print_text(&text)?,
            Err(e) => {
                term.print_error(&e.to_string())?;
                return Ok(Outcome::Failed);
            }
        }
    } else {
        term.print_ruleset(&doc)?;
    }
    Ok(Outcome::Success)
}

/// `ips-admin edit`
pub async fn edit_rules(term: &Terminal, rules: Arc<dyn RulesService>) -> Result<Outcome> {
    term.print_heading(term.messages().editor_title)?;
    let mut session = EditSession::new(RuleDocumentEditor::new(rules), term);
    session.run().await?;
    Ok(Outcome::Success)
}

/// `ips-admin alerts` without `--watch`.
pub async fn show_alerts(term: &Terminal, alerts: &dyn AlertsService, query: &AlertQuery) -> Result<Outcome> {
    let m = term.messages();
    term.print_info(m.alerts_loading)?;
    match alerts.alerts(query).await {
        Ok(list) => {
            term.print_alerts(&list, query.limit)?;
            Ok(Outcome::Success)
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch alerts");
            term.print_error(&format!("{} {}", m.alerts_load_failed, e))?;
            Ok(Outcome::Failed)
        }
    }
}

/// `ips-admin alerts --watch`: redraw on every poll until `shutdown` resolves.
pub async fn watch_alerts<F>(
    term: &Terminal,
    alerts: Arc<dyn AlertsService>,
    query: AlertQuery,
    every: Duration,
    shutdown: F,
) -> Result<Outcome>
where
    F: Future<Output = ()>,
{
    let m = term.messages();
    let limit = query.limit;
    let (handle, mut feed) = AlertPoller::start(alerts, query, every);
    info!(interval_secs = every.as_secs(), "Watching alerts");
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            update = feed.recv() => match update {
                Some(AlertFeed::Alerts(list)) => {
                    term.print_text("")?;
                    term.print_alerts(&list, limit)?;
                    term.print_info(m.alerts_watch_hint)?;
                }
                Some(AlertFeed::Failed(e)) => {
                    term.print_error(&format!("{} {}", m.alerts_load_failed, e))?;
                }
                None => break,
            },
            _ = &mut shutdown => {
                debug!("Alert watch interrupted");
                break;
            }
        }
    }

    handle.stop().await;
    Ok(Outcome::Success)
}

/// `ips-admin syscalls`
pub async fn show_syscalls(
    term: &Terminal,
    syscalls: &dyn SyscallsService,
    search: Option<&str>,
) -> Result<Outcome> {
    term.print_info(term.messages().syscalls_loading)?;
    match syscalls.syscalls().await {
        Ok(list) => {
            term.print_syscalls(&list, search)?;
            Ok(Outcome::Success)
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch syscalls");
            term.print_error(&e.to_string())?;
            Ok(Outcome::Failed)
        }
    }
}

/// `ips-admin test-attack [RULE_ID]`
///
/// Without an id, lists the rules of the active ruleset. With one, triggers
/// the test job; an id missing from the ruleset only produces a warning.
pub async fn test_attack(
    term: &Terminal,
    rules: &dyn RulesService,
    trigger: &dyn TestTriggerService,
    rule_id: Option<&str>,
) -> Result<Outcome> {
    let m = term.messages();
    let doc = match rules.fetch().await {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!(error = %e, "Failed to fetch rules");
            term.print_error(&m.rules_load_failed(&e.to_string()))?;
            None
        }
    };

    let Some(rule_id) = rule_id else {
        return match doc {
            Some(doc) => {
                term.print_test_targets(&doc.rules)?;
                Ok(Outcome::Success)
            }
            None => Ok(Outcome::Failed),
        };
    };

    if doc.is_some_and(|doc| doc.rule(rule_id).is_none()) {
        term.print_info(&m.unknown_rule(rule_id))?;
    }

    term.print_info(m.test_triggering)?;
    match trigger.trigger_test(rule_id).await {
        Ok(resp) => {
            info!(rule_id, job = %resp.job_name, "Test attack triggered");
            term.print_success(&m.test_triggered(&resp.job_name))?;
            Ok(Outcome::Success)
        }
        Err(e) => {
            warn!(rule_id, error = %e, "Failed to trigger test");
            term.print_error(&e.to_string())?;
            Ok(Outcome::Failed)
        }
    }
}

/// `ips-admin diagram`
pub fn show_diagram(term: &Terminal) -> Result<Outcome> {
    term.print_diagram()?;
    Ok(Outcome::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Locale;
    use crate::terminal::capture::Captured;
    use async_trait::async_trait;
    use ips_client::{Alert, ClientError, Syscall, TriggerTestResponse};
    use ips_rules::service::mock::MockRulesService;
    use ips_rules::{Rule, RuleDocument, ServiceError};
    use std::io::Cursor;
    use std::sync::Mutex;

    fn terminal(locale: Locale) -> (Terminal, Captured) {
        let captured = Captured::default();
        let term = Terminal::with_io(
            Box::new(captured.clone()),
            Box::new(Cursor::new(Vec::new())),
            locale,
        );
        (term, captured)
    }

    fn baseline() -> RuleDocument {
        RuleDocument::new("1.0.0")
            .with_description("baseline")
            .with_rule(Rule::new("RULE_A01_HOST_CRITICAL_WRITE", "host critical write"))
    }

    /// Backend stand-in for the read-side endpoints.
    #[derive(Default)]
    struct FakeBackend {
        alerts: Vec<Alert>,
        fail_with: Option<(u16, String)>,
        triggered: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn failing(status: u16, message: &str) -> Self {
            Self {
                fail_with: Some((status, message.to_string())),
                ..Self::default()
            }
        }

        fn check(&self) -> Result<(), ClientError> {
            match &self.fail_with {
                Some((status, message)) => Err(ClientError::Api {
                    status: *status,
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl AlertsService for FakeBackend {
        async fn alerts(&self, _query: &AlertQuery) -> Result<Vec<Alert>, ClientError> {
            self.check()?;
            Ok(self.alerts.clone())
        }
    }

    #[async_trait]
    impl SyscallsService for FakeBackend {
        async fn syscalls(&self) -> Result<Vec<Syscall>, ClientError> {
            self.check()?;
            Ok(vec![Syscall {
                name: "openat".into(),
                args: vec![],
            }])
        }
    }

    #[async_trait]
    impl TestTriggerService for FakeBackend {
        async fn trigger_test(&self, test_type: &str) -> Result<TriggerTestResponse, ClientError> {
            self.check()?;
            self.triggered.lock().unwrap().push(test_type.to_string());
            Ok(TriggerTestResponse {
                status: Some("success".into()),
                job_name: format!("http-trigger-{test_type}"),
            })
        }
    }

    #[tokio::test]
    async fn rules_summary_and_raw() {
        let service = MockRulesService::new(baseline());
        let (term, captured) = terminal(Locale::En);
        assert_eq!(show_rules(&term, &service, false).await.unwrap(), Outcome::Success);
        assert!(captured.contents().contains("RULE_A01_HOST_CRITICAL_WRITE"));

        let (term, captured) = terminal(Locale::En);
        show_rules(&term, &service, true).await.unwrap();
        assert!(captured.contents().contains("\"ruleset_version\": \"1.0.0\""));
    }

    #[tokio::test]
    async fn rules_failure_is_a_banner() {
        let service = MockRulesService::unavailable(ServiceError::Api {
            status: 500,
            message: "configmap not found".into(),
        });
        let (term, captured) = terminal(Locale::En);
        assert_eq!(show_rules(&term, &service, false).await.unwrap(), Outcome::Failed);
        assert!(captured.contents().contains("Error: configmap not found"));
    }

    #[tokio::test]
    async fn alerts_failure_uses_catalog_text() {
        let backend = FakeBackend::failing(503, "redis unavailable");
        let (term, captured) = terminal(Locale::Ko);
        let code = show_alerts(&term, &backend, &AlertQuery::default()).await.unwrap();
        assert_eq!(code, Outcome::Failed);
        assert!(captured
            .contents()
            .contains("알림을 불러오지 못했습니다. redis unavailable"));
    }

    #[tokio::test(start_paused = true)]
    async fn watch_stops_on_shutdown() {
        let backend = Arc::new(FakeBackend {
            alerts: vec![Alert {
                rule_id: "RULE_C03_CONTAINER_ESCAPE_PATH".into(),
                severity: "high".into(),
                ..Alert::default()
            }],
            ..FakeBackend::default()
        });
        let (term, captured) = terminal(Locale::En);
        let shutdown = tokio::time::sleep(Duration::from_secs(12));

        let code = watch_alerts(
            &term,
            backend,
            AlertQuery::default(),
            Duration::from_secs(5),
            shutdown,
        )
        .await
        .unwrap();

        assert_eq!(code, Outcome::Success);
        // Immediate poll plus ticks at 5s and 10s.
        let text = captured.contents();
        assert_eq!(text.matches("RULE_C03_CONTAINER_ESCAPE_PATH").count(), 3);
    }

    #[tokio::test]
    async fn syscalls_are_filtered() {
        let backend = FakeBackend::default();
        let (term, captured) = terminal(Locale::En);
        show_syscalls(&term, &backend, Some("OPEN")).await.unwrap();
        assert!(captured.contents().contains("openat"));
    }

    #[tokio::test]
    async fn test_attack_lists_rules_without_id() {
        let rules = MockRulesService::new(baseline());
        let backend = FakeBackend::default();
        let (term, captured) = terminal(Locale::En);

        let code = test_attack(&term, &rules, &backend, None).await.unwrap();
        assert_eq!(code, Outcome::Success);
        assert!(captured.contents().contains("RULE_A01_HOST_CRITICAL_WRITE"));
        assert!(backend.triggered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_attack_triggers_job() {
        let rules = MockRulesService::new(baseline());
        let backend = FakeBackend::default();
        let (term, captured) = terminal(Locale::En);

        let code = test_attack(&term, &rules, &backend, Some("RULE_A01_HOST_CRITICAL_WRITE"))
            .await
            .unwrap();
        assert_eq!(code, Outcome::Success);
        assert_eq!(
            *backend.triggered.lock().unwrap(),
            vec!["RULE_A01_HOST_CRITICAL_WRITE".to_string()]
        );
        let text = captured.contents();
        assert!(text.contains("Test triggered successfully! Job: http-trigger-RULE_A01_HOST_CRITICAL_WRITE"));
        assert!(!text.contains("not in the active ruleset"));
    }

    #[tokio::test]
    async fn test_attack_unknown_rule_still_triggers() {
        let rules = MockRulesService::new(baseline());
        let backend = FakeBackend::default();
        let (term, captured) = terminal(Locale::En);

        test_attack(&term, &rules, &backend, Some("RULE_X99")).await.unwrap();
        assert!(captured.contents().contains("not in the active ruleset"));
        assert_eq!(backend.triggered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_attack_error_prefers_server_message() {
        let rules = MockRulesService::new(baseline());
        let backend = FakeBackend::failing(500, "failed to create job");
        let (term, captured) = terminal(Locale::En);

        let code = test_attack(&term, &rules, &backend, Some("RULE_A01_HOST_CRITICAL_WRITE"))
            .await
            .unwrap();
        assert_eq!(code, Outcome::Failed);
        assert!(captured.contents().contains("Error: failed to create job"));
    }

    #[test]
    fn diagram_needs_no_backend() {
        let (term, captured) = terminal(Locale::Ko);
        assert_eq!(show_diagram(&term).unwrap(), Outcome::Success);
        assert!(captured.contents().contains("클러스터 구조도"));
    }
}
