//! Display strings for each supported locale.
//!
//! Views look strings up here instead of branching on the locale. Templates
//! use named `{placeholders}` filled by the helper methods on [`Messages`].

use ips_rules::editor::{EditorAction, Notice};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl Locale {
    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::Ko => &KO,
        }
    }
}

pub struct Messages {
    pub error_prefix: &'static str,

    pub rules_title: &'static str,
    pub rules_loading: &'static str,
    pub rules_version: &'static str,
    pub rules_description: &'static str,
    pub rules_total: &'static str,
    pub rules_conditions: &'static str,
    pub rules_empty: &'static str,
    rules_load_failed: &'static str,

    pub editor_title: &'static str,
    pub editor_help: &'static str,
    pub editor_paste_hint: &'static str,
    pub editor_unsaved: &'static str,
    pub editor_no_changes: &'static str,
    pub editor_quit_confirm: &'static str,
    editor_saved: &'static str,
    editor_added: &'static str,
    editor_deleted: &'static str,
    editor_add_failed: &'static str,
    editor_delete_failed: &'static str,
    editor_written: &'static str,
    editor_unknown_command: &'static str,

    pub alerts_title: &'static str,
    pub alerts_loading: &'static str,
    pub alerts_load_failed: &'static str,
    pub alerts_empty: &'static str,
    pub alerts_total: &'static str,
    pub alerts_limit: &'static str,
    pub alerts_rule: &'static str,
    pub alerts_severity_unknown: &'static str,
    pub alerts_syscall_log: &'static str,
    pub alerts_watch_hint: &'static str,

    pub syscalls_title: &'static str,
    pub syscalls_loading: &'static str,
    pub syscalls_total: &'static str,
    pub syscalls_arguments: &'static str,
    pub syscalls_no_arguments: &'static str,
    pub syscalls_empty: &'static str,
    pub syscalls_no_match: &'static str,

    pub test_title: &'static str,
    pub test_intro: &'static str,
    pub test_available: &'static str,
    pub test_select_hint: &'static str,
    pub test_no_rules: &'static str,
    pub test_triggering: &'static str,
    pub test_how_it_works: &'static [&'static str],
    test_triggered: &'static str,
    test_unknown_rule: &'static str,

    pub diagram_title: &'static str,
    pub diagram_intro: &'static str,
}

impl Messages {
    pub fn saved(&self, new_version: Option<&str>) -> String {
        self.editor_saved
            .replace("{version}", Notice::version_label(new_version))
    }

    pub fn rules_load_failed(&self, detail: &str) -> String {
        self.rules_load_failed.replace("{detail}", detail)
    }

    pub fn rule_added(&self, rule_id: &str) -> String {
        self.editor_added.replace("{rule_id}", rule_id)
    }

    pub fn rule_deleted(&self, rule_id: &str) -> String {
        self.editor_deleted.replace("{rule_id}", rule_id)
    }

    pub fn written(&self, path: &str) -> String {
        self.editor_written.replace("{path}", path)
    }

    pub fn unknown_command(&self, input: &str) -> String {
        self.editor_unknown_command.replace("{input}", input)
    }

    pub fn test_triggered(&self, job_name: &str) -> String {
        self.test_triggered.replace("{job}", job_name)
    }

    pub fn unknown_rule(&self, rule_id: &str) -> String {
        self.test_unknown_rule.replace("{rule_id}", rule_id)
    }

    /// Render an editor banner in this locale.
    pub fn notice(&self, notice: &Notice) -> String {
        match notice {
            Notice::Saved { new_version } => self.saved(new_version.as_deref()),
            Notice::Failed { action, detail, .. } => match action {
                EditorAction::Load => self.rules_load_failed(detail),
                EditorAction::AddRule => self.editor_add_failed.replace("{detail}", detail),
                EditorAction::DeleteRule => self.editor_delete_failed.replace("{detail}", detail),
                EditorAction::Save => detail.clone(),
            },
        }
    }
}

const EDITOR_HELP_EN: &str = "\
Commands:
  show          print the working text
  list          list rules in the working text
  add           append a placeholder rule
  delete N      remove rule number N (starting at 1)
  edit          replace the working text (end input with a line containing only '.')
  load FILE     replace the working text with the contents of FILE
  write FILE    write the working text to FILE
  save          validate and store the ruleset on the server
  reload        discard local changes and fetch from the server
  dismiss       clear the current banner
  help          show this help
  quit          leave the editor";

const EDITOR_HELP_KO: &str = "\
명령어:
  show          작업 중인 텍스트 출력
  list          작업 중인 텍스트의 룰 목록
  add           기본 룰 추가
  delete N      N번 룰 삭제 (1부터 시작)
  edit          작업 텍스트 교체 ('.' 한 줄로 입력 종료)
  load FILE     FILE 내용으로 작업 텍스트 교체
  write FILE    작업 텍스트를 FILE에 저장
  save          검증 후 서버에 룰셋 저장
  reload        로컬 변경을 버리고 서버에서 다시 불러오기
  dismiss       현재 알림 닫기
  help          도움말
  quit          편집기 종료";

pub static EN: Messages = Messages {
    error_prefix: "Error",

    rules_title: "Security Rules",
    rules_loading: "Loading rules...",
    rules_version: "Version",
    rules_description: "Description",
    rules_total: "Total Rules",
    rules_conditions: "Conditions",
    rules_empty: "No rules found",
    rules_load_failed: "Failed to load rules: {detail}",

    editor_title: "Update Rules",
    editor_help: EDITOR_HELP_EN,
    editor_paste_hint: "Paste the ruleset JSON. Finish with a line containing only '.'",
    editor_unsaved: "unsaved changes",
    editor_no_changes: "no changes",
    editor_quit_confirm: "There are unsaved changes. Type quit again to discard them.",
    editor_saved: "Rules updated successfully! New version: {version}",
    editor_added: "Added {rule_id}",
    editor_deleted: "Deleted {rule_id}",
    editor_add_failed: "Failed to add rule: {detail}",
    editor_delete_failed: "Failed to delete rule: {detail}",
    editor_written: "Wrote working text to {path}",
    editor_unknown_command: "Unknown command '{input}'. Type 'help' for commands.",

    alerts_title: "Security Alerts",
    alerts_loading: "Loading alerts...",
    alerts_load_failed: "Failed to load alerts.",
    alerts_empty: "No alerts.",
    alerts_total: "Total alerts",
    alerts_limit: "Showing",
    alerts_rule: "Rule",
    alerts_severity_unknown: "unknown",
    alerts_syscall_log: "Syscall log",
    alerts_watch_hint: "Refreshing automatically. Press Ctrl+C to stop.",

    syscalls_title: "Callable System Calls",
    syscalls_loading: "Loading syscalls...",
    syscalls_total: "Total syscalls",
    syscalls_arguments: "Arguments",
    syscalls_no_arguments: "No arguments",
    syscalls_empty: "No syscalls found",
    syscalls_no_match: "No syscalls found matching your search",

    test_title: "Test Attack",
    test_intro: "Trigger a test attack to verify that the security rules are working correctly.",
    test_available: "Available Test Attacks",
    test_select_hint: "Run `ips-admin test-attack RULE_ID` to create a K8s Job that attempts the prohibited action.",
    test_no_rules: "No rules available for testing",
    test_triggering: "Triggering...",
    test_how_it_works: &[
        "Triggering a test creates a Kubernetes Job",
        "The Job attempts to perform the action that the rule is designed to detect",
        "The eBPF monitor should detect the syscall and raise an alert",
        "Check `ips-admin alerts` to see whether the attack was detected",
    ],
    test_triggered: "Test triggered successfully! Job: {job}",
    test_unknown_rule: "Rule '{rule_id}' is not in the active ruleset; triggering anyway.",

    diagram_title: "Cluster Diagram",
    diagram_intro: "Overall architecture of the current system.",
};

pub static KO: Messages = Messages {
    error_prefix: "오류",

    rules_title: "보안 룰",
    rules_loading: "룰을 불러오는 중...",
    rules_version: "버전",
    rules_description: "설명",
    rules_total: "총 룰 수",
    rules_conditions: "조건",
    rules_empty: "룰이 없습니다.",
    rules_load_failed: "룰을 불러오지 못했습니다: {detail}",

    editor_title: "룰 업데이트",
    editor_help: EDITOR_HELP_KO,
    editor_paste_hint: "룰셋 JSON을 붙여넣으세요. '.' 한 줄로 입력을 마칩니다.",
    editor_unsaved: "저장되지 않은 변경 사항",
    editor_no_changes: "변경 사항 없음",
    editor_quit_confirm: "저장되지 않은 변경 사항이 있습니다. 버리려면 quit를 다시 입력하세요.",
    editor_saved: "룰이 업데이트되었습니다! 새 버전: {version}",
    editor_added: "{rule_id} 추가됨",
    editor_deleted: "{rule_id} 삭제됨",
    editor_add_failed: "룰 추가 실패: {detail}",
    editor_delete_failed: "룰 삭제 실패: {detail}",
    editor_written: "작업 텍스트를 {path}에 저장했습니다",
    editor_unknown_command: "알 수 없는 명령어 '{input}'. 'help'를 입력하세요.",

    alerts_title: "보안 알림",
    alerts_loading: "알림을 불러오는 중...",
    alerts_load_failed: "알림을 불러오지 못했습니다.",
    alerts_empty: "알림이 없습니다.",
    alerts_total: "총 알림 수",
    alerts_limit: "표시 개수",
    alerts_rule: "룰",
    alerts_severity_unknown: "미확인",
    alerts_syscall_log: "시스템콜 로그 보기",
    alerts_watch_hint: "자동으로 새로고침합니다. 중지하려면 Ctrl+C를 누르세요.",

    syscalls_title: "호출 가능한 시스템콜",
    syscalls_loading: "시스템콜을 불러오는 중...",
    syscalls_total: "총 시스템콜 수",
    syscalls_arguments: "인자",
    syscalls_no_arguments: "인자 없음",
    syscalls_empty: "시스템콜이 없습니다.",
    syscalls_no_match: "검색과 일치하는 시스템콜이 없습니다.",

    test_title: "테스트 공격",
    test_intro: "보안 룰이 올바르게 동작하는지 테스트 공격으로 확인합니다.",
    test_available: "사용 가능한 테스트 공격",
    test_select_hint: "`ips-admin test-attack RULE_ID`를 실행하면 금지된 동작을 시도하는 K8s Job이 생성됩니다.",
    test_no_rules: "테스트할 룰이 없습니다.",
    test_triggering: "실행 중...",
    test_how_it_works: &[
        "테스트를 실행하면 Kubernetes Job이 생성됩니다",
        "Job은 룰이 탐지하도록 설계된 동작을 시도합니다",
        "eBPF 모니터가 시스템콜을 탐지해 알림을 발생시켜야 합니다",
        "`ips-admin alerts`에서 공격이 탐지되었는지 확인하세요",
    ],
    test_triggered: "테스트가 실행되었습니다! Job: {job}",
    test_unknown_rule: "'{rule_id}' 룰은 활성 룰셋에 없습니다. 그대로 실행합니다.",

    diagram_title: "클러스터 구조도",
    diagram_intro: "현재 시스템의 전체 아키텍처 다이어그램입니다.",
};

#[cfg(test)]
mod tests {
    use super::*;
    use ips_rules::ErrorCategory;

    #[test]
    fn saved_falls_back_to_placeholder() {
        assert_eq!(
            EN.saved(Some("v2")),
            "Rules updated successfully! New version: v2"
        );
        assert_eq!(EN.saved(None), "Rules updated successfully! New version: N/A");
        assert_eq!(KO.saved(Some("")), "룰이 업데이트되었습니다! 새 버전: N/A");
    }

    #[test]
    fn english_notices_match_editor_defaults() {
        let notices = [
            Notice::Saved {
                new_version: Some("1.0.1".into()),
            },
            Notice::Failed {
                action: EditorAction::AddRule,
                category: ErrorCategory::Parse,
                detail: "Invalid JSON format: EOF".into(),
            },
            Notice::Failed {
                action: EditorAction::DeleteRule,
                category: ErrorCategory::Validation,
                detail: "no rule at index 4".into(),
            },
            Notice::Failed {
                action: EditorAction::Save,
                category: ErrorCategory::Transport,
                detail: "store unavailable".into(),
            },
        ];
        for notice in &notices {
            assert_eq!(EN.notice(notice), notice.message());
        }
    }

    #[test]
    fn korean_notice_keeps_detail() {
        let notice = Notice::Failed {
            action: EditorAction::Load,
            category: ErrorCategory::Transport,
            detail: "connection refused".into(),
        };
        assert_eq!(KO.notice(&notice), "룰을 불러오지 못했습니다: connection refused");
    }

    #[test]
    fn templates_are_filled() {
        assert_eq!(
            EN.test_triggered("http-trigger-RULE_A01"),
            "Test triggered successfully! Job: http-trigger-RULE_A01"
        );
        assert_eq!(Locale::Ko.messages().diagram_title, "클러스터 구조도");
        assert!(!EN.unknown_command("frob").contains('{'));
    }
}
