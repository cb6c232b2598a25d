use std::io::{self, BufRead, BufReader, Write};
use std::sync::{Mutex, MutexGuard};

use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use ips_client::{filter_syscalls, Alert, Severity, Syscall};
use ips_rules::{Notice, Rule, RuleDocument};

use crate::messages::{Locale, Messages};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const PROMPT: Color = Color::Green;
    const SUCCESS: Color = Color::Green;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
    const ID: Color = Color::Cyan;
    const SEVERITY_HIGH: Color = Color::Red;
    const SEVERITY_MEDIUM: Color = Color::Yellow;
    const SEVERITY_LOW: Color = Color::Blue;
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::High => Colors::SEVERITY_HIGH,
        Severity::Medium => Colors::SEVERITY_MEDIUM,
        Severity::Low => Colors::SEVERITY_LOW,
        Severity::Unknown => Colors::DIM,
    }
}

const CLUSTER_DIAGRAM: &str = r#"
  +-----------------+        REST /api/v1         +---------------------+
  |   ips-admin     | --------------------------> |   admin backend     |
  | (this console)  | <-------------------------- |   (Go, :8080)       |
  +-----------------+                             +---------------------+
                                                    |        |        |
                                     rules (YAML)   |  jobs  |        | alerts
                                                    v        v        v
                               +------------------+ +-------------+ +-------+
                               | ConfigMap        | | K8s Jobs    | | Redis |
                               | rule-yaml        | | http-trigger| +-------+
                               +------------------+ +-------------+     ^
                                        |                  |            |
                                        v                  v            |
                               +-------------------------------------+  |
                               | eBPF monitor (DaemonSet, per node)  |--+
                               | syscall tracepoints -> rule match   |
                               +-------------------------------------+
"#;

/// Manages terminal I/O for the console views and the editor session.
pub struct Terminal {
    out: Mutex<Box<dyn Write + Send>>,
    input: Mutex<Box<dyn BufRead + Send>>,
    messages: &'static Messages,
}

impl Terminal {
    /// Create a terminal on stdin/stdout.
    pub fn new(locale: Locale) -> Self {
        Self::with_io(
            Box::new(io::stdout()),
            Box::new(BufReader::new(io::stdin())),
            locale,
        )
    }

    pub fn with_io(
        out: Box<dyn Write + Send>,
        input: Box<dyn BufRead + Send>,
        locale: Locale,
    ) -> Self {
        Self {
            out: Mutex::new(out),
            input: Mutex::new(input),
            messages: locale.messages(),
        }
    }

    pub fn messages(&self) -> &'static Messages {
        self.messages
    }

    fn out(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.out.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Print the startup banner for a connected view.
    pub fn print_banner(&self, title: &str, server_url: &str) -> Result<()> {
        let mut out = self.out();
        execute!(
            out,
            SetForegroundColor(Colors::HEADER),
            Print(title),
            ResetColor,
            Print("\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", server_url)),
            Print("---\n"),
            ResetColor,
        )?;
        Ok(())
    }

    pub fn print_heading(&self, text: &str) -> Result<()> {
        let mut out = self.out();
        execute!(
            out,
            SetForegroundColor(Colors::HEADER),
            Print(format!("{}\n", text)),
            ResetColor,
        )?;
        Ok(())
    }

    /// Read a line of input after a prompt.
    /// Returns None at end of input.
    pub fn read_input(&self, prompt: &str) -> Result<Option<String>> {
        {
            let mut out = self.out();
            execute!(
                out,
                SetForegroundColor(Colors::PROMPT),
                Print(prompt),
                ResetColor,
            )?;
        }
        let mut line = String::new();
        let read = self
            .input
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Read lines until one containing only `.` (or end of input).
    pub fn read_block(&self) -> Result<String> {
        let mut input = self.input.lock().unwrap_or_else(|e| e.into_inner());
        let mut text = String::new();
        loop {
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            if line.trim_end_matches(['\r', '\n']) == "." {
                break;
            }
            text.push_str(&line);
        }
        Ok(text)
    }

    /// Print text without styling.
    pub fn print_text(&self, text: &str) -> Result<()> {
        let mut out = self.out();
        execute!(out, Print(text), Print("\n"))?;
        Ok(())
    }

    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut out = self.out();
        execute!(
            out,
            SetForegroundColor(Colors::ERROR),
            Print(format!("{}: {}\n", self.messages.error_prefix, msg)),
            ResetColor,
        )?;
        Ok(())
    }

    pub fn print_success(&self, msg: &str) -> Result<()> {
        let mut out = self.out();
        execute!(
            out,
            SetForegroundColor(Colors::SUCCESS),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        Ok(())
    }

    pub fn print_info(&self, msg: &str) -> Result<()> {
        let mut out = self.out();
        execute!(
            out,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        Ok(())
    }

    /// Render an editor banner in the active locale.
    pub fn print_notice(&self, notice: &Notice) -> Result<()> {
        let text = self.messages.notice(notice);
        let color = if notice.is_error() {
            Colors::ERROR
        } else {
            Colors::SUCCESS
        };
        let mut out = self.out();
        execute!(
            out,
            SetForegroundColor(color),
            Print(format!("[{}]\n", text)),
            ResetColor,
        )?;
        Ok(())
    }

    /// Print the ruleset summary and every rule with its conditions.
    pub fn print_ruleset(&self, doc: &RuleDocument) -> Result<()> {
        let m = self.messages;
        let mut out = self.out();
        execute!(
            out,
            SetForegroundColor(Colors::HEADER),
            Print(format!("{}\n", m.rules_title)),
            ResetColor,
            Print(format!("{}: {}\n", m.rules_version, doc.ruleset_version)),
            Print(format!("{}: {}\n", m.rules_description, doc.description)),
            Print(format!("{}: {}\n", m.rules_total, doc.rules.len())),
        )?;

        if doc.rules.is_empty() {
            execute!(
                out,
                SetForegroundColor(Colors::DIM),
                Print(format!("{}\n", m.rules_empty)),
                ResetColor,
            )?;
            return Ok(());
        }

        for rule in &doc.rules {
            execute!(
                out,
                Print("\n"),
                SetForegroundColor(Colors::ID),
                Print(format!("{}\n", rule.rule_id)),
                ResetColor,
                Print(format!("  {}\n", rule.description)),
                SetForegroundColor(Colors::DIM),
                Print(format!("  {}:\n", m.rules_conditions)),
                ResetColor,
            )?;
            for condition in &rule.conditions {
                execute!(
                    out,
                    Print(format!(
                        "    {} {} {}\n",
                        condition.field, condition.operator, condition.value
                    )),
                )?;
            }
        }
        Ok(())
    }

    /// Numbered rule listing used by the editor (`delete N` takes these numbers).
    pub fn print_rule_index(&self, rules: &[Rule]) -> Result<()> {
        let mut out = self.out();
        if rules.is_empty() {
            execute!(
                out,
                SetForegroundColor(Colors::DIM),
                Print(format!("{}\n", self.messages.rules_empty)),
                ResetColor,
            )?;
            return Ok(());
        }
        for (i, rule) in rules.iter().enumerate() {
            execute!(
                out,
                Print(format!("{:>3}. ", i + 1)),
                SetForegroundColor(Colors::ID),
                Print(format!("{:<36}", rule.rule_id)),
                ResetColor,
                Print(format!(" {}\n", truncate(&rule.description, 60))),
            )?;
        }
        Ok(())
    }

    pub fn print_alerts(&self, alerts: &[Alert], limit: u32) -> Result<()> {
        let m = self.messages;
        let mut out = self.out();
        execute!(
            out,
            SetForegroundColor(Colors::HEADER),
            Print(format!("{}\n", m.alerts_title)),
            ResetColor,
            SetForegroundColor(Colors::DIM),
            Print(format!(
                "{}: {} | {}: {}\n",
                m.alerts_total,
                alerts.len(),
                m.alerts_limit,
                limit
            )),
            ResetColor,
        )?;

        if alerts.is_empty() {
            execute!(
                out,
                SetForegroundColor(Colors::DIM),
                Print(format!("{}\n", m.alerts_empty)),
                ResetColor,
            )?;
            return Ok(());
        }

        for alert in alerts {
            let severity = if alert.severity.is_empty() {
                m.alerts_severity_unknown
            } else {
                alert.severity.as_str()
            };
            execute!(
                out,
                Print("\n"),
                SetForegroundColor(severity_color(alert.severity_level())),
                Print(format!("[{}] ", severity.to_uppercase())),
                ResetColor,
                Print(format!("{}\n", alert.rule_description)),
                SetForegroundColor(Colors::DIM),
                Print(format!("  {}\n", alert.display_timestamp())),
                ResetColor,
                Print(format!("  {}: {}\n", m.alerts_rule, alert.rule_id)),
                Print(format!("  Pod: {}/{}\n", alert.namespace, alert.pod_name)),
            )?;
            if let Some(log) = &alert.syscall_log {
                let pretty = serde_json::to_string_pretty(log).unwrap_or_default();
                execute!(
                    out,
                    SetForegroundColor(Colors::DIM),
                    Print(format!("  {}:\n", m.alerts_syscall_log)),
                    ResetColor,
                    Print(format!("{}\n", indent(&pretty, 4))),
                )?;
            }
        }
        Ok(())
    }

    /// Print syscalls, optionally filtered by a case-insensitive name term.
    pub fn print_syscalls(&self, syscalls: &[Syscall], search: Option<&str>) -> Result<()> {
        let m = self.messages;
        let term = search.unwrap_or("");
        let shown = filter_syscalls(syscalls, term);
        let mut out = self.out();
        execute!(
            out,
            SetForegroundColor(Colors::HEADER),
            Print(format!("{}\n", m.syscalls_title)),
            ResetColor,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}: {}\n", m.syscalls_total, syscalls.len())),
            ResetColor,
        )?;

        if shown.is_empty() {
            let empty = if term.is_empty() {
                m.syscalls_empty
            } else {
                m.syscalls_no_match
            };
            execute!(
                out,
                SetForegroundColor(Colors::DIM),
                Print(format!("{}\n", empty)),
                ResetColor,
            )?;
            return Ok(());
        }

        for syscall in shown {
            execute!(
                out,
                Print("\n"),
                SetForegroundColor(Colors::ID),
                Print(format!("{}\n", syscall.name)),
                ResetColor,
            )?;
            if syscall.args.is_empty() {
                execute!(
                    out,
                    SetForegroundColor(Colors::DIM),
                    Print(format!("  {}\n", m.syscalls_no_arguments)),
                    ResetColor,
                )?;
                continue;
            }
            execute!(out, Print(format!("  {}:\n", m.syscalls_arguments)))?;
            for arg in &syscall.args {
                execute!(
                    out,
                    Print("    "),
                    SetForegroundColor(Colors::SEVERITY_LOW),
                    Print(&arg.arg_type),
                    ResetColor,
                    Print(format!(" {}\n", arg.name)),
                )?;
            }
        }
        Ok(())
    }

    /// Print the rules a test attack can target.
    pub fn print_test_targets(&self, rules: &[Rule]) -> Result<()> {
        let m = self.messages;
        let mut out = self.out();
        execute!(
            out,
            SetForegroundColor(Colors::HEADER),
            Print(format!("{}\n", m.test_title)),
            ResetColor,
            Print(format!("{}\n\n", m.test_intro)),
            SetForegroundColor(Colors::HEADER),
            Print(format!("{}\n", m.test_available)),
            ResetColor,
        )?;

        if rules.is_empty() {
            execute!(
                out,
                SetForegroundColor(Colors::DIM),
                Print(format!("{}\n", m.test_no_rules)),
                ResetColor,
            )?;
        } else {
            for rule in rules {
                execute!(
                    out,
                    SetForegroundColor(Colors::ID),
                    Print(format!("  {}\n", rule.rule_id)),
                    ResetColor,
                    SetForegroundColor(Colors::DIM),
                    Print(format!("    {}\n", rule.description)),
                    ResetColor,
                )?;
            }
            execute!(out, Print(format!("\n{}\n", m.test_select_hint)))?;
        }

        execute!(out, Print("\n"))?;
        for step in m.test_how_it_works {
            execute!(out, Print(format!("  - {}\n", step)))?;
        }
        Ok(())
    }

    pub fn print_diagram(&self) -> Result<()> {
        let m = self.messages;
        let mut out = self.out();
        execute!(
            out,
            SetForegroundColor(Colors::HEADER),
            Print(format!("{}\n", m.diagram_title)),
            ResetColor,
            Print(format!("{}\n", m.diagram_intro)),
            SetForegroundColor(Colors::ID),
            Print(CLUSTER_DIAGRAM),
            ResetColor,
        )?;
        Ok(())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}
