//! Interactive editing session over a [`RuleDocumentEditor`].

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use ips_rules::{EditorState, RuleDocumentEditor};
use serde_json::Value;
use tracing::debug;

use crate::terminal::Terminal;

/// One line of editor input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Show,
    List,
    Add,
    /// Zero-based index; typed one-based.
    Delete(usize),
    Edit,
    Load(PathBuf),
    Write(PathBuf),
    Save,
    Reload,
    Dismiss,
    Help,
    Quit,
}

impl FromStr for EditCommand {
    type Err = ();

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = input.trim().splitn(2, char::is_whitespace);
        let verb = parts.next().unwrap_or("").to_lowercase();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        let cmd = match (verb.as_str(), arg) {
            ("show", None) => EditCommand::Show,
            ("list" | "ls", None) => EditCommand::List,
            ("add", None) => EditCommand::Add,
            ("delete" | "del" | "rm", Some(n)) => {
                let number: usize = n.parse().map_err(|_| ())?;
                EditCommand::Delete(number.checked_sub(1).ok_or(())?)
            }
            ("edit", None) => EditCommand::Edit,
            ("load", Some(path)) => EditCommand::Load(PathBuf::from(path)),
            ("write", Some(path)) => EditCommand::Write(PathBuf::from(path)),
            ("save", None) => EditCommand::Save,
            ("reload", None) => EditCommand::Reload,
            ("dismiss", None) => EditCommand::Dismiss,
            ("help" | "?", None) => EditCommand::Help,
            ("quit" | "exit" | "q", None) => EditCommand::Quit,
            _ => return Err(()),
        };
        Ok(cmd)
    }
}

/// Drives one editor from terminal input until the user quits.
pub struct EditSession<'a> {
    editor: RuleDocumentEditor,
    terminal: &'a Terminal,
    quit_armed: bool,
}

impl<'a> EditSession<'a> {
    pub fn new(editor: RuleDocumentEditor, terminal: &'a Terminal) -> Self {
        Self {
            editor,
            terminal,
            quit_armed: false,
        }
    }

    pub fn editor(&self) -> &RuleDocumentEditor {
        &self.editor
    }

    /// Load the ruleset, then read commands until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        let m = self.terminal.messages();
        self.terminal.print_info(m.rules_loading)?;
        // A failed load is shown as a banner; `reload` retries.
        let _ = self.editor.load().await;
        self.print_notice()?;
        if self.editor.state() == EditorState::Clean {
            self.print_summary()?;
        }
        self.terminal.print_info(m.editor_help)?;

        loop {
            let Some(line) = self.terminal.read_input(&self.prompt())? else {
                break;
            };
            if line.is_empty() {
                continue;
            }
            let Ok(cmd) = line.parse::<EditCommand>() else {
                self.terminal.print_error(&m.unknown_command(&line))?;
                continue;
            };
            if !self.execute(cmd).await? {
                break;
            }
        }
        Ok(())
    }

    /// Run one command. Returns false when the session should end.
    pub async fn execute(&mut self, cmd: EditCommand) -> Result<bool> {
        debug!(?cmd, state = %self.editor.state(), "Editor command");
        let m = self.terminal.messages();
        if cmd != EditCommand::Quit {
            self.quit_armed = false;
        }

        match cmd {
            EditCommand::Show => self.terminal.print_text(self.editor.text())?,
            EditCommand::List => match self.editor.preview() {
                Ok(doc) => self.terminal.print_rule_index(&doc.rules)?,
                Err(e) => self.terminal.print_error(&e.to_string())?,
            },
            EditCommand::Add => {
                if let Ok(rule_id) = self.editor.add_rule() {
                    self.terminal.print_success(&m.rule_added(&rule_id))?;
                }
                self.print_notice()?;
            }
            EditCommand::Delete(index) => {
                if let Ok(removed) = self.editor.delete_rule(index) {
                    let label = match removed.get("rule_id").and_then(Value::as_str) {
                        Some(rule_id) => rule_id.to_string(),
                        None => format!("#{}", index + 1),
                    };
                    self.terminal.print_success(&m.rule_deleted(&label))?;
                }
                self.print_notice()?;
            }
            EditCommand::Edit => {
                self.terminal.print_info(m.editor_paste_hint)?;
                let text = self.terminal.read_block()?;
                self.editor.edit(text);
            }
            EditCommand::Load(path) => match std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))
            {
                Ok(text) => self.editor.edit(text),
                Err(e) => self.terminal.print_error(&format!("{:#}", e))?,
            },
            EditCommand::Write(path) => match std::fs::write(&path, self.editor.text())
                .with_context(|| format!("failed to write {}", path.display()))
            {
                Ok(()) => self
                    .terminal
                    .print_info(&m.written(&path.display().to_string()))?,
                Err(e) => self.terminal.print_error(&format!("{:#}", e))?,
            },
            EditCommand::Save => {
                let _ = self.editor.save().await;
                self.print_notice()?;
            }
            EditCommand::Reload => {
                let _ = self.editor.reload().await;
                self.print_notice()?;
                if self.editor.state() == EditorState::Clean {
                    self.print_summary()?;
                }
            }
            EditCommand::Dismiss => self.editor.dismiss_notice(),
            EditCommand::Help => self.terminal.print_info(m.editor_help)?,
            EditCommand::Quit => {
                if self.editor.is_dirty() && !self.quit_armed {
                    // Second quit in a row leaves without saving.
                    self.quit_armed = true;
                    self.terminal.print_info(m.editor_quit_confirm)?;
                    return Ok(true);
                }
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn prompt(&self) -> String {
        let m = self.terminal.messages();
        let marker = match self.editor.state() {
            EditorState::Dirty => m.editor_unsaved.to_string(),
            EditorState::Clean => m.editor_no_changes.to_string(),
            other => other.to_string(),
        };
        format!("\nrules [{}]> ", marker)
    }

    fn print_notice(&self) -> Result<()> {
        if let Some(notice) = self.editor.notice() {
            self.terminal.print_notice(notice)?;
        }
        Ok(())
    }

    fn print_summary(&self) -> Result<()> {
        if let Ok(doc) = self.editor.preview() {
            self.terminal.print_ruleset(&doc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Locale;
    use crate::terminal::capture::Captured;
    use ips_rules::service::mock::MockRulesService;
    use ips_rules::{RuleDocument, ServiceError, UpdateRulesResponse};
    use std::io::Cursor;
    use std::sync::Arc;

    fn terminal(input: &str) -> (Terminal, Captured) {
        let captured = Captured::default();
        let term = Terminal::with_io(
            Box::new(captured.clone()),
            Box::new(Cursor::new(input.to_string().into_bytes())),
            Locale::En,
        );
        (term, captured)
    }

    fn editor(service: Arc<MockRulesService>) -> RuleDocumentEditor {
        RuleDocumentEditor::new(service).with_clock(Arc::new(|| 1_700_000_000_000))
    }

    #[test]
    fn parse_commands() {
        assert_eq!("show".parse::<EditCommand>(), Ok(EditCommand::Show));
        assert_eq!(" LIST ".parse::<EditCommand>(), Ok(EditCommand::List));
        assert_eq!("delete 2".parse::<EditCommand>(), Ok(EditCommand::Delete(1)));
        assert_eq!(
            "load ./rules draft.json".parse::<EditCommand>(),
            Ok(EditCommand::Load(PathBuf::from("./rules draft.json")))
        );
        assert_eq!("q".parse::<EditCommand>(), Ok(EditCommand::Quit));
        assert_eq!("delete 0".parse::<EditCommand>(), Err(()));
        assert_eq!("delete x".parse::<EditCommand>(), Err(()));
        assert_eq!("delete".parse::<EditCommand>(), Err(()));
        assert_eq!("save now".parse::<EditCommand>(), Err(()));
        assert_eq!("frobnicate".parse::<EditCommand>(), Err(()));
    }

    #[tokio::test]
    async fn add_twice_then_save() {
        let service = Arc::new(MockRulesService::new(RuleDocument::new("v1")));
        service.queue_save(Ok(UpdateRulesResponse::with_version("v2")));
        let (term, captured) = terminal("list\nadd\nadd\nlist\nsave\nquit\n");

        let mut session = EditSession::new(editor(service.clone()), &term);
        session.run().await.unwrap();

        let text = captured.contents();
        assert!(text.contains("No rules found"));
        assert!(text.contains("Added RULE_NEW_1700000000000"));
        assert!(text.contains("Added RULE_NEW_1700000000001"));
        assert!(text.contains("Rules updated successfully! New version: v2"));

        let saved = service.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].rules.len(), 2);
        assert_eq!(session.editor().state(), EditorState::Clean);
    }

    #[tokio::test]
    async fn invalid_paste_is_not_saved() {
        let service = Arc::new(MockRulesService::new(RuleDocument::new("v1")));
        let (term, captured) = terminal("edit\n{ \"rules\": [\n.\nsave\nquit\nquit\n");

        let mut session = EditSession::new(editor(service.clone()), &term);
        session.run().await.unwrap();

        assert!(captured.contents().contains("Invalid JSON format"));
        assert_eq!(service.save_calls(), 0);
        assert_eq!(session.editor().text(), "{ \"rules\": [\n");
    }

    #[tokio::test]
    async fn out_of_range_delete_shows_banner() {
        let service = Arc::new(MockRulesService::new(RuleDocument::new("v1")));
        let (term, captured) = terminal("delete 3\nquit\n");

        let mut session = EditSession::new(editor(service), &term);
        session.run().await.unwrap();

        assert!(captured.contents().contains("Failed to delete rule:"));
        assert_eq!(session.editor().state(), EditorState::Clean);
    }

    #[tokio::test]
    async fn delete_works_on_a_partial_buffer() {
        let service = Arc::new(MockRulesService::new(RuleDocument::new("v1")));
        let input = "edit\n{\"rules\": [{\"rule_id\": \"X\"}, {\"note\": \"draft\"}]}\n.\ndelete 2\ndelete 1\nquit\nquit\n";
        let (term, captured) = terminal(input);

        let mut session = EditSession::new(editor(service.clone()), &term);
        session.run().await.unwrap();

        let out = captured.contents();
        assert!(out.contains("Deleted #2"));
        assert!(out.contains("Deleted X"));
        let value: Value = serde_json::from_str(session.editor().text()).unwrap();
        assert_eq!(value["rules"], serde_json::json!([]));
        assert_eq!(service.save_calls(), 0);
    }

    #[tokio::test]
    async fn failed_load_can_reload() {
        let service = Arc::new(MockRulesService::new(RuleDocument::new("1.0.0")));
        service.fail_next_fetch(ServiceError::Transport("connection refused".into()));
        let (term, captured) = terminal("reload\nquit\n");

        let mut session = EditSession::new(editor(service.clone()), &term);
        session.run().await.unwrap();

        let text = captured.contents();
        assert!(text.contains("Failed to load rules: connection refused"));
        assert!(text.contains("Version: 1.0.0"));
        assert_eq!(service.fetch_calls(), 2);
        assert_eq!(session.editor().state(), EditorState::Clean);
    }

    #[tokio::test]
    async fn quit_with_unsaved_changes_needs_confirmation() {
        let service = Arc::new(MockRulesService::new(RuleDocument::new("v1")));
        let (term, _) = terminal("");
        let mut session = EditSession::new(editor(service), &term);
        session.editor.load().await.unwrap();

        assert!(session.execute(EditCommand::Add).await.unwrap());
        assert!(session.execute(EditCommand::Quit).await.unwrap());
        assert!(session.execute(EditCommand::Show).await.unwrap());
        // Another command in between disarms the first quit.
        assert!(session.execute(EditCommand::Quit).await.unwrap());
        assert!(!session.execute(EditCommand::Quit).await.unwrap());
    }

    #[tokio::test]
    async fn write_and_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let draft = dir.path().join("draft.json");
        let service = Arc::new(MockRulesService::new(RuleDocument::new("v1")));
        let (term, captured) = terminal("");
        let mut session = EditSession::new(editor(service), &term);
        session.editor.load().await.unwrap();

        session.execute(EditCommand::Write(draft.clone())).await.unwrap();
        let written = std::fs::read_to_string(&draft).unwrap();
        assert_eq!(written, session.editor().text());

        std::fs::write(&draft, "{\"ruleset_version\": \"v9\", \"rules\": []}").unwrap();
        session.execute(EditCommand::Load(draft)).await.unwrap();
        assert_eq!(session.editor().state(), EditorState::Dirty);
        assert_eq!(session.editor().preview().unwrap().ruleset_version, "v9");

        session
            .execute(EditCommand::Load(dir.path().join("missing.json")))
            .await
            .unwrap();
        assert!(captured.contents().contains("failed to read"));
    }
}
