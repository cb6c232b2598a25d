//! [`RuleDocumentEditor`]: load, edit, validate, and save a ruleset held as text.
//!
//! The text buffer is the single source of truth. Structural quick actions
//! (add/delete rule) open the buffer as a [`Draft`], which needs only valid
//! syntax and a `rules` array, and write the re-serialized text back. Full
//! shape validation happens on save. Nothing is cached between operations, so a
//! position passed to [`RuleDocumentEditor::delete_rule`] always refers to the
//! buffer as it is now.

mod notice;

pub use notice::*;

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::codec::{self, Draft};
use crate::error::{Result, RuleError};
use crate::schema::{Rule, RuleDocument};
use crate::service::RulesService;

/// Source of millisecond timestamps used to seed new rule ids.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Lifecycle of one editor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// A fetch is in progress; the buffer is being replaced.
    Loading,
    /// Buffer matches what was last fetched or saved.
    Clean,
    /// Buffer has local changes not yet saved.
    Dirty,
    /// The last fetch failed; the buffer is empty.
    LoadError,
}

impl fmt::Display for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorState::Loading => write!(f, "loading"),
            EditorState::Clean => write!(f, "clean"),
            EditorState::Dirty => write!(f, "dirty"),
            EditorState::LoadError => write!(f, "load-error"),
        }
    }
}

/// Owns the ruleset text buffer for one editing session.
///
/// Operations take `&mut self`, so they never interleave. Errors are both
/// returned and recorded as the current [`Notice`]; no error clears the buffer.
pub struct RuleDocumentEditor {
    service: Arc<dyn RulesService>,
    buffer: String,
    state: EditorState,
    notice: Option<Notice>,
    clock: Clock,
    last_seed: i64,
}

impl RuleDocumentEditor {
    /// Create an editor bound to `service`. Call [`load`](Self::load) before use.
    pub fn new(service: Arc<dyn RulesService>) -> Self {
        Self {
            service,
            buffer: String::new(),
            state: EditorState::Loading,
            notice: None,
            clock: Arc::new(|| Utc::now().timestamp_millis()),
            last_seed: i64::MIN,
        }
    }

    /// Replace the timestamp source used for new rule ids.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current buffer text.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == EditorState::Dirty
    }

    /// The banner from the most recent operation, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Parse the current buffer for display. Does not touch the notice.
    pub fn preview(&self) -> Result<RuleDocument> {
        codec::parse(&self.buffer)
    }

    /// Fetch the ruleset and replace the buffer with its serialized form.
    ///
    /// On failure the buffer is emptied and the editor enters
    /// [`EditorState::LoadError`].
    pub async fn load(&mut self) -> Result<()> {
        self.notice = None;
        self.state = EditorState::Loading;

        let fetched = self
            .service
            .fetch()
            .await
            .map_err(RuleError::from)
            .and_then(|doc| codec::serialize(&doc).map(|text| (doc, text)));

        match fetched {
            Ok((doc, text)) => {
                info!(
                    version = %doc.ruleset_version,
                    rules = doc.rules.len(),
                    "Ruleset loaded"
                );
                self.buffer = text;
                self.state = EditorState::Clean;
                Ok(())
            }
            Err(err) => {
                self.buffer.clear();
                self.state = EditorState::LoadError;
                Err(self.fail(EditorAction::Load, err))
            }
        }
    }

    /// Discard the buffer, local edits included, and fetch again.
    pub async fn reload(&mut self) -> Result<()> {
        if self.is_dirty() {
            debug!(bytes = self.buffer.len(), "Discarding unsaved edits");
        }
        self.load().await
    }

    /// Replace the buffer verbatim. No parsing happens until the next
    /// structural action or save.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.state = EditorState::Dirty;
    }

    /// Append a placeholder rule. Returns the new rule's id.
    pub fn add_rule(&mut self) -> Result<String> {
        self.notice = None;
        let mut draft = match Draft::parse(&self.buffer) {
            Ok(draft) => draft,
            Err(err) => return Err(self.fail(EditorAction::AddRule, err)),
        };

        let rule = Rule::placeholder(self.next_seed());
        let rules = match draft.push_rule(&rule) {
            Ok(rules) => rules,
            Err(err) => return Err(self.fail(EditorAction::AddRule, err)),
        };
        self.commit(EditorAction::AddRule, &draft)?;

        debug!(rule_id = %rule.rule_id, rules, "Rule added");
        Ok(rule.rule_id)
    }

    /// Remove the rule at `index` in the current buffer. Returns the removed
    /// entry exactly as it appeared in the buffer.
    pub fn delete_rule(&mut self, index: usize) -> Result<Value> {
        self.notice = None;
        let removed = match Draft::parse(&self.buffer)
            .and_then(|mut draft| draft.remove_rule(index).map(|removed| (draft, removed)))
        {
            Ok((draft, removed)) => {
                self.commit(EditorAction::DeleteRule, &draft)?;
                removed
            }
            Err(err) => return Err(self.fail(EditorAction::DeleteRule, err)),
        };

        debug!(
            rule_id = removed.get("rule_id").and_then(serde_json::Value::as_str).unwrap_or("-"),
            index,
            "Rule deleted"
        );
        Ok(removed)
    }

    /// Validate the buffer and hand it to the rules service.
    ///
    /// Nothing is sent unless the buffer parses and has the ruleset shape.
    /// On success the buffer is kept as-is and the editor becomes
    /// [`EditorState::Clean`]. Returns the new version token, if the service
    /// sent one.
    pub async fn save(&mut self) -> Result<Option<String>> {
        self.notice = None;
        let doc = match codec::parse(&self.buffer) {
            Ok(doc) => doc,
            Err(err) => return Err(self.fail(EditorAction::Save, err)),
        };

        match self.service.save(&doc).await {
            Ok(resp) => {
                info!(
                    version = %doc.ruleset_version,
                    new_version = resp.new_version.as_deref().unwrap_or("-"),
                    rules = doc.rules.len(),
                    "Ruleset saved"
                );
                self.state = EditorState::Clean;
                self.notice = Some(Notice::Saved {
                    new_version: resp.new_version.clone(),
                });
                Ok(resp.new_version)
            }
            Err(err) => Err(self.fail(EditorAction::Save, err.into())),
        }
    }

    fn commit(&mut self, action: EditorAction, draft: &Draft) -> Result<()> {
        match draft.to_text() {
            Ok(text) => {
                self.buffer = text;
                self.state = EditorState::Dirty;
                Ok(())
            }
            Err(err) => Err(self.fail(action, err)),
        }
    }

    fn fail(&mut self, action: EditorAction, err: RuleError) -> RuleError {
        warn!(?action, category = ?err.category(), error = %err, "Editor operation failed");
        self.notice = Some(Notice::failed(action, &err));
        err
    }

    /// Current time in millis, bumped past the last issued seed so two rules
    /// added within the same millisecond still get distinct ids.
    fn next_seed(&mut self) -> i64 {
        let now = (self.clock)();
        let seed = if now > self.last_seed {
            now
        } else {
            self.last_seed + 1
        };
        self.last_seed = seed;
        seed
    }
}
