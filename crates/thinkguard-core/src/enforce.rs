use crate::config::Config;
use crate::conversation::{Conversation, Turn};
use crate::error::{GuardError, Result};
use crate::invariant::is_violation;
use crate::oracle::ModelRegistry;
use crate::repair::{repair, DEFAULT_PLACEHOLDER};
use crate::search::reusable_thinking_at;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One repair, computed before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRepair {
    /// Turn index within the conversation.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// True when `content` traces back to real reasoning in an earlier
    /// assistant turn rather than the placeholder.
    pub reused: bool,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnforceReport {
    /// Model of the most recent user turn, if one carried a model.
    pub model: Option<String>,
    pub enforcing: bool,
    pub repairs: Vec<PlannedRepair>,
    /// Malformed turns passed over.
    pub skipped: usize,
}

impl EnforceReport {
    pub fn repaired(&self) -> usize {
        self.repairs.len()
    }

    pub fn is_noop(&self) -> bool {
        self.repairs.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Enforcer
// ---------------------------------------------------------------------------

/// Repairs assistant turns that break the thinking-first rule.
///
/// Holds no per-call state; one instance can serve any number of requests.
#[derive(Debug, Clone)]
pub struct Enforcer {
    registry: ModelRegistry,
    placeholder: String,
    diagnostics: bool,
}

impl Default for Enforcer {
    fn default() -> Self {
        Enforcer::new(ModelRegistry::builtin())
    }
}

impl Enforcer {
    pub fn new(registry: ModelRegistry) -> Self {
        Enforcer {
            registry,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            diagnostics: false,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Log the repair count at `info` instead of `debug`.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Rejects a blank placeholder: an empty thinking block is itself
    /// refused upstream.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.placeholder.trim().is_empty() {
            return Err(GuardError::InvalidConfig(
                "placeholder must not be empty".to_string(),
            ));
        }
        Ok(Enforcer::new(config.registry()?)
            .with_placeholder(config.placeholder.clone())
            .with_diagnostics(config.diagnostics_enabled()))
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Model id of the most recent user turn. A user turn without a model
    /// still ends the search, as does a malformed entry with `role: "user"`.
    pub fn active_model(conversation: &Conversation) -> Option<&str> {
        conversation
            .turns()
            .iter()
            .rev()
            .find(|t| t.is_user())
            .and_then(Turn::model_id)
    }

    /// Compute every repair without touching the conversation.
    ///
    /// The result matches repairing turn by turn in order: a later search
    /// sees the synthetic part planned for an earlier turn, which sits ahead
    /// of that turn's own thinking.
    pub fn plan(&self, conversation: &Conversation) -> EnforceReport {
        let model = Self::active_model(conversation);
        let mut report = EnforceReport {
            model: model.map(str::to_owned),
            ..Default::default()
        };
        let Some(model) = model else {
            return report;
        };
        if !self.registry.is_enforcing(model) {
            return report;
        }
        report.enforcing = true;

        for (index, turn) in conversation.turns().iter().enumerate() {
            let message = match turn {
                Turn::Message(m) => m,
                Turn::Unparsed(_) => {
                    tracing::warn!(index, "skipping malformed conversation entry");
                    report.skipped += 1;
                    continue;
                }
            };
            if !is_violation(message, true) {
                continue;
            }
            let planned = report.repairs.last().filter(|p| !p.content.is_empty());
            let (content, reused) = match (planned, reusable_thinking_at(conversation, index)) {
                (Some(prev), Some((at, _))) if prev.index >= at => {
                    (prev.content.clone(), prev.reused)
                }
                (Some(prev), None) => (prev.content.clone(), prev.reused),
                (_, Some((_, text))) => (text.to_owned(), true),
                (None, None) => (self.placeholder.clone(), false),
            };
            report.repairs.push(PlannedRepair {
                index,
                message_id: message.id().map(str::to_owned),
                reused,
                content,
            });
        }
        report
    }

    /// Repair `conversation` in place.
    ///
    /// All repairs are planned against the untouched snapshot first, so a
    /// turn is either fully repaired or left exactly as it was.
    pub fn enforce(&self, conversation: &mut Conversation) -> EnforceReport {
        let report = self.plan(conversation);

        for planned in &report.repairs {
            if let Some(message) = conversation.message_mut(planned.index) {
                repair(message, planned.content.clone());
                tracing::debug!(
                    index = planned.index,
                    message_id = planned.message_id.as_deref().unwrap_or(""),
                    reused = planned.reused,
                    "inserted synthetic thinking block"
                );
            }
        }

        if !report.is_noop() {
            let model = report.model.as_deref().unwrap_or("");
            if self.diagnostics {
                tracing::info!(
                    model,
                    repaired = report.repaired(),
                    skipped = report.skipped,
                    "thinking-block repairs applied"
                );
            } else {
                tracing::debug!(
                    model,
                    repaired = report.repaired(),
                    skipped = report.skipped,
                    "thinking-block repairs applied"
                );
            }
        }
        report
    }
}

/// [`Enforcer::enforce`] with the built-in model table and placeholder.
pub fn enforce(conversation: &mut Conversation) -> EnforceReport {
    Enforcer::default().enforce(conversation)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
