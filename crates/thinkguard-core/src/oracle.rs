//! Which models reject assistant turns that do not open with a thinking block.
//!
//! Every rule lives in one pattern table. [`BUILTIN_PATTERNS`] is the shared
//! registry of reasoning-capable model names; config can append to it (or
//! switch it off) but nothing else in the crate matches model names.

use crate::error::{GuardError, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Pattern table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Contains,
    Suffix,
    Prefix,
    Regex,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Contains => "contains",
            MatchKind::Suffix => "suffix",
            MatchKind::Prefix => "prefix",
            MatchKind::Regex => "regex",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in enforcing-model rules. Matching is case-insensitive.
///
/// - anything carrying an explicit `thinking` marker
/// - `-high` reasoning-effort variants
/// - model generations that always reason (Claude 3.7 Sonnet, Claude 4
///   Opus/Sonnet, Haiku 4.5, Gemini 2.5 Pro, Gemini 3)
pub const BUILTIN_PATTERNS: &[(MatchKind, &str)] = &[
    (MatchKind::Contains, "thinking"),
    (MatchKind::Suffix, "-high"),
    (MatchKind::Contains, "opus-4"),
    (MatchKind::Contains, "sonnet-4"),
    (MatchKind::Contains, "haiku-4-5"),
    (MatchKind::Contains, "3-7-sonnet"),
    (MatchKind::Contains, "3.7-sonnet"),
    (MatchKind::Contains, "gemini-2.5-pro"),
    (MatchKind::Contains, "gemini-3"),
];

/// A pattern as written in config or the built-in table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    #[serde(rename = "match")]
    pub kind: MatchKind,
    pub value: String,
}

impl PatternSpec {
    pub fn new(kind: MatchKind, value: impl Into<String>) -> Self {
        PatternSpec {
            kind,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternOrigin {
    Builtin,
    Config,
}

impl PatternOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            PatternOrigin::Builtin => "builtin",
            PatternOrigin::Config => "config",
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Contains(String),
    Suffix(String),
    Prefix(String),
    Regex(Regex),
}

/// A compiled pattern. Literal values are stored lowercased.
#[derive(Debug, Clone)]
pub struct ModelPattern {
    spec: PatternSpec,
    origin: PatternOrigin,
    matcher: Matcher,
}

impl ModelPattern {
    pub fn compile(spec: PatternSpec, origin: PatternOrigin) -> Result<Self> {
        if spec.value.trim().is_empty() {
            return Err(GuardError::InvalidPattern {
                pattern: spec.value,
                reason: "pattern value is empty".to_string(),
            });
        }
        let lowered = spec.value.to_lowercase();
        let matcher = match spec.kind {
            MatchKind::Contains => Matcher::Contains(lowered),
            MatchKind::Suffix => Matcher::Suffix(lowered),
            MatchKind::Prefix => Matcher::Prefix(lowered),
            MatchKind::Regex => Matcher::Regex(
                RegexBuilder::new(&spec.value)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| GuardError::InvalidPattern {
                        pattern: spec.value.clone(),
                        reason: e.to_string(),
                    })?,
            ),
        };
        Ok(ModelPattern {
            spec,
            origin,
            matcher,
        })
    }

    pub fn spec(&self) -> &PatternSpec {
        &self.spec
    }

    pub fn origin(&self) -> PatternOrigin {
        self.origin
    }

    /// `original` is the raw id, `lowered` its lowercase form.
    fn matches(&self, original: &str, lowered: &str) -> bool {
        match &self.matcher {
            Matcher::Contains(v) => lowered.contains(v.as_str()),
            Matcher::Suffix(v) => lowered.ends_with(v.as_str()),
            Matcher::Prefix(v) => lowered.starts_with(v.as_str()),
            Matcher::Regex(re) => re.is_match(original),
        }
    }
}

impl fmt::Display for ModelPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.spec.kind, self.spec.value)
    }
}

// ---------------------------------------------------------------------------
// ModelRegistry
// ---------------------------------------------------------------------------

/// Immutable set of enforcing-model patterns. Cheap to share across threads.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    patterns: Vec<ModelPattern>,
}

impl ModelRegistry {
    pub fn empty() -> Self {
        ModelRegistry {
            patterns: Vec::new(),
        }
    }

    pub fn builtin() -> Self {
        let patterns = BUILTIN_PATTERNS
            .iter()
            .filter_map(|&(kind, value)| {
                ModelPattern::compile(PatternSpec::new(kind, value), PatternOrigin::Builtin).ok()
            })
            .collect();
        ModelRegistry { patterns }
    }

    /// Append a config-supplied pattern.
    pub fn with_pattern(mut self, spec: PatternSpec) -> Result<Self> {
        self.patterns
            .push(ModelPattern::compile(spec, PatternOrigin::Config)?);
        Ok(self)
    }

    pub fn patterns(&self) -> &[ModelPattern] {
        &self.patterns
    }

    /// First pattern that matches `model_id`, if any.
    pub fn matching_pattern(&self, model_id: &str) -> Option<&ModelPattern> {
        if model_id.trim().is_empty() {
            return None;
        }
        let lowered = model_id.to_lowercase();
        self.patterns
            .iter()
            .find(|p| p.matches(model_id, &lowered))
    }

    pub fn is_enforcing(&self, model_id: &str) -> bool {
        self.matching_pattern(model_id).is_some()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        ModelRegistry::builtin()
    }
}

/// [`ModelRegistry::is_enforcing`] against the built-in table.
pub fn is_enforcing_model(model_id: &str) -> bool {
    static REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();
    REGISTRY
        .get_or_init(ModelRegistry::builtin)
        .is_enforcing(model_id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_is_not_enforcing() {
        assert!(!is_enforcing_model(""));
        assert!(!is_enforcing_model("   "));
    }

    #[test]
    fn thinking_marker_is_enforcing() {
        assert!(is_enforcing_model("claude-opus-4-thinking"));
        assert!(is_enforcing_model("gemini-2.0-flash-THINKING-exp"));
        assert!(is_enforcing_model("my-custom-thinking-model"));
    }

    #[test]
    fn high_suffix_is_enforcing() {
        assert!(is_enforcing_model("o3-mini-high"));
        assert!(is_enforcing_model("GPT-5-HIGH"));
        assert!(!is_enforcing_model("high-throughput-model"));
    }

    #[test]
    fn reasoning_families_are_enforcing() {
        assert!(is_enforcing_model("claude-opus-4-5"));
        assert!(is_enforcing_model("claude-sonnet-4-20250514"));
        assert!(is_enforcing_model("anthropic/claude-3-7-sonnet-latest"));
        assert!(is_enforcing_model("claude-haiku-4-5"));
        assert!(is_enforcing_model("gemini-3-pro-preview"));
        assert!(is_enforcing_model("gemini-2.5-pro"));
    }

    #[test]
    fn ordinary_models_are_not_enforcing() {
        assert!(!is_enforcing_model("gpt-4"));
        assert!(!is_enforcing_model("gpt-4o-mini"));
        assert!(!is_enforcing_model("claude-3-5-haiku"));
        assert!(!is_enforcing_model("gemini-2.5-flash"));
    }

    #[test]
    fn matching_pattern_reports_rule() {
        let reg = ModelRegistry::builtin();
        let p = reg.matching_pattern("claude-opus-4-thinking").unwrap();
        assert_eq!(p.spec().kind, MatchKind::Contains);
        assert_eq!(p.spec().value, "thinking");
        assert_eq!(p.origin(), PatternOrigin::Builtin);
    }

    #[test]
    fn config_patterns_extend_registry() {
        let reg = ModelRegistry::builtin()
            .with_pattern(PatternSpec::new(MatchKind::Regex, "^o[1-9]"))
            .unwrap()
            .with_pattern(PatternSpec::new(MatchKind::Prefix, "DeepSeek-R"))
            .unwrap();
        assert!(reg.is_enforcing("O1-preview"));
        assert!(reg.is_enforcing("deepseek-r1"));
        assert!(!reg.is_enforcing("gpt-4"));
        let p = reg.matching_pattern("deepseek-r1").unwrap();
        assert_eq!(p.origin(), PatternOrigin::Config);
    }

    #[test]
    fn empty_registry_enforces_nothing() {
        let reg = ModelRegistry::empty();
        assert!(!reg.is_enforcing("claude-opus-4-thinking"));
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        let err = ModelPattern::compile(
            PatternSpec::new(MatchKind::Regex, "(unclosed"),
            PatternOrigin::Config,
        )
        .unwrap_err();
        assert!(matches!(err, GuardError::InvalidPattern { .. }));

        let err = ModelPattern::compile(
            PatternSpec::new(MatchKind::Contains, "  "),
            PatternOrigin::Config,
        )
        .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
