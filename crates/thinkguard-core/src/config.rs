use crate::error::{GuardError, Result};
use crate::oracle::{MatchKind, ModelPattern, ModelRegistry, PatternOrigin, PatternSpec};
use crate::paths;
use crate::repair::DEFAULT_PLACEHOLDER;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ModelsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Include the built-in reasoning-model table.
    #[serde(default = "default_builtin")]
    pub builtin: bool,
    /// Extra enforcing-model patterns, checked after the built-ins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<PatternSpec>,
}

fn default_builtin() -> bool {
    true
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            builtin: default_builtin(),
            patterns: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Thinking text used when no earlier reasoning can be reused.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Log the repair count at `info` level.
    #[serde(default)]
    pub diagnostics: bool,
    #[serde(default)]
    pub models: ModelsConfig,
}

fn default_version() -> u32 {
    1
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            placeholder: default_placeholder(),
            diagnostics: false,
            models: ModelsConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GuardError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    /// Compile the model table this config describes.
    pub fn registry(&self) -> Result<ModelRegistry> {
        let base = if self.models.builtin {
            ModelRegistry::builtin()
        } else {
            ModelRegistry::empty()
        };
        self.models
            .patterns
            .iter()
            .cloned()
            .try_fold(base, ModelRegistry::with_pattern)
    }

    /// `diagnostics: true` or a truthy `THINKGUARD_DEBUG`.
    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics || env_flag(paths::DEBUG_ENV)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("unknown config version {} (expected 1)", self.version),
            });
        }

        // An empty thinking block is itself rejected by the API.
        if self.placeholder.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "placeholder must not be empty".to_string(),
            });
        }

        for spec in &self.models.patterns {
            if let Err(e) = ModelPattern::compile(spec.clone(), PatternOrigin::Config) {
                let level = if spec.kind == MatchKind::Regex {
                    WarnLevel::Error
                } else {
                    WarnLevel::Warning
                };
                warnings.push(ConfigWarning {
                    level,
                    message: format!("models.patterns: {e}"),
                });
            }
        }

        if !self.models.builtin && self.models.patterns.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "models.builtin is false and no patterns are set; no model will be enforced"
                    .to_string(),
            });
        }

        warnings
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
