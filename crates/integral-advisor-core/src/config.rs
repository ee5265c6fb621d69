use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};
use crate::technique::{Classifier, RuleSet, RulesConfig};

const CONFIG_FILE: &str = "config.toml";

/// Matches the pause of the original web form
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# integral-advisor configuration file
# Location: ~/.integral-advisor/config.toml

[analysis]
# Simulated "thinking" pause before a result is shown, in milliseconds
# Default: 500 (0 disables the pause)
delay_ms = 500

[output]
# Output format for `analyze`: "text" or "json"
format = "text"

[rules]
# Where custom rules go relative to the builtin ones: "first" or "last"
position = "last"

# Builtin rules to skip
# Names: trig-substitution, by-parts, partial-fractions, trig-powers, u-substitution
disabled = []

# Custom rules. Patterns are case-insensitive regular expressions tested
# against the expression after removing "∫", "dx" and whitespace.
#
# [[rules.custom]]
# name = "arctan"
# patterns = ['^1/\(1\+x\^2\)$']
# method = "Integral Inmediata"
# category = "Arcotangente"
# explanation = "Es la derivada de arctan(x)."
# example = "∫ 1/(1+x^2) dx"
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub rules: RulesConfig,
}

/// Analysis-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Simulated latency before showing a result
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}

impl AnalysisConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AdvisorError::InvalidConfigValue {
                key: "output.format".to_string(),
                value: other.to_string(),
                reason: "expected 'text' or 'json'".to_string(),
            }),
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| AdvisorError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Builtin rules merged with the `[rules]` section
    pub fn rule_set(&self) -> Result<RuleSet> {
        RuleSet::builtin().with_config(&self.rules)
    }

    /// Classifier for the configured rule set
    pub fn classifier(&self) -> Result<Classifier> {
        Classifier::new(self.rule_set()?)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "analysis.delay_ms" => Some(self.analysis.delay_ms.to_string()),
            "output.format" => Some(self.output.format.to_string()),
            "rules.position" => Some(self.rules.position.to_string()),
            "rules.disabled" => Some(format!("{:?}", self.rules.disabled)),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "analysis.delay_ms" => {
                self.analysis.delay_ms =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| AdvisorError::InvalidConfigValue {
                            key: key.to_string(),
                            value: value.to_string(),
                            reason: "expected a non-negative integer".to_string(),
                        })?;
                Ok(())
            }
            "output.format" => {
                self.output.format = value.parse()?;
                Ok(())
            }
            "rules.position" => {
                self.rules.position = value.parse()?;
                Ok(())
            }
            "rules.disabled" => {
                self.rules.disabled = parse_string_list(value);
                Ok(())
            }
            _ => Err(AdvisorError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["analysis.delay_ms", "output.format", "rules.position", "rules.disabled"]
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}

/// Parse a comma-separated or JSON-like list string
fn parse_string_list(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .map(|s| s.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
