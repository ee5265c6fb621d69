//! Rule Set
//!
//! Ordered collection of rule definitions. Builtin rules merged with the
//! `[rules]` section of `config.toml`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};

use super::builtin::{ClassificationResult, RuleDef, BUILTIN_RULES};

/// Ordered rule definitions, evaluated front to back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<RuleDef>,
}

impl RuleSet {
    /// Builtin rules only
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.iter().map(RuleDef::from).collect(),
        }
    }

    /// Apply the `[rules]` config section
    ///
    /// - rules named in `disabled` are dropped
    /// - a custom rule with an existing name replaces it in place
    /// - other custom rules go before or after the rest, per `position`
    /// - two custom rules with the same name are rejected
    pub fn with_config(mut self, config: &RulesConfig) -> Result<Self> {
        self.rules
            .retain(|r| !config.disabled.iter().any(|d| d == &r.name));

        let mut added = Vec::new();
        for (i, entry) in config.custom.iter().enumerate() {
            if config.custom[..i].iter().any(|prev| prev.name == entry.name) {
                return Err(AdvisorError::InvalidConfigValue {
                    key: "rules.custom".to_string(),
                    value: entry.name.clone(),
                    reason: "duplicate custom rule name".to_string(),
                });
            }
            let def = entry.to_rule_def()?;
            match self.rules.iter_mut().find(|r| r.name == def.name) {
                Some(existing) => *existing = def,
                None => added.push(def),
            }
        }

        match config.position {
            RulePosition::First => {
                added.append(&mut self.rules);
                self.rules = added;
            }
            RulePosition::Last => self.rules.append(&mut added),
        }

        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&RuleDef> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// All rules in evaluation order
    pub fn all(&self) -> &[RuleDef] {
        &self.rules
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IntoIterator for RuleSet {
    type Item = RuleDef;
    type IntoIter = std::vec::IntoIter<RuleDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

/// Where custom rules are placed relative to the builtin ones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePosition {
    First,
    #[default]
    Last,
}

impl fmt::Display for RulePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Last => write!(f, "last"),
        }
    }
}

impl FromStr for RulePosition {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            other => Err(AdvisorError::InvalidConfigValue {
                key: "rules.position".to_string(),
                value: other.to_string(),
                reason: "expected 'first' or 'last'".to_string(),
            }),
        }
    }
}

/// `[rules]` section of `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub position: RulePosition,

    /// Rule names to skip
    #[serde(default)]
    pub disabled: Vec<String>,

    #[serde(default)]
    pub custom: Vec<RuleConfigEntry>,
}

/// A `[[rules.custom]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfigEntry {
    pub name: String,
    /// Regular expressions (case-insensitive, unanchored)
    pub patterns: Vec<String>,
    pub method: String,
    pub category: String,
    pub explanation: String,
    pub example: String,
}

impl RuleConfigEntry {
    fn to_rule_def(&self) -> Result<RuleDef> {
        let invalid = |reason: &str| AdvisorError::InvalidConfigValue {
            key: "rules.custom".to_string(),
            value: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("rule name must not be empty"));
        }
        if self.patterns.is_empty() {
            return Err(invalid("at least one pattern is required"));
        }
        let fields = [
            &self.method,
            &self.category,
            &self.explanation,
            &self.example,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(invalid(
                "method, category, explanation and example must not be empty",
            ));
        }

        Ok(RuleDef {
            name: self.name.clone(),
            patterns: self.patterns.clone(),
            result: ClassificationResult {
                method: self.method.clone(),
                category: self.category.clone(),
                explanation: self.explanation.clone(),
                example: self.example.clone(),
            },
            builtin: false,
        })
    }
}
