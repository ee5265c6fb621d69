//! Technique Classifier
//!
//! Normalizes an integral expression and runs it through the rule set,
//! first match wins. Two fallbacks cover expressions no rule recognizes.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::error::{AdvisorError, Result};

use super::builtin::{ClassificationResult, RuleDef, COMPOSITE_FALLBACK, DEFAULT_FALLBACK};
use super::rules::RuleSet;

/// Whitespace as ECMAScript `\s` defines it: includes U+FEFF, excludes U+0085
const WHITESPACE_CLASS: &str = r"[\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]";

/// Integral sign, differential and whitespace, stripped before matching
static NOISE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("∫|dx|{}", WHITESPACE_CLASS))
        .expect("NOISE_REGEX should compile - this is a bug")
});

static SHARED: Lazy<Classifier> = Lazy::new(|| {
    Classifier::builtin().expect("builtin rule patterns should compile - this is a bug")
});

/// Strip the integral sign, every literal `dx` and all whitespace.
///
/// Single left-to-right pass, so `d x` becomes `dx` and stays.
pub fn normalize(input: &str) -> String {
    NOISE_REGEX.replace_all(input, "").into_owned()
}

/// Which path produced a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchSource {
    /// A rule pattern matched
    Rule { name: String },
    /// No rule matched, but the expression contains parentheses
    CompositeFallback,
    /// Nothing matched
    DefaultFallback,
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule { name } => write!(f, "rule '{}'", name),
            Self::CompositeFallback => write!(f, "composite fallback"),
            Self::DefaultFallback => write!(f, "default fallback"),
        }
    }
}

/// Detailed outcome of one classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub source: MatchSource,
    /// Text the rules were tested against
    pub normalized: String,
    pub result: ClassificationResult,
}

struct CompiledRule {
    def: RuleDef,
    matchers: Vec<Regex>,
}

impl CompiledRule {
    fn is_match(&self, text: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(text))
    }
}

/// Integration technique classifier
pub struct Classifier {
    rules: Vec<CompiledRule>,
}

impl Classifier {
    /// Compile every rule pattern, case-insensitive
    pub fn new(rules: RuleSet) -> Result<Self> {
        let rules = rules
            .into_iter()
            .map(|def| {
                let matchers = def
                    .patterns
                    .iter()
                    .map(|p| {
                        RegexBuilder::new(p)
                            .case_insensitive(true)
                            .build()
                            .map_err(|e| AdvisorError::InvalidPattern {
                                name: def.name.clone(),
                                message: e.to_string(),
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(CompiledRule { def, matchers })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Classifier over the builtin rules only
    pub fn builtin() -> Result<Self> {
        Self::new(RuleSet::builtin())
    }

    /// Process-wide builtin classifier, compiled on first use
    pub fn shared() -> &'static Classifier {
        &SHARED
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> impl Iterator<Item = &RuleDef> {
        self.rules.iter().map(|r| &r.def)
    }

    /// Suggest a technique for `input`. Never fails; unrecognized text
    /// lands on one of the fallbacks.
    pub fn classify(&self, input: &str) -> ClassificationResult {
        self.classify_detailed(input).result
    }

    /// Like [`classify`](Self::classify), but also reports which rule or
    /// fallback answered and the normalized text.
    pub fn classify_detailed(&self, input: &str) -> Classification {
        let normalized = normalize(input);

        if let Some(rule) = self.rules.iter().find(|r| r.is_match(&normalized)) {
            tracing::debug!(rule = %rule.def.name, normalized = %normalized, "rule matched");
            return Classification {
                source: MatchSource::Rule {
                    name: rule.def.name.clone(),
                },
                normalized,
                result: rule.def.result.clone(),
            };
        }

        let (source, result) = if normalized.contains('(') && normalized.contains(')') {
            (MatchSource::CompositeFallback, &COMPOSITE_FALLBACK)
        } else {
            (MatchSource::DefaultFallback, &DEFAULT_FALLBACK)
        };
        tracing::debug!(%source, normalized = %normalized, "no rule matched");

        Classification {
            source,
            normalized,
            result: ClassificationResult::from(result),
        }
    }

    /// Classify unless `input` is blank after trimming, in which case there
    /// is nothing to show.
    pub fn analyze(&self, input: &str) -> Option<ClassificationResult> {
        if input.trim().is_empty() {
            return None;
        }
        Some(self.classify(input))
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("rules", &self.rules().map(|r| &r.name).collect::<Vec<_>>())
            .finish()
    }
}

/// Classify with the shared builtin classifier
pub fn classify(input: &str) -> ClassificationResult {
    Classifier::shared().classify(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::technique::rules::{RuleConfigEntry, RulePosition, RulesConfig};

    fn method_of(input: &str) -> String {
        classify(input).method
    }

    fn source_of(input: &str) -> MatchSource {
        Classifier::shared().classify_detailed(input).source
    }

    fn rule(name: &str) -> MatchSource {
        MatchSource::Rule {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_normalize_strips_noise() {
        assert_eq!(normalize("∫ x*cos(x) dx"), "x*cos(x)");
        assert_eq!(normalize("∫∫  1 / sqrt( 4 - x^2 )\tdxdx\n"), "1/sqrt(4-x^2)");
    }

    #[test]
    fn test_normalize_single_pass() {
        assert_eq!(normalize("d x"), "dx");
        assert_eq!(normalize("ddxx"), "dx");
        assert_eq!(normalize("∫ X DX"), "XDX");
    }

    #[test]
    fn test_normalize_byte_order_mark_is_whitespace() {
        assert_eq!(normalize("x\u{FEFF}*cos(x)"), "x*cos(x)");
        assert_eq!(source_of("x\u{FEFF}*cos(x)"), rule("by-parts"));
        assert_eq!(normalize("\u{3000}x\u{A0}*\u{2028}sin(x)"), "x*sin(x)");
    }

    #[test]
    fn test_normalize_next_line_is_kept() {
        assert_eq!(normalize("x\u{0085}*cos(x)"), "x\u{0085}*cos(x)");
        assert_eq!(source_of("x\u{0085}*cos(x)"), MatchSource::CompositeFallback);
    }

    #[test]
    fn test_case_folding_is_unicode_aware() {
        // long s folds to 's' under Unicode simple case folding
        assert_eq!(source_of("ſin^2(x)"), rule("trig-powers"));
    }

    #[test]
    fn test_scenario_by_parts_cosine() {
        assert_eq!(method_of("∫ x*cos(x) dx"), "Integración por Partes");
        assert_eq!(source_of("∫ x*cos(x) dx"), rule("by-parts"));
    }

    #[test]
    fn test_scenario_trig_substitution() {
        assert_eq!(method_of("∫ 1/sqrt(4-x^2) dx"), "Sustitución Trigonométrica");
        assert_eq!(method_of("∫ sqrt(x^2 - 9) dx"), "Sustitución Trigonométrica");
        assert_eq!(method_of("∫ sqrt(1 + x^2) dx"), "Sustitución Trigonométrica");
    }

    #[test]
    fn test_scenario_partial_fractions() {
        assert_eq!(method_of("∫ (2x+5)/(x^2-x-2) dx"), "Fracciones Parciales");
    }

    #[test]
    fn test_scenario_trig_powers() {
        assert_eq!(
            method_of("∫ sin^3(x)*cos^2(x) dx"),
            "Integrales Trigonométricas"
        );
        assert_eq!(source_of("∫ sec^4(x) dx"), rule("trig-powers"));
    }

    #[test]
    fn test_scenario_exponential_prefers_by_parts() {
        assert_eq!(method_of("∫ x*e^(x^2) dx"), "Integración por Partes");
    }

    #[test]
    fn test_u_substitution_rule() {
        let detailed = Classifier::shared().classify_detailed("∫ x*(x^2)^5 dx");
        assert_eq!(detailed.source, rule("u-substitution"));
        assert_eq!(detailed.result.category, "Regla de la Cadena Inversa");
    }

    #[test]
    fn test_first_match_wins() {
        // by-parts and trig-substitution both match
        let input = "∫ x*ln(x)*sqrt(1-x^2) dx";
        assert_eq!(source_of(input), rule("trig-substitution"));

        // by-parts is checked before trig-powers
        assert_eq!(source_of("∫ x*sin^2(x) dx"), rule("by-parts"));

        // by-parts is checked before u-substitution
        assert_eq!(source_of("∫ x*cos(x^2) dx"), rule("by-parts"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(source_of("∫ X*COS(X) DX"), rule("by-parts"));
        assert_eq!(source_of("SQRT(4-X^2)"), rule("trig-substitution"));
    }

    #[test]
    fn test_composite_fallback() {
        let detailed = Classifier::shared().classify_detailed("∫ (x+1)^3 dx");
        assert_eq!(detailed.source, MatchSource::CompositeFallback);
        assert_eq!(detailed.result.category, "Integral de Función Compuesta");

        // containment only, not balance
        assert_eq!(source_of(")x("), MatchSource::CompositeFallback);
    }

    #[test]
    fn test_default_fallback() {
        let detailed = Classifier::shared().classify_detailed("∫ x^3 + 2x - 5 dx");
        assert_eq!(detailed.source, MatchSource::DefaultFallback);
        assert_eq!(
            detailed.result.method,
            "Revisión Directa o Sustitución Simple"
        );
        assert_eq!(source_of("(x"), MatchSource::DefaultFallback);
        assert_eq!(source_of("🙂 nonsense"), MatchSource::DefaultFallback);
    }

    #[test]
    fn test_every_result_has_all_fields() {
        let inputs = [
            "∫ x*cos(x) dx",
            "∫ 1/sqrt(4-x^2) dx",
            "∫ (2x+5)/(x^2-x-2) dx",
            "∫ tan^2(x) dx",
            "∫ x*(x^2)^5 dx",
            "∫ (x+1)^3 dx",
            "x",
            "∫",
        ];
        for input in inputs {
            let result = classify(input);
            assert!(!result.method.is_empty(), "{input}");
            assert!(!result.category.is_empty(), "{input}");
            assert!(!result.explanation.is_empty(), "{input}");
            assert!(!result.example.is_empty(), "{input}");
        }
    }

    #[test]
    fn test_deterministic() {
        let classifier = Classifier::shared();
        for input in ["∫ x*cos(x) dx", "∫ (x+1)^3 dx", "abc"] {
            assert_eq!(classifier.classify(input), classifier.classify(input));
        }
    }

    #[test]
    fn test_noise_does_not_change_outcome() {
        let pairs = [
            ("∫ x*cos(x) dx", "∫∫ x * cos ( x )  dx dx"),
            ("∫ (2x+5)/(x^2-x-2) dx", "(2x + 5) / (x^2 - x - 2)"),
            ("∫ sin^3(x)*cos^2(x) dx", "  sin^3(x) *\tcos^2(x)  ∫ dx"),
        ];
        for (plain, noisy) in pairs {
            assert_eq!(source_of(plain), source_of(noisy));
        }
    }

    #[test]
    fn test_analyze_blank_is_absent() {
        let classifier = Classifier::shared();
        assert!(classifier.analyze("").is_none());
        assert!(classifier.analyze("   \t\n").is_none());
        assert!(classifier.analyze("∫ x*cos(x) dx").is_some());
    }

    #[test]
    fn test_custom_rule_position() {
        let config = RulesConfig {
            position: RulePosition::First,
            custom: vec![RuleConfigEntry {
                name: "cosine-table".to_string(),
                patterns: vec![r"^x\*cos\(x\)$".to_string()],
                method: "Tabla".to_string(),
                category: "Inmediata".to_string(),
                explanation: "Consultar la tabla".to_string(),
                example: "∫ x*cos(x) dx".to_string(),
            }],
            ..Default::default()
        };
        let rules = RuleSet::builtin().with_config(&config).unwrap();
        let classifier = Classifier::new(rules).unwrap();

        assert_eq!(classifier.classify("∫ x*cos(x) dx").method, "Tabla");
        assert_eq!(
            classifier.classify("∫ x*sin(x) dx").method,
            "Integración por Partes"
        );
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = RulesConfig {
            custom: vec![RuleConfigEntry {
                name: "broken".to_string(),
                patterns: vec!["sqrt(".to_string()],
                method: "m".to_string(),
                category: "c".to_string(),
                explanation: "e".to_string(),
                example: "x".to_string(),
            }],
            ..Default::default()
        };
        let rules = RuleSet::builtin().with_config(&config).unwrap();
        match Classifier::new(rules) {
            Err(AdvisorError::InvalidPattern { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        assert_send_sync(Classifier::shared());
    }

    #[test]
    fn test_classification_serializes() {
        let detailed = Classifier::shared().classify_detailed("∫ x*cos(x) dx");
        let json = serde_json::to_value(&detailed).unwrap();
        assert_eq!(json["source"]["kind"], "rule");
        assert_eq!(json["source"]["name"], "by-parts");
        assert_eq!(json["normalized"], "x*cos(x)");
        assert_eq!(json["result"]["method"], "Integración por Partes");
    }
}
