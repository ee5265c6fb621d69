//! # Technique Module
//!
//! Suggests an integration technique for an indefinite integral written as
//! plain text. This is surface-level pattern matching, not symbolic math:
//! the expression is never parsed, and the suggestion is not verified.
//!
//! ## Pipeline
//!
//! 1. Normalize: drop `∫`, every literal `dx` and all whitespace
//! 2. Test each rule in order; the first match wins
//! 3. No match but parentheses present: composite-function fallback
//! 4. Otherwise: default fallback
//!
//! ## Module layout
//!
//! - `builtin`: builtin rule table and result types
//! - `rules`: ordered rule set, merged with `config.toml`
//! - `classifier`: normalization and first-match evaluation
//!
//! ## Example
//!
//! ```rust
//! use integral_advisor_core::technique::{Classifier, MatchSource};
//!
//! let classifier = Classifier::shared();
//! let result = classifier.classify("∫ x*cos(x) dx");
//! assert_eq!(result.method, "Integración por Partes");
//!
//! let detailed = classifier.classify_detailed("∫ (x+1)^3 dx");
//! assert_eq!(detailed.source, MatchSource::CompositeFallback);
//!
//! // blank input: nothing to show
//! assert!(classifier.analyze("   ").is_none());
//! ```

mod builtin;
mod classifier;
mod rules;

pub use builtin::{
    BuiltinResult, BuiltinRule, ClassificationResult, RuleDef, BUILTIN_RULES, COMPOSITE_FALLBACK,
    DEFAULT_FALLBACK,
};
pub use classifier::{classify, normalize, Classification, Classifier, MatchSource};
pub use rules::{RuleConfigEntry, RulePosition, RuleSet, RulesConfig};
