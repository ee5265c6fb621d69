pub mod config;
pub mod error;
pub mod samples;
pub mod technique;

pub use config::{AnalysisConfig, Config, OutputConfig, OutputFormat};
pub use error::{AdvisorError, Result};
pub use samples::{DEFAULT_INTEGRAL, SAMPLE_INTEGRALS};

// Classification
pub use technique::{
    classify, normalize, Classification, ClassificationResult, Classifier, MatchSource, RuleDef,
    RulePosition, RuleSet, RulesConfig, BUILTIN_RULES,
};
