use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Invalid pattern for rule '{name}': {message}")]
    InvalidPattern { name: String, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: '{value}' - {reason}")]
    InvalidConfigValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

impl AdvisorError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidPattern { .. } => 2,
            Self::ConfigParse { .. } | Self::TomlDe(_) => 3,
            Self::ConfigKeyNotFound { .. } | Self::InvalidConfigValue { .. } => 4,
            _ => 1,
        }
    }
}
