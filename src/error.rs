use std::path::PathBuf;
use thiserror::Error;

use crate::bootstrap::BootstrapOutcome;

#[derive(Debug, Error)]
pub enum SysgreetError {
    #[error("Invalid config policy '{value}' (expected prompt, keep, or overwrite)")]
    InvalidPolicy { value: String },

    #[error(
        "Config policy required when prompts are unavailable; pass --config-policy=keep|overwrite or set SYSGREET_CONFIG_POLICY"
    )]
    PolicyRequired,

    #[error(
        "Config policy 'prompt' requires an interactive terminal; use keep or overwrite, or set SYSGREET_ASSUME_TTY=1"
    )]
    PromptUnavailable,

    #[error("Bootstrap cancelled by user")]
    Canceled(Box<BootstrapOutcome>),

    #[error("Bootstrap interrupted before {step}")]
    Interrupted { step: &'static str },

    #[error("Config path {path} is a directory; cannot bootstrap onto it")]
    PathIsDirectory { path: PathBuf },

    #[error("Config path required")]
    EmptyPath,

    #[error("Failed to {op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to render default config: {0}")]
    Render(#[source] serde_yaml::Error),

    #[error("Unsupported config format for {path} (expected .yaml, .yml, or .toml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to parse {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in config file")]
    UnknownKeys(Vec<SysgreetError>),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] confique::Error),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("No config path available; set SYSGREET_CONFIG or a home directory")]
    NoConfigPath,
}

impl SysgreetError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SysgreetError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// True when the user chose "cancel" at the overwrite prompt. Callers
    /// should exit quietly instead of reporting a failure.
    pub fn is_user_cancel(&self) -> bool {
        matches!(self, SysgreetError::Canceled(_))
    }

    /// True when the underlying IO error is `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SysgreetError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
