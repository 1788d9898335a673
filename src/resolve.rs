//! Core resolution pipeline: merge the config layers into a typed config.
//!
//! Works on pre-loaded data ([`ResolveInput`]) and does no I/O. Steps:
//!
//! 1. Parse the config file (if any) by its extension
//! 2. Check for unknown keys: fail in strict mode, warn otherwise
//! 3. Deep-merge `SYSGREET__*` env overrides on top
//! 4. Deserialize the merged table into the confique layer
//! 5. Let confique fill defaults

use confique::Config;
use toml::{Table, Value};

use crate::config::SysgreetConfig;
use crate::env;
use crate::error::SysgreetError;
use crate::file::{ConfigFormat, LoadedFile};
use crate::merge::merge_into;
use crate::validate;

/// Everything needed to resolve a config.
#[derive(Debug, Clone, Default)]
pub struct ResolveInput {
    /// The discovered config file, if one exists.
    pub file: Option<LoadedFile>,
    /// Raw environment pairs (`std::env::vars()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Override prefix (e.g. `"SYSGREET"`). `None` disables env overrides.
    pub env_prefix: Option<String>,
    /// Reject unknown keys instead of warning about them.
    pub strict: bool,
}

/// Resolve configuration from pre-loaded inputs.
pub fn resolve(input: ResolveInput) -> Result<SysgreetConfig, SysgreetError> {
    let mut merged = Table::new();

    if let Some(file) = &input.file {
        let format = ConfigFormat::from_path(&file.path)?;
        let table = format.parse(&file.path, &file.content)?;

        if input.strict {
            validate::validate_unknown_keys(&table, &file.content, &file.path, format)?;
        } else {
            for key in validate::unknown_keys(&table, &file.path)? {
                tracing::warn!(
                    key = %key,
                    path = %file.path.display(),
                    line = validate::find_key_line(&file.content, &key, format),
                    "ignoring unknown config key"
                );
            }
        }
        merge_into(&mut merged, table);
    }

    if let Some(prefix) = &input.env_prefix {
        merge_into(&mut merged, env::env_to_table(prefix, input.env_vars));
    }

    let layer: <SysgreetConfig as Config>::Layer =
        Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| SysgreetError::InvalidValue {
                key: "<merged>".into(),
                reason: e.to_string(),
            })?;

    Ok(SysgreetConfig::builder().preloaded(layer).load()?)
}
