//! Unknown-key detection for config files.
//!
//! The parsed table is deserialized into the config's confique layer (every
//! field optional) through `serde_ignored`, which reports each key the layer
//! doesn't consume. Line numbers are a best-effort text search in the
//! original file, format aware.

use std::path::Path;

use confique::Config;
use toml::{Table, Value};

use crate::config::SysgreetConfig;
use crate::error::SysgreetError;
use crate::file::ConfigFormat;

type Layer = <SysgreetConfig as Config>::Layer;

/// Dotted paths of every key in `table` the config does not know.
pub fn unknown_keys(table: &Table, path: &Path) -> Result<Vec<String>, SysgreetError> {
    let mut unknown = Vec::new();
    let _layer: Layer = serde_ignored::deserialize(Value::Table(table.clone()), |ignored| {
        unknown.push(ignored.to_string());
    })
    .map_err(|e: toml::de::Error| SysgreetError::InvalidValue {
        key: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(unknown)
}

/// Fail with [`SysgreetError::UnknownKeys`] if `table` has unknown keys.
pub fn validate_unknown_keys(
    table: &Table,
    content: &str,
    path: &Path,
    format: ConfigFormat,
) -> Result<(), SysgreetError> {
    let unknown = unknown_keys(table, path)?;
    if unknown.is_empty() {
        return Ok(());
    }

    let errors = unknown
        .into_iter()
        .map(|key| {
            let line = find_key_line(content, &key, format);
            SysgreetError::UnknownKey {
                key,
                path: path.to_path_buf(),
                line,
            }
        })
        .collect();
    Err(SysgreetError::UnknownKeys(errors))
}

/// 1-indexed line of `dotted_key` in `content`, or 0 when not located.
pub fn find_key_line(content: &str, dotted_key: &str, format: ConfigFormat) -> usize {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    match format {
        ConfigFormat::Toml => find_toml_line(content, &segments),
        ConfigFormat::Yaml => find_yaml_line(content, &segments),
    }
}

/// Tracks `[section]` headers and matches `leaf =` inside the right one.
/// Quoted keys and inline tables are not handled.
fn find_toml_line(content: &str, segments: &[&str]) -> usize {
    let Some((leaf, section)) = segments.split_last() else {
        return 0;
    };
    let mut current: Vec<&str> = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if let Some(header) = trimmed
            .strip_prefix('[')
            .filter(|h| !h.starts_with('['))
            .and_then(|h| h.split(']').next())
        {
            current = header.split('.').map(str::trim).collect();
            continue;
        }
        if current.as_slice() != section {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix(*leaf)
            && rest.trim_start().starts_with('=')
        {
            return i + 1;
        }
    }
    0
}

/// Follows block-mapping indentation to build the key path of each line.
/// Flow mappings and multi-document files are not handled.
fn find_yaml_line(content: &str, segments: &[&str]) -> usize {
    let mut stack: Vec<(usize, &str)> = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('-') {
            continue;
        }
        let Some((key, _)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim().trim_matches(['"', '\'']);
        let indent = line.len() - trimmed.len();

        while stack.last().is_some_and(|(depth, _)| *depth >= indent) {
            stack.pop();
        }
        stack.push((indent, key));

        if stack.len() == segments.len() && stack.iter().map(|(_, k)| *k).eq(segments.iter().copied())
        {
            return i + 1;
        }
    }
    0
}
