//! Config operations: default generation, path reporting, key lookup and
//! listing, plus the `ConfigResult` enum callers use to display results.
//!
//! Provides the logic behind `config gen`, `config path`, `config get` and
//! `config list`.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use confique::Config;
use toml::{Table, Value};

use crate::config::{SysgreetConfig, render_default};
use crate::error::SysgreetError;

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// The rendered default config file.
    Template(String),
    /// The path bootstrap writes to.
    Path(PathBuf),
    /// A key's resolved value and its doc comment.
    KeyValue {
        key: String,
        value: String,
        doc: Vec<String>,
    },
    /// All resolved configuration key-value pairs.
    Listing { entries: Vec<(String, String)> },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Template(t) => write!(f, "{t}"),
            ConfigResult::Path(p) => writeln!(f, "{}", p.display()),
            ConfigResult::KeyValue { key, value, doc } => {
                for line in doc {
                    writeln!(f, "# {line}")?;
                }
                writeln!(f, "{key} = {value}")
            }
            ConfigResult::Listing { entries } => {
                for (key, value) in entries {
                    writeln!(f, "{key} = {value}")?;
                }
                Ok(())
            }
        }
    }
}

/// The default config exactly as bootstrap would write it at `now`.
pub fn generate_template(now: DateTime<Utc>) -> Result<ConfigResult, SysgreetError> {
    Ok(ConfigResult::Template(render_default(now)?))
}

/// Get a config value by dotted key, including its doc comment.
pub fn get_value(config: &SysgreetConfig, key: &str) -> Result<ConfigResult, SysgreetError> {
    let table = to_table(config, key)?;
    let value = table_get(&table, key).ok_or_else(|| SysgreetError::KeyNotFound(key.into()))?;

    Ok(ConfigResult::KeyValue {
        key: key.into(),
        value: format_value(value),
        doc: lookup_doc(&SysgreetConfig::META, key),
    })
}

/// List all resolved config values as flattened dotted key-value pairs.
pub fn list_values(config: &SysgreetConfig) -> Result<ConfigResult, SysgreetError> {
    let table = to_table(config, "<list>")?;
    let mut entries = Vec::new();
    flatten_into(&table, "", &mut entries);
    Ok(ConfigResult::Listing { entries })
}

fn to_table(config: &SysgreetConfig, key: &str) -> Result<Table, SysgreetError> {
    let invalid = |reason: String| SysgreetError::InvalidValue {
        key: key.into(),
        reason,
    };
    match Value::try_from(config).map_err(|e| invalid(e.to_string()))? {
        Value::Table(table) => Ok(table),
        _ => Err(invalid("config did not serialize to a table".into())),
    }
}

fn flatten_into(table: &Table, prefix: &str, out: &mut Vec<(String, String)>) {
    for (key, value) in table {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Table(nested) => flatten_into(nested, &dotted, out),
            leaf => out.push((dotted, format_value(leaf))),
        }
    }
}

/// Navigate a `toml::Table` by dotted key path (e.g. `"ascii.font"`).
pub fn table_get<'a>(table: &'a Table, dotted_key: &str) -> Option<&'a Value> {
    let (path, leaf) = match dotted_key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_key),
    };

    let tbl = match path {
        Some(path) => {
            let mut current = table;
            for segment in path.split('.') {
                current = current.get(segment)?.as_table()?;
            }
            current
        }
        None => table,
    };

    tbl.get(leaf)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Table(t) => toml::to_string(t).unwrap_or_else(|_| format!("{t:?}")),
        other => other.to_string(),
    }
}

/// Walk confique's `Meta` tree to find the doc comment for a dotted key path.
fn lookup_doc(meta: &confique::meta::Meta, dotted_key: &str) -> Vec<String> {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    lookup_doc_recursive(meta, &segments)
}

fn lookup_doc_recursive(meta: &confique::meta::Meta, segments: &[&str]) -> Vec<String> {
    let Some((first, rest)) = segments.split_first() else {
        return vec![];
    };

    for field in meta.fields {
        if field.name != *first {
            continue;
        }
        if rest.is_empty() {
            return field.doc.iter().map(|s| s.trim().to_string()).collect();
        }
        if let confique::meta::FieldKind::Nested { meta: nested, .. } = &field.kind {
            return lookup_doc_recursive(nested, rest);
        }
    }
    vec![]
}
