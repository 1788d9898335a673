//! Config file location, discovery, and parsing.
//!
//! # Write path
//!
//! Bootstrap writes to exactly one path: `SYSGREET_CONFIG` when set (with a
//! leading `~` expanded), otherwise `config.yaml` in the platform config
//! directory (`~/.config/sysgreet/` on Linux).
//!
//! # Discovery
//!
//! Loading checks, in order, and uses the **first** regular file found:
//!
//! 1. the `SYSGREET_CONFIG` override
//! 2. `config.yaml`, `config.yml`, `config.toml` in the platform directory
//! 3. `~/.sysgreet.yaml`, `~/.sysgreet.yml`, `~/.sysgreet.toml`
//!
//! Missing files and directories are skipped. Other I/O errors propagate.
//!
//! # Formats
//!
//! The extension picks the parser: `.yaml`/`.yml` for YAML, `.toml` for
//! TOML. Either way the result is a `toml::Table`, the common currency of the
//! merge pipeline. YAML nulls have no TOML counterpart, so a null entry
//! (`display:` with every child commented out) is dropped and the key falls
//! through to its default.

use std::path::{Path, PathBuf};

use toml::Table;

use crate::error::SysgreetError;

pub const APP_NAME: &str = "sysgreet";
const EXTENSIONS: [&str; 3] = ["yaml", "yml", "toml"];

/// Serialization format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, SysgreetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(SysgreetError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Parse `content` into a sparse table. Blank files are an empty table.
    pub fn parse(self, path: &Path, content: &str) -> Result<Table, SysgreetError> {
        if content.trim().is_empty() {
            return Ok(Table::new());
        }
        match self {
            ConfigFormat::Yaml => {
                let invalid = |source| SysgreetError::ParseYaml {
                    path: path.to_path_buf(),
                    source,
                };
                match strip_nulls(serde_yaml::from_str(content).map_err(invalid)?) {
                    Some(value) => serde_yaml::from_value(value).map_err(invalid),
                    None => Ok(Table::new()),
                }
            }
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|source| SysgreetError::ParseToml {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
}

/// Drop null mapping entries and sequence items, recursively. `None` when
/// the value itself is null.
fn strip_nulls(value: serde_yaml::Value) -> Option<serde_yaml::Value> {
    use serde_yaml::Value;

    match value {
        Value::Null => None,
        Value::Mapping(map) => Some(Value::Mapping(
            map.into_iter()
                .filter_map(|(k, v)| strip_nulls(v).map(|v| (k, v)))
                .collect(),
        )),
        Value::Sequence(items) => Some(Value::Sequence(
            items.into_iter().filter_map(strip_nulls).collect(),
        )),
        Value::Tagged(tagged) => strip_nulls(tagged.value),
        other => Some(other),
    }
}

/// The platform config directory for sysgreet.
pub fn platform_config_dir() -> Option<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", APP_NAME)?;
    Some(proj.config_dir().to_path_buf())
}

/// Expand a leading `~` to the home directory. Other paths pass through.
pub fn expand_home(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(raw),
    };
    match directories::UserDirs::new() {
        Some(user) => user
            .home_dir()
            .join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(raw),
    }
}

/// The single path bootstrap writes to.
pub fn resolve_write_path(override_path: Option<&str>) -> Result<PathBuf, SysgreetError> {
    if let Some(raw) = override_path
        && !raw.is_empty()
    {
        return Ok(expand_home(raw));
    }
    platform_config_dir()
        .map(|dir| dir.join("config.yaml"))
        .ok_or(SysgreetError::NoConfigPath)
}

/// Candidate files for loading, highest priority first.
pub fn candidate_paths(override_path: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(raw) = override_path
        && !raw.is_empty()
    {
        paths.push(expand_home(raw));
    }
    if let Some(dir) = platform_config_dir() {
        paths.extend(EXTENSIONS.iter().map(|ext| dir.join(format!("config.{ext}"))));
    }
    if let Some(user) = directories::UserDirs::new() {
        let home = user.home_dir();
        paths.extend(
            EXTENSIONS
                .iter()
                .map(|ext| home.join(format!(".{APP_NAME}.{ext}"))),
        );
    }
    paths
}

/// A config file read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Read the first candidate that exists as a regular file.
pub fn load_first_match(candidates: &[PathBuf]) -> Result<Option<LoadedFile>, SysgreetError> {
    for path in candidates {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => {
                tracing::debug!(path = %path.display(), "skipping directory config candidate");
                continue;
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(SysgreetError::io("read", path, e)),
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| SysgreetError::io("read", path, e))?;
        return Ok(Some(LoadedFile {
            path: path.clone(),
            content,
        }));
    }
    Ok(None)
}
