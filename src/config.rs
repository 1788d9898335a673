//! The typed sysgreet configuration and its rendered default file.
//!
//! [`SysgreetConfig`] is the single source of truth: `#[config(default)]`
//! values are the compiled defaults, `///` comments become the docs shown by
//! `config get`, and nested structs map to YAML mappings / TOML tables.

use chrono::{DateTime, SecondsFormat, Utc};
use confique::Config;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SysgreetError;

/// Schema version stamped into every bootstrapped config file.
pub const SCHEMA_VERSION: &str = "v1";

/// Root configuration.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SysgreetConfig {
    /// Which banner lines to show.
    #[config(nested)]
    pub display: DisplayConfig,

    /// Hostname header rendering.
    #[config(nested)]
    pub ascii: AsciiConfig,

    /// Banner layout.
    #[config(nested)]
    pub layout: LayoutConfig,

    /// Network address display.
    #[config(nested)]
    pub network: NetworkConfig,

    /// Config schema version.
    #[config(default = "v1")]
    pub version: String,

    /// When this file was generated (RFC 3339, UTC).
    #[config(default = "")]
    pub created_at: String,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Show the hostname header.
    #[config(default = true)]
    pub hostname: bool,
    /// Show the operating system.
    #[config(default = true)]
    pub os: bool,
    /// Show local IP addresses.
    #[config(default = true)]
    pub ip_addresses: bool,
    /// Show the remote (SSH client) address.
    #[config(default = true)]
    pub remote_ip: bool,
    /// Show system uptime.
    #[config(default = true)]
    pub uptime: bool,
    /// Show the current user.
    #[config(default = true)]
    pub user: bool,
    /// Show memory usage.
    #[config(default = true)]
    pub memory: bool,
    /// Show disk usage.
    #[config(default = true)]
    pub disk: bool,
    /// Show load average.
    #[config(default = true)]
    pub load: bool,
    /// Show the local date and time.
    #[config(default = true)]
    pub datetime: bool,
    /// Show the previous login.
    #[config(default = true)]
    pub last_login: bool,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AsciiConfig {
    /// FIGlet font name. Kept for file compatibility; the header is plain text.
    #[config(default = "slant")]
    pub font: String,

    /// Header color: a named ANSI color or "random".
    #[config(default = "random")]
    pub color: String,

    /// Disable all ANSI colors.
    #[config(default = false)]
    pub monochrome: bool,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Drop blank separator lines between sections.
    #[config(default = false)]
    pub compact: bool,

    /// Section order. Accepts a list or a comma-separated string.
    #[config(
        default = ["header", "system", "network", "resources"],
        deserialize_with = string_or_list
    )]
    pub sections: Vec<String>,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    /// Prefix each address with its interface name.
    #[config(default = true)]
    pub show_interface_names: bool,

    /// Maximum number of interfaces to list.
    #[config(default = 3)]
    pub max_interfaces: u32,
}

impl SysgreetConfig {
    /// The compiled defaults.
    pub fn defaults() -> Result<Self, SysgreetError> {
        Ok(Self::builder().load()?)
    }
}

/// Render the default config as YAML, stamped with the schema version and
/// `now` as an RFC 3339 UTC timestamp.
pub fn render_default(now: DateTime<Utc>) -> Result<String, SysgreetError> {
    let mut config = SysgreetConfig::defaults()?;
    config.version = SCHEMA_VERSION.to_string();
    config.created_at = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    serde_yaml::to_string(&config).map_err(SysgreetError::Render)
}

/// Accept `["a", "b"]` or `"a, b"`; blank entries are dropped.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Sections {
        One(String),
        Many(Vec<String>),
    }

    let raw = match Sections::deserialize(deserializer)? {
        Sections::One(s) => s.split(',').map(str::to_string).collect(),
        Sections::Many(v) => v,
    };
    Ok(raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::at;

    #[test]
    fn defaults_match_shipped_profile() {
        let c = SysgreetConfig::defaults().unwrap();
        assert!(c.display.hostname && c.display.last_login && c.display.datetime);
        assert_eq!(c.ascii.font, "slant");
        assert_eq!(c.ascii.color, "random");
        assert!(!c.ascii.monochrome);
        assert!(!c.layout.compact);
        assert_eq!(
            c.layout.sections,
            vec!["header", "system", "network", "resources"]
        );
        assert!(c.network.show_interface_names);
        assert_eq!(c.network.max_interfaces, 3);
        assert_eq!(c.version, SCHEMA_VERSION);
        assert_eq!(c.created_at, "");
    }

    #[test]
    fn rendered_default_is_stamped_yaml() {
        let yaml = render_default(at(2024, 5, 6, 7, 8, 9)).unwrap();
        let parsed: SysgreetConfig = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed.version, "v1");
        assert_eq!(parsed.created_at, "2024-05-06T07:08:09Z");
        assert!(DateTime::parse_from_rfc3339(&parsed.created_at).is_ok());
        assert_eq!(parsed.ascii.font, "slant");
    }

    #[test]
    fn rendered_default_has_all_sections() {
        let yaml = render_default(at(2024, 1, 1, 0, 0, 0)).unwrap();
        for key in ["display:", "ascii:", "layout:", "network:", "version:", "created_at:"] {
            assert!(yaml.contains(key), "missing {key} in:\n{yaml}");
        }
    }

    #[test]
    fn sections_accept_comma_string() {
        let layout: LayoutConfig = SysgreetConfig::builder()
            .preloaded(
                serde_yaml::from_str("layout:\n  sections: \"header, , network\"\n").unwrap(),
            )
            .load()
            .unwrap()
            .layout;
        assert_eq!(layout.sections, vec!["header", "network"]);
    }
}
