//! Environment inputs: config overrides and bootstrap controls.
//!
//! Two unrelated families of variables live here:
//!
//! - `SYSGREET__SECTION__KEY` overrides, turned into a sparse `toml::Table`
//!   that is deep-merged over the config file.
//! - Bootstrap controls (`SYSGREET_CONFIG`, `SYSGREET_CONFIG_POLICY`,
//!   `SYSGREET_ASSUME_TTY`, `CI`), gathered into [`BootstrapEnv`].
//!
//! Both take an iterator of pairs so tests can pass synthetic data instead of
//! `std::env::vars()`.

use std::io::IsTerminal;

use toml::{Table, Value};

/// Prefix for `SYSGREET__*` config overrides.
pub const ENV_PREFIX: &str = "SYSGREET";

pub const CONFIG_PATH_VAR: &str = "SYSGREET_CONFIG";
pub const POLICY_VAR: &str = "SYSGREET_CONFIG_POLICY";
pub const ASSUME_TTY_VAR: &str = "SYSGREET_ASSUME_TTY";
pub const CI_VAR: &str = "CI";

/// Build a `toml::Table` from variables matching `{prefix}__*`.
///
/// `__` separates nesting levels, a single `_` stays part of the key, and
/// segments are lowercased. Values are typed heuristically, see
/// [`parse_env_value`].
pub fn env_to_table(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Table {
    let needle = format!("{prefix}__");
    let mut table = Table::new();

    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(&needle) else {
            continue;
        };
        let segments: Vec<String> = rest.split("__").map(str::to_lowercase).collect();
        if segments.iter().any(String::is_empty) {
            continue;
        }
        insert_path(&mut table, &segments, parse_env_value(&value));
    }

    table
}

fn insert_path(table: &mut Table, segments: &[String], value: Value) {
    let (leaf, parents) = match segments.split_last() {
        Some(split) => split,
        None => return,
    };

    let mut current = table;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Table(Table::new()));
        if !slot.is_table() {
            *slot = Value::Table(Table::new());
        }
        let Value::Table(next) = slot else {
            return;
        };
        current = next;
    }
    current.insert(leaf.clone(), value);
}

/// Type an env value: bool (`true/false/yes/no/on/off`), then integer, then
/// float (only with a `.`), then string.
fn parse_env_value(raw: &str) -> Value {
    let s = raw.trim();
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => return Value::Boolean(true),
        "false" | "no" | "off" => return Value::Boolean(false),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if s.contains('.')
        && let Ok(f) = s.parse::<f64>()
    {
        return Value::Float(f);
    }
    Value::String(raw.to_string())
}

/// Bootstrap-related environment, captured once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapEnv {
    /// Explicit config path override (`SYSGREET_CONFIG`).
    pub config_path: Option<String>,
    /// Raw policy value; empty when unset.
    pub policy: String,
    /// `SYSGREET_ASSUME_TTY` is set.
    pub assume_tty: bool,
    /// `CI` is set.
    pub ci: bool,
}

impl BootstrapEnv {
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut env = BootstrapEnv::default();
        for (key, value) in vars {
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                CONFIG_PATH_VAR => env.config_path = Some(value),
                POLICY_VAR => env.policy = value,
                ASSUME_TTY_VAR => env.assume_tty = true,
                CI_VAR => env.ci = true,
                _ => {}
            }
        }
        env
    }

    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Whether prompts may be shown, probing the real stdin when neither
    /// override decides it.
    pub fn interactive(&self) -> bool {
        resolve_interactive(self.ci, self.assume_tty, || std::io::stdin().is_terminal())
    }
}

/// Assume-TTY forces interactive, otherwise CI forces non-interactive,
/// otherwise the terminal probe decides. The probe only runs when needed.
pub fn resolve_interactive(ci: bool, assume_tty: bool, probe: impl FnOnce() -> bool) -> bool {
    if assume_tty {
        return true;
    }
    if ci {
        return false;
    }
    probe()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::vars;

    #[test]
    fn nested_override() {
        let table = env_to_table("SYSGREET", vars(&[("SYSGREET__ASCII__FONT", "banner")]));
        assert_eq!(table["ascii"]["font"].as_str().unwrap(), "banner");
    }

    #[test]
    fn single_underscore_preserved() {
        let table = env_to_table(
            "SYSGREET",
            vars(&[("SYSGREET__NETWORK__MAX_INTERFACES", "5")]),
        );
        assert_eq!(table["network"]["max_interfaces"].as_integer().unwrap(), 5);
    }

    #[test]
    fn word_booleans() {
        let table = env_to_table(
            "SYSGREET",
            vars(&[
                ("SYSGREET__DISPLAY__UPTIME", "no"),
                ("SYSGREET__DISPLAY__DISK", "ON"),
                ("SYSGREET__ASCII__MONOCHROME", "true"),
            ]),
        );
        assert!(!table["display"]["uptime"].as_bool().unwrap());
        assert!(table["display"]["disk"].as_bool().unwrap());
        assert!(table["ascii"]["monochrome"].as_bool().unwrap());
    }

    #[test]
    fn float_needs_dot_and_strings_fall_through() {
        let table = env_to_table(
            "SYSGREET",
            vars(&[("SYSGREET__A", "1.5"), ("SYSGREET__B", "inf"), ("SYSGREET__C", "-2")]),
        );
        assert_eq!(table["a"].as_float().unwrap(), 1.5);
        assert_eq!(table["b"].as_str().unwrap(), "inf");
        assert_eq!(table["c"].as_integer().unwrap(), -2);
    }

    #[test]
    fn control_vars_are_not_overrides() {
        let table = env_to_table(
            "SYSGREET",
            vars(&[
                ("SYSGREET_CONFIG", "/tmp/x.yaml"),
                ("SYSGREET_CONFIG_POLICY", "keep"),
                ("SYSGREET__", "x"),
                ("SYSGREET____FONT", "x"),
            ]),
        );
        assert!(table.is_empty());
    }

    #[test]
    fn bootstrap_env_reads_controls() {
        let env = BootstrapEnv::from_vars(vars(&[
            ("SYSGREET_CONFIG", "/tmp/c.yaml"),
            ("SYSGREET_CONFIG_POLICY", "keep"),
            ("SYSGREET_ASSUME_TTY", "1"),
            ("CI", "true"),
            ("HOME", "/root"),
        ]));
        assert_eq!(env.config_path.as_deref(), Some("/tmp/c.yaml"));
        assert_eq!(env.policy, "keep");
        assert!(env.assume_tty);
        assert!(env.ci);
    }

    #[test]
    fn empty_vars_count_as_unset() {
        let env = BootstrapEnv::from_vars(vars(&[("CI", ""), ("SYSGREET_CONFIG", "")]));
        assert_eq!(env, BootstrapEnv::default());
    }

    #[test]
    fn interactivity_precedence() {
        assert!(resolve_interactive(true, true, || false));
        assert!(!resolve_interactive(true, false, || true));
        assert!(resolve_interactive(false, false, || true));
        assert!(!resolve_interactive(false, false, || false));
    }

    #[test]
    fn probe_skipped_when_overridden() {
        let mut probed = false;
        resolve_interactive(true, false, || {
            probed = true;
            true
        });
        assert!(!probed);
    }
}
