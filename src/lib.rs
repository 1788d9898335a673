//! Login banner generator with a safe first-run config bootstrap.
//!
//! Sysgreet prints a short host summary at login. Before it reads its config
//! it makes sure the config file exists in the state the user asked for, and
//! every change it makes to that file is atomic and backed up.
//!
//! ```ignore
//! let options = LoadOptions::new().config_override(env.config_path.as_deref());
//! let path = options.write_path()?;
//! let outcome = bootstrap(&CancelToken::new(), &path, &mut io, &BootstrapOptions {
//!     flag_policy: "keep".into(),
//!     ..BootstrapOptions::default()
//! })?;
//! let (config, _) = options.load()?;
//! println!("{}", render_banner(&SystemFacts.facts(), &config));
//! ```
//!
//! # Bootstrap
//!
//! [`bootstrap()`] decides what happens to the config file. The decision
//! depends on two inputs:
//!
//! - **Policy**: `prompt`, `keep` or `overwrite`. The `--config-policy` flag
//!   beats `SYSGREET_CONFIG_POLICY`, which beats the default. With neither
//!   set, the default is `prompt` when a terminal is attached; otherwise the
//!   call fails with [`SysgreetError::PolicyRequired`] rather than guess.
//! - **Interactivity**: `SYSGREET_ASSUME_TTY` forces it on, `CI` forces it
//!   off, otherwise stdin is probed.
//!
//! A missing file is created from the defaults unless the policy is `keep`.
//! An existing file is kept, overwritten, or the user is asked. A directory at
//! the path is always an error. See the [`bootstrap`](mod@bootstrap) module docs for the
//! full table.
//!
//! # Persistence guarantees
//!
//! - Writes go to a hidden temp file in the target directory, are flushed and
//!   fsynced, get their permission bits, and are renamed over the target. A
//!   reader sees the old bytes or the new bytes, never a mix.
//! - Before an overwrite, the old file is renamed to
//!   `<name>.bak-YYYYMMDD-HHMMSS` and all older backups of the same file are
//!   pruned, so exactly one backup remains.
//! - The only content ever written is the rendered default config, stamped
//!   with `version` and `created_at`.
//!
//! # Layer precedence
//!
//! ```text
//! Compiled defaults     #[config(default = ...)]
//!        ↑ overridden by
//! Config file           first match: override, platform dir, home dotfile
//!        ↑ overridden by
//! Environment vars      SYSGREET__SECTION__KEY
//! ```
//!
//! Every layer is **sparse**: unset keys fall through to the layer below.
//! YAML (`.yaml`/`.yml`) and TOML (`.toml`) files are both accepted; the
//! extension picks the parser.
//!
//! # Environment variables
//!
//! | Env var | Meaning |
//! |---------|---------|
//! | `SYSGREET_CONFIG` | config path override (leading `~` expanded) |
//! | `SYSGREET_CONFIG_POLICY` | bootstrap policy |
//! | `SYSGREET_ASSUME_TTY` | treat the session as interactive |
//! | `CI` | treat the session as non-interactive |
//! | `SYSGREET_LOG` | `tracing` filter for the binary (default `warn`) |
//! | `SYSGREET__ASCII__COLOR` | override `ascii.color`, and so on |
//!
//! Override values are parsed heuristically: `true`/`yes`/`on` and
//! `false`/`no`/`off` are booleans, then integer, then float, then string.
//!
//! # Unknown keys
//!
//! The binary loads leniently and logs unknown keys as warnings so a typo
//! never blocks a login. [`LoadOptions::strict`] turns them into
//! [`SysgreetError::UnknownKeys`] with the file path and line.

pub mod error;
pub mod types;

mod atomic;
mod backup;
mod banner;
pub mod bootstrap;
#[cfg(feature = "clap")]
mod cli;
mod config;
mod env;
mod file;
mod loader;
pub(crate) mod merge;
mod ops;
mod policy;
mod prompt;
mod resolve;
mod validate;

#[cfg(test)]
mod fixtures;

pub use atomic::{DEFAULT_MODE, write_atomic};
pub use backup::{backup_path_for, create_backup, prune_backups};
pub use banner::{DemoFacts, FactsProvider, HostFacts, SystemFacts, render_banner};
pub use bootstrap::{
    Action, BootstrapIo, BootstrapOptions, BootstrapOutcome, CancelToken, bootstrap,
};
#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSubcommand};
pub use config::{
    AsciiConfig, DisplayConfig, LayoutConfig, NetworkConfig, SCHEMA_VERSION, SysgreetConfig,
    render_default,
};
pub use env::{BootstrapEnv, resolve_interactive};
pub use error::SysgreetError;
pub use file::{ConfigFormat, LoadedFile, resolve_write_path};
pub use loader::{LoadOptions, load_config};
pub use ops::ConfigResult;
pub use policy::{PolicyResolution, PolicySource, PolicyValue, resolve_policy};
pub use prompt::{PromptDecision, ask_overwrite};
pub use resolve::{ResolveInput, resolve};
pub use types::ConfigAction;
