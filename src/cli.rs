//! Clap adapter for the `config` subcommand group.
//!
//! Compiled only with the `clap` Cargo feature (on by default). The only
//! bridge to the core is [`ConfigArgs::into_action()`], which turns parsed
//! arguments into a [`ConfigAction`](crate::ConfigAction). Everything after
//! that goes through the clap-free [`LoadOptions::handle()`](crate::LoadOptions::handle).

use clap::{Args, Subcommand};

use crate::types::ConfigAction;

/// Clap-derived args for `sysgreet config`.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show all resolved configuration key-value pairs.
    List,
    /// Print the default configuration file.
    Gen,
    /// Print the config file path used by bootstrap.
    Path,
    /// Show the resolved value and documentation for a config key.
    Get {
        /// Dotted key path (e.g. "ascii.font").
        key: String,
    },
}

impl ConfigArgs {
    /// Bare `config` and explicit `config list` both map to
    /// `ConfigAction::List`.
    pub fn into_action(self) -> ConfigAction {
        match self.action {
            None | Some(ConfigSubcommand::List) => ConfigAction::List,
            Some(ConfigSubcommand::Gen) => ConfigAction::Gen,
            Some(ConfigSubcommand::Path) => ConfigAction::Path,
            Some(ConfigSubcommand::Get { key }) => ConfigAction::Get { key },
        }
    }
}
