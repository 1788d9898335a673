use std::path::PathBuf;

use chrono::Utc;

use crate::config::SysgreetConfig;
use crate::env::ENV_PREFIX;
use crate::error::SysgreetError;
use crate::file;
use crate::ops::{self, ConfigResult};
use crate::resolve::{self, ResolveInput};
use crate::types::ConfigAction;

/// Builder for loading the layered sysgreet configuration.
///
/// Controls two axes:
///
/// - **Discovery**: [`config_override()`](Self::config_override) and
///   [`search_paths()`](Self::search_paths) decide which file is read.
///   The first existing file wins.
/// - **Overrides**: `SYSGREET__*` environment variables, taken from the
///   process or from [`env_vars()`](Self::env_vars), unless
///   [`no_env()`](Self::no_env) is set.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    config_override: Option<String>,
    search_paths: Option<Vec<PathBuf>>,
    env_vars: Option<Vec<(String, String)>>,
    env_enabled: bool,
    strict: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_override: None,
            search_paths: None,
            env_vars: None,
            env_enabled: true,
            strict: false,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit config path (the `SYSGREET_CONFIG` value). Checked first for
    /// loading and used as the bootstrap write path. Empty strings are ignored.
    pub fn config_override(mut self, path: Option<&str>) -> Self {
        self.config_override = path.filter(|p| !p.is_empty()).map(str::to_string);
        self
    }

    /// Replace the platform and home candidates. The override, if any, is
    /// still checked first.
    pub fn search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Use these pairs instead of `std::env::vars()` for overrides.
    pub fn env_vars(mut self, vars: Vec<(String, String)>) -> Self {
        self.env_vars = Some(vars);
        self
    }

    /// Disable environment variable overrides entirely.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Enable or disable strict mode (default: `false`).
    /// In strict mode, unknown keys in config files produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn effective_candidates(&self) -> Vec<PathBuf> {
        match &self.search_paths {
            Some(paths) => self
                .config_override
                .as_deref()
                .map(file::expand_home)
                .into_iter()
                .chain(paths.iter().cloned())
                .collect(),
            None => file::candidate_paths(self.config_override.as_deref()),
        }
    }

    fn build_input(&self) -> Result<ResolveInput, SysgreetError> {
        let file = file::load_first_match(&self.effective_candidates())?;
        match &file {
            Some(found) => tracing::debug!(path = %found.path.display(), "loading config file"),
            None => tracing::debug!("no config file found, using defaults"),
        }

        let (env_vars, env_prefix) = if self.env_enabled {
            let vars = match &self.env_vars {
                Some(vars) => vars.clone(),
                None => std::env::vars().collect(),
            };
            (vars, Some(ENV_PREFIX.to_string()))
        } else {
            (Vec::new(), None)
        };

        Ok(ResolveInput {
            file,
            env_vars,
            env_prefix,
            strict: self.strict,
        })
    }

    /// Load and resolve the configuration through all layers. Also returns
    /// the file that was read, if any.
    pub fn load(&self) -> Result<(SysgreetConfig, Option<PathBuf>), SysgreetError> {
        let input = self.build_input()?;
        let path = input.file.as_ref().map(|f| f.path.clone());
        Ok((resolve::resolve(input)?, path))
    }

    /// The single path bootstrap writes to.
    pub fn write_path(&self) -> Result<PathBuf, SysgreetError> {
        file::resolve_write_path(self.config_override.as_deref())
    }

    /// Handle a `ConfigAction` (gen / path / get / list).
    pub fn handle(&self, action: &ConfigAction) -> Result<ConfigResult, SysgreetError> {
        match action {
            ConfigAction::Gen => ops::generate_template(Utc::now()),
            ConfigAction::Path => Ok(ConfigResult::Path(self.write_path()?)),
            ConfigAction::Get { key } => {
                let (config, _) = self.load()?;
                ops::get_value(&config, key)
            }
            ConfigAction::List => {
                let (config, _) = self.load()?;
                ops::list_values(&config)
            }
        }
    }
}

/// Load the config with `options`. See [`LoadOptions::load`].
pub fn load_config(options: LoadOptions) -> Result<(SysgreetConfig, Option<PathBuf>), SysgreetError> {
    options.load()
}
