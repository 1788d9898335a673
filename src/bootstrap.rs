//! Config bootstrap: make sure a config file exists in the state the
//! resolved policy asks for, before anything loads it.
//!
//! The outcome is keyed by a probe of the config path and the policy:
//!
//! | Path           | Policy             | Outcome                                   |
//! |----------------|--------------------|-------------------------------------------|
//! | directory      | any                | [`SysgreetError::PathIsDirectory`]        |
//! | missing        | keep               | [`Action::Kept`], nothing written         |
//! | missing        | overwrite / prompt | write defaults, [`Action::Created`]       |
//! | stat error     | any                | [`SysgreetError::Io`]                     |
//! | file           | keep               | [`Action::Kept`]                          |
//! | file           | overwrite          | backup + write, [`Action::Overwritten`]   |
//! | file           | prompt             | ask; keep / overwrite / cancel            |
//!
//! A cancel at the prompt returns [`SysgreetError::Canceled`] carrying an
//! [`Action::Skipped`] outcome so the caller can exit quietly.
//!
//! The only content ever written is the rendered default config. The
//! previous file is never read or merged, only backed up.
//!
//! The [`CancelToken`] is checked before the probe, before the backup and
//! before a fresh write. Backup and the write that follows it are one step:
//! a cancel between them would leave no config at the path.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};

use crate::atomic::{DEFAULT_MODE, write_atomic};
use crate::backup::create_backup;
use crate::config::render_default;
use crate::error::SysgreetError;
use crate::policy::{PolicyValue, resolve_policy};
use crate::prompt::{PromptDecision, ask_overwrite};

/// Terminal outcome of one bootstrap call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Skipped,
    Created,
    Overwritten,
    Kept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Skipped => "skipped",
            Action::Created => "created",
            Action::Overwritten => "overwritten",
            Action::Kept => "kept",
        })
    }
}

/// Everything observable about a bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub action: Action,
    pub config_path: PathBuf,
    /// Set only when `action` is [`Action::Overwritten`].
    pub backup_path: Option<PathBuf>,
    pub policy: PolicyValue,
    pub prompted: bool,
}

impl fmt::Display for BootstrapOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.config_path.display();
        match (self.action, &self.backup_path) {
            (Action::Created, _) => {
                write!(f, "sysgreet bootstrap: created default config at {path}")
            }
            (Action::Kept, _) => {
                write!(f, "sysgreet bootstrap: keeping existing config at {path}")
            }
            (Action::Overwritten, Some(backup)) => write!(
                f,
                "sysgreet bootstrap: overwrote config at {path} (backup: {})",
                backup.display()
            ),
            (Action::Overwritten, None) => {
                write!(f, "sysgreet bootstrap: overwrote config at {path}")
            }
            (Action::Skipped, _) => write!(f, "sysgreet bootstrap: skipped bootstrap for {path}"),
        }
    }
}

/// Raw policy inputs plus whether a prompt may be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// `--config-policy` value; empty when not passed.
    pub flag_policy: String,
    /// `SYSGREET_CONFIG_POLICY` value; empty when unset.
    pub env_policy: String,
    pub interactive: bool,
}

/// Cooperative cancellation shared between a bootstrap call and whoever may
/// want to stop it (a signal handler, a test).
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self, step: &'static str) -> Result<(), SysgreetError> {
        if self.is_cancelled() {
            tracing::debug!(step, "bootstrap interrupted");
            return Err(SysgreetError::Interrupted { step });
        }
        Ok(())
    }
}

/// Streams the bootstrap talks to: prompt answers come from `input`; the
/// prompt menu and the final status line go to `status` (stderr in the binary).
pub struct BootstrapIo<'a> {
    pub input: &'a mut dyn BufRead,
    pub status: &'a mut dyn Write,
}

/// What the probe found at the config path.
enum Probe {
    Missing,
    File,
}

/// Bring the config at `path` in line with the resolved policy.
pub fn bootstrap(
    cancel: &CancelToken,
    path: &Path,
    io: &mut BootstrapIo<'_>,
    options: &BootstrapOptions,
) -> Result<BootstrapOutcome, SysgreetError> {
    bootstrap_at(cancel, path, io, options, Utc::now())
}

/// [`bootstrap`] with an explicit clock, used for the backup stamp and
/// `created_at`.
pub fn bootstrap_at(
    cancel: &CancelToken,
    path: &Path,
    io: &mut BootstrapIo<'_>,
    options: &BootstrapOptions,
    now: DateTime<Utc>,
) -> Result<BootstrapOutcome, SysgreetError> {
    if path.as_os_str().is_empty() {
        return Err(SysgreetError::EmptyPath);
    }

    let resolution = resolve_policy(
        &options.flag_policy,
        &options.env_policy,
        options.interactive,
    )?;
    tracing::debug!(
        policy = %resolution.value,
        source = %resolution.source,
        interactive = resolution.interactive,
        "resolved bootstrap policy"
    );

    let mut outcome = BootstrapOutcome {
        action: Action::Skipped,
        config_path: path.to_path_buf(),
        backup_path: None,
        policy: resolution.value,
        prompted: false,
    };

    cancel.check("probing the config path")?;
    let probe = probe(path)?;

    match (probe, resolution.value) {
        (Probe::Missing, PolicyValue::Keep) => outcome.action = Action::Kept,
        (Probe::Missing, PolicyValue::Overwrite | PolicyValue::Prompt) => {
            let data = render_default(now)?;
            cancel.check("writing the config")?;
            write_atomic(path, data.as_bytes(), DEFAULT_MODE)?;
            outcome.action = Action::Created;
        }
        (Probe::File, PolicyValue::Keep) => outcome.action = Action::Kept,
        (Probe::File, PolicyValue::Overwrite) => {
            outcome.backup_path = Some(replace_with_defaults(cancel, path, now)?);
            outcome.action = Action::Overwritten;
        }
        (Probe::File, PolicyValue::Prompt) => {
            cancel.check("prompting")?;
            let decision = ask_overwrite(&mut *io.input, &mut *io.status, path)?;
            outcome.prompted = true;
            tracing::debug!(?decision, "prompt answered");

            match decision {
                PromptDecision::Keep => outcome.action = Action::Kept,
                PromptDecision::Overwrite => {
                    outcome.backup_path = Some(replace_with_defaults(cancel, path, now)?);
                    outcome.action = Action::Overwritten;
                }
                PromptDecision::Cancel => {
                    outcome.action = Action::Skipped;
                    return Err(SysgreetError::Canceled(Box::new(outcome)));
                }
            }
        }
    }

    report(&mut *io.status, &outcome);
    Ok(outcome)
}

fn probe(path: &Path) -> Result<Probe, SysgreetError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(SysgreetError::PathIsDirectory {
            path: path.to_path_buf(),
        }),
        Ok(_) => Ok(Probe::File),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Probe::Missing),
        Err(e) => Err(SysgreetError::io("stat", path, e)),
    }
}

/// Render first so a render failure never costs the existing file, then
/// back up and write. Returns the backup path.
fn replace_with_defaults(
    cancel: &CancelToken,
    path: &Path,
    now: DateTime<Utc>,
) -> Result<PathBuf, SysgreetError> {
    let data = render_default(now)?;
    cancel.check("backing up the config")?;
    let backup = create_backup(path, now)?;
    // No token check here: the backup rename has already emptied the path, so
    // stopping now would leave the user with no config at all.
    write_atomic(path, data.as_bytes(), DEFAULT_MODE)?;
    Ok(backup)
}

fn report(status: &mut dyn Write, outcome: &BootstrapOutcome) {
    tracing::info!(
        action = %outcome.action,
        path = %outcome.config_path.display(),
        backup = outcome.backup_path.as_ref().map(|p| p.display().to_string()),
        "config bootstrap finished"
    );
    if let Err(e) = writeln!(status, "{outcome}") {
        tracing::warn!(error = %e, "could not write bootstrap status line");
    }
}
