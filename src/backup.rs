//! Timestamped backup of a config file before a destructive overwrite.
//!
//! The previous file is *renamed* (not copied) to
//! `<name>.bak-<YYYYMMDD-HHMMSS>` next to the original, which both preserves
//! it and clears the target slot. Afterwards every other `<name>.bak-*`
//! sibling is pruned so exactly one backup remains.
//!
//! Two backups within the same UTC second share a name; the second rename
//! replaces the first. Known gap, not handled.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::SysgreetError;

const BACKUP_MARKER: &str = ".bak-";

/// Compute the backup path for `path` at time `now`.
pub fn backup_path_for(path: &Path, now: DateTime<Utc>) -> Result<PathBuf, SysgreetError> {
    let base = file_name(path)?;
    let stamp = now.format("%Y%m%d-%H%M%S");
    Ok(path.with_file_name(format!("{base}{BACKUP_MARKER}{stamp}")))
}

/// Rename `path` to its timestamped backup and prune older backups.
///
/// Fails if `path` no longer exists, which surfaces a file that vanished
/// between probe and backup instead of silently writing over nothing.
pub fn create_backup(path: &Path, now: DateTime<Utc>) -> Result<PathBuf, SysgreetError> {
    let backup = backup_path_for(path, now)?;

    std::fs::rename(path, &backup).map_err(|e| SysgreetError::io("back up", path, e))?;
    tracing::debug!(from = %path.display(), to = %backup.display(), "config backed up");

    prune_backups(path, &backup)?;
    Ok(backup)
}

/// Remove every `<name>.bak-*` sibling of `path` except `keep`.
///
/// Entries that disappear while pruning are ignored; other removal
/// failures propagate.
pub fn prune_backups(path: &Path, keep: &Path) -> Result<(), SysgreetError> {
    let dir = parent_dir(path);
    let prefix = format!("{}{BACKUP_MARKER}", file_name(path)?);
    let keep_name = keep.file_name();

    let entries = std::fs::read_dir(dir).map_err(|e| SysgreetError::io("list backups in", dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| SysgreetError::io("list backups in", dir, e))?;
        let name = entry.file_name();
        if Some(name.as_os_str()) == keep_name {
            continue;
        }
        let Some(name_str) = name.to_str() else {
            continue;
        };
        if !name_str.starts_with(&prefix) {
            continue;
        }

        remove_stale(&entry.path())?;
    }
    Ok(())
}

/// Remove one stale backup. Already gone counts as removed.
fn remove_stale(stale: &Path) -> Result<(), SysgreetError> {
    match std::fs::remove_file(stale) {
        Ok(()) => tracing::debug!(path = %stale.display(), "pruned old backup"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %stale.display(), "old backup vanished during prune");
        }
        Err(e) => return Err(SysgreetError::io("remove old backup", stale, e)),
    }
    Ok(())
}

fn file_name(path: &Path) -> Result<&str, SysgreetError> {
    path.file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| SysgreetError::InvalidValue {
            key: "config path".into(),
            reason: format!("{} has no usable file name", path.display()),
        })
}

/// Parent directory, treating a bare file name as the current directory.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
