//! Crash-safe file replacement.
//!
//! Bytes go to a uniquely named temp file in the target's own directory
//! (rename is only atomic within one filesystem), are synced to storage, and
//! the temp file is then renamed over the target. Readers observe either the
//! old complete file or the new complete file.
//!
//! Where the platform refuses to rename over an existing file, the target is
//! removed first and the rename retried. That fallback leaves a short window
//! with no file at the target path; callers only reach it after a backup has
//! been taken or when the target was absent to begin with.

use std::io::Write;
use std::path::Path;

use tempfile::TempPath;

use crate::backup::parent_dir;
use crate::error::SysgreetError;

/// Default permission bits for files written by bootstrap.
pub const DEFAULT_MODE: u32 = 0o644;

/// Atomically replace `path` with `data`, creating parent directories.
///
/// `mode` is applied on Unix; other platforms ignore it. On any failure the
/// temp file is removed and the original target is left untouched.
pub fn write_atomic(path: &Path, data: &[u8], mode: u32) -> Result<(), SysgreetError> {
    write_atomic_with(path, data, mode, |_| Ok(()))
}

/// Like [`write_atomic`], with a hook that runs on the finished temp file
/// right before the rename. Tests use it to simulate an interruption.
pub(crate) fn write_atomic_with<F>(
    path: &Path,
    data: &[u8],
    mode: u32,
    before_replace: F,
) -> Result<(), SysgreetError>
where
    F: FnOnce(&Path) -> std::io::Result<()>,
{
    if path.as_os_str().is_empty() {
        return Err(SysgreetError::EmptyPath);
    }

    let dir = parent_dir(path);
    std::fs::create_dir_all(dir).map_err(|e| SysgreetError::io("create directory", dir, e))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".sysgreet-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| SysgreetError::io("create temp file in", dir, e))?;

    temp.write_all(data)
        .map_err(|e| SysgreetError::io("write temp file", temp.path(), e))?;
    temp.flush()
        .map_err(|e| SysgreetError::io("flush temp file", temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| SysgreetError::io("sync temp file", temp.path(), e))?;

    // Closes the handle; the path is still deleted on drop until persisted.
    let temp_path = temp.into_temp_path();
    set_mode(&temp_path, mode)?;

    before_replace(&temp_path).map_err(|e| SysgreetError::io("replace", path, e))?;

    replace(temp_path, path)
}

#[cfg(unix)]
fn set_mode(temp_path: &TempPath, mode: u32) -> Result<(), SysgreetError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(temp_path, std::fs::Permissions::from_mode(mode))
        .map_err(|e| SysgreetError::io("chmod temp file", temp_path.to_path_buf(), e))
}

#[cfg(not(unix))]
fn set_mode(_temp_path: &TempPath, _mode: u32) -> Result<(), SysgreetError> {
    Ok(())
}

fn replace(temp_path: TempPath, target: &Path) -> Result<(), SysgreetError> {
    let err = match temp_path.persist(target) {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };

    if !target.exists() {
        return Err(SysgreetError::io("replace", target, err.error));
    }

    // Narrower guarantee from here on: the target is briefly absent.
    tracing::debug!(
        path = %target.display(),
        error = %err.error,
        "direct rename refused; removing target and retrying"
    );
    match std::fs::remove_file(target) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(SysgreetError::io("remove existing", target, e)),
    }
    err.path
        .persist(target)
        .map_err(|e| SysgreetError::io("replace", target, e.error))
}
