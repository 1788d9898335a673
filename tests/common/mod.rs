//! Shared end-to-end helpers for `sysgreet` binary tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const TIMEOUT: Duration = Duration::from_secs(10);

/// A scratch home directory with the config path pointed inside it.
pub struct Sandbox {
    pub home: TempDir,
    pub config: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let home = tempfile::tempdir().expect("create temp home");
        let config = home.path().join("etc").join("config.yaml");
        Self { home, config }
    }

    /// Write `content` at the config path, creating parents.
    pub fn seed(&self, content: &str) {
        std::fs::create_dir_all(self.config.parent().expect("config has parent"))
            .expect("create config dir");
        std::fs::write(&self.config, content).expect("seed config");
    }

    pub fn read(&self) -> String {
        std::fs::read_to_string(&self.config).expect("read config")
    }

    /// File names next to the config, sorted.
    pub fn siblings(&self) -> Vec<String> {
        let dir = self.config.parent().expect("config has parent");
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("list config dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// The binary with a clean environment: only HOME, PATH and
    /// SYSGREET_CONFIG are set.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd: assert_cmd::Command = cargo_bin_cmd!("sysgreet");
        cmd.timeout(TIMEOUT);
        cmd.env_clear();
        cmd.env("HOME", self.home.path());
        cmd.env("XDG_CONFIG_HOME", self.home.path().join(".config"));
        if let Some(path) = std::env::var_os("PATH") {
            cmd.env("PATH", path);
        }
        cmd.env("SYSGREET_CONFIG", &self.config);
        cmd
    }
}

pub fn backups_of(names: &[String], path: &Path) -> Vec<String> {
    let base = path
        .file_name()
        .expect("config has file name")
        .to_string_lossy()
        .into_owned();
    names
        .iter()
        .filter(|n| n.starts_with(&format!("{base}.bak-")))
        .cloned()
        .collect()
}
