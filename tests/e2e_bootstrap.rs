//! End-to-end bootstrap behavior of the `sysgreet` binary.

mod common;

use common::{Sandbox, backups_of};
use predicates::prelude::*;

#[test]
fn first_interactive_run_creates_config() {
    let sb = Sandbox::new();

    sb.cmd()
        .env("SYSGREET_ASSUME_TTY", "1")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "sysgreet bootstrap: created default config at",
        ))
        .stdout(predicate::str::is_empty().not());

    let written = sb.read();
    assert!(written.contains("version: v1"));
    assert!(written.contains("created_at:"));
    assert!(written.contains("font: slant"));
}

#[test]
fn ci_with_missing_config_requires_policy() {
    let sb = Sandbox::new();

    sb.cmd()
        .env("CI", "true")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("sysgreet: Config policy required"))
        .stderr(predicate::str::contains("SYSGREET_CONFIG_POLICY"));

    assert!(!sb.config.exists());
}

#[test]
fn ci_with_existing_config_skips_bootstrap() {
    let sb = Sandbox::new();
    sb.seed("ascii:\n  monochrome: true\n");

    sb.cmd()
        .env("CI", "true")
        .assert()
        .success()
        .stderr(predicate::str::contains("sysgreet bootstrap").not())
        .stdout(predicate::str::contains("\x1b[").not());

    assert_eq!(sb.read(), "ascii:\n  monochrome: true\n");
}

#[test]
fn keep_policy_from_env_reports_keep() {
    let sb = Sandbox::new();
    sb.seed("ascii:\n  font: banner\n");

    sb.cmd()
        .env("CI", "true")
        .env("SYSGREET_CONFIG_POLICY", "keep")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "sysgreet bootstrap: keeping existing config at",
        ));

    assert_eq!(sb.read(), "ascii:\n  font: banner\n");
    assert!(backups_of(&sb.siblings(), &sb.config).is_empty());
}

#[test]
fn keep_policy_with_missing_config_writes_nothing() {
    let sb = Sandbox::new();

    sb.cmd()
        .args(["--config-policy", "keep"])
        .env("CI", "1")
        .assert()
        .success();

    assert!(!sb.config.exists());
}

#[test]
fn overwrite_flag_backs_up_previous_file() {
    let sb = Sandbox::new();
    sb.seed("ascii:\n  font: mine\n");

    sb.cmd()
        .args(["--config-policy", "overwrite"])
        .env("CI", "1")
        .assert()
        .success()
        .stderr(predicate::str::contains("overwrote config at"))
        .stderr(predicate::str::contains("(backup: "));

    let backups = backups_of(&sb.siblings(), &sb.config);
    assert_eq!(backups.len(), 1, "{:?}", sb.siblings());
    let parent = sb.config.parent().unwrap();
    assert_eq!(
        std::fs::read_to_string(parent.join(&backups[0])).unwrap(),
        "ascii:\n  font: mine\n"
    );
    assert!(sb.read().contains("font: slant"));
}

#[test]
fn flag_beats_env_policy() {
    let sb = Sandbox::new();
    sb.seed("ascii:\n  font: mine\n");

    sb.cmd()
        .args(["--config-policy", "keep"])
        .env("SYSGREET_CONFIG_POLICY", "overwrite")
        .env("CI", "1")
        .assert()
        .success()
        .stderr(predicate::str::contains("keeping existing config"));

    assert_eq!(sb.read(), "ascii:\n  font: mine\n");
}

#[test]
fn prompt_cancel_exits_quietly() {
    let sb = Sandbox::new();
    sb.seed("ascii:\n  font: mine\n");

    sb.cmd()
        .env("SYSGREET_ASSUME_TTY", "1")
        .args(["--config-policy", "prompt"])
        .write_stdin("c\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("sysgreet:").not());

    assert_eq!(sb.read(), "ascii:\n  font: mine\n");
    assert!(backups_of(&sb.siblings(), &sb.config).is_empty());
}

#[test]
fn unterminated_prompt_answer_cancels() {
    let sb = Sandbox::new();
    sb.seed("ascii:\n  font: mine\n");

    sb.cmd()
        .env("SYSGREET_ASSUME_TTY", "1")
        .args(["--config-policy", "prompt"])
        .write_stdin("o")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(sb.read(), "ascii:\n  font: mine\n");
    assert!(backups_of(&sb.siblings(), &sb.config).is_empty());
}

#[test]
fn prompt_overwrite_after_bad_answer() {
    let sb = Sandbox::new();
    sb.seed("ascii:\n  font: mine\n");

    sb.cmd()
        .env("SYSGREET_ASSUME_TTY", "1")
        .env("SYSGREET_CONFIG_POLICY", "prompt")
        .write_stdin("maybe\nO\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Invalid selection"))
        .stderr(predicate::str::contains("overwrote config at"));

    assert_eq!(backups_of(&sb.siblings(), &sb.config).len(), 1);
}

#[test]
fn explicit_prompt_without_terminal_fails() {
    let sb = Sandbox::new();
    sb.seed("x: 1\n");

    sb.cmd()
        .args(["--config-policy", "prompt"])
        .env("CI", "1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires an interactive terminal"));
}

#[test]
fn invalid_policy_fails() {
    let sb = Sandbox::new();

    sb.cmd()
        .args(["--config-policy", "replace"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config policy 'replace'"));
}

#[test]
fn directory_at_config_path_fails() {
    let sb = Sandbox::new();
    std::fs::create_dir_all(&sb.config).unwrap();

    sb.cmd()
        .env("CI", "1")
        .env("SYSGREET_CONFIG_POLICY", "overwrite")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is a directory"));
}

#[test]
fn unknown_keys_warn_but_render() {
    let sb = Sandbox::new();
    sb.seed("ascii:\n  fnot: big\n");

    sb.cmd()
        .env("CI", "1")
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown config key"))
        .stdout(predicate::str::is_empty().not());
}
