// domain-scan/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a working directory with the three input lists
fn create_workspace(domains: &[&str], words: &[&str], tlds: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_list(dir.path(), "domains.txt", domains);
    write_list(dir.path(), "wordlist.txt", words);
    write_list(dir.path(), "tld.txt", tlds);
    dir
}

fn write_list(dir: &Path, name: &str, lines: &[&str]) {
    fs::write(dir.join(name), lines.join("\n")).expect("Failed to write list file");
}

/// Command isolated from the user's config files and DS_* variables
fn domain_scan(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("domain-scan").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env_remove("DS_CONFIG")
        .env_remove("DS_DOMAINS")
        .env_remove("DS_WORDLIST")
        .env_remove("DS_TLDS")
        .env_remove("DS_THRESHOLD")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_shows_flags() {
    let mut cmd = Command::cargo_bin("domain-scan").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--domains"))
        .stdout(predicate::str::contains("--wordlist"))
        .stdout(predicate::str::contains("--tlds"))
        .stdout(predicate::str::contains("--threshold"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--comingsoon-out"));
}

#[test]
fn test_dry_run_lists_candidates_in_order() {
    let dir = create_workspace(&[], &["foo", "bar"], &["com", "net"]);

    domain_scan(&dir)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout("foo.com\nfoo.net\nbar.com\nbar.net\n");
}

#[test]
fn test_dry_run_puts_literal_domains_first() {
    let dir = create_workspace(&["example.org", "", "  spaced.io  "], &["foo"], &["com"]);

    domain_scan(&dir)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout("example.org\nspaced.io\nfoo.com\n");
}

#[test]
fn test_dry_run_does_not_write_outputs() {
    let dir = create_workspace(&["example.org"], &[], &[]);

    domain_scan(&dir).arg("--dry-run").assert().success();

    assert!(!dir.path().join("available.txt").exists());
    assert!(!dir.path().join("comingsoon.txt").exists());
}

#[test]
fn test_dry_run_with_custom_input_paths() {
    let dir = TempDir::new().unwrap();
    write_list(dir.path(), "names.lst", &["alpha"]);
    write_list(dir.path(), "zones.lst", &["dev", "app"]);
    write_list(dir.path(), "none.lst", &[]);

    domain_scan(&dir)
        .args([
            "--dry-run",
            "-f",
            "none.lst",
            "-w",
            "names.lst",
            "-t",
            "zones.lst",
        ])
        .assert()
        .success()
        .stdout("alpha.dev\nalpha.app\n");
}

#[test]
fn test_dry_run_json() {
    let dir = create_workspace(&["example.org"], &["foo"], &["com"]);

    domain_scan(&dir)
        .args(["--dry-run", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"example.org\""))
        .stdout(predicate::str::contains("\"foo.com\""));
}

#[test]
fn test_env_overrides_input_path() {
    let dir = create_workspace(&[], &["foo"], &["com"]);
    write_list(dir.path(), "other-tlds.txt", &["io"]);

    domain_scan(&dir)
        .env("DS_TLDS", "other-tlds.txt")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout("foo.io\n");
}

#[test]
fn test_config_file_sets_inputs() {
    let dir = create_workspace(&[], &["foo"], &["com"]);
    write_list(dir.path(), "words2.txt", &["baz"]);
    fs::write(
        dir.path().join("scan.toml"),
        "[inputs]\nwordlist = \"words2.txt\"\n",
    )
    .unwrap();

    domain_scan(&dir)
        .args(["--dry-run", "--config", "scan.toml"])
        .assert()
        .success()
        .stdout("baz.com\n");
}

#[test]
fn test_missing_input_file_fails() {
    let dir = create_workspace(&[], &["foo"], &["com"]);
    fs::remove_file(dir.path().join("tld.txt")).unwrap();

    domain_scan(&dir)
        .arg("--dry-run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("tld.txt"));
}

#[test]
fn test_invalid_threshold_fails() {
    let dir = create_workspace(&[], &[], &[]);

    domain_scan(&dir)
        .args(["--dry-run", "--threshold", "99999"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_invalid_timeout_fails() {
    let dir = create_workspace(&[], &[], &[]);

    domain_scan(&dir)
        .args(["--dry-run", "--http-timeout", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--http-timeout"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = create_workspace(&[], &[], &[]);
    fs::write(dir.path().join("bad.toml"), "[checks]\nthreshold_days = \"ten\"\n").unwrap();

    domain_scan(&dir)
        .args(["--dry-run", "--config", "bad.toml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = create_workspace(&[], &[], &[]);

    domain_scan(&dir)
        .args(["--dry-run", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
