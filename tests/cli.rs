//! Binary-level tests that need no privileges and change no interface

use assert_cmd::Command;
use predicates::prelude::*;

fn antimac() -> Command {
    Command::cargo_bin("antimac").unwrap()
}

#[test]
fn test_version_flags() {
    for flag in ["-v", "--version"] {
        antimac()
            .arg(flag)
            .assert()
            .success()
            .stdout("Version: 0.0.1\n");
    }
}

#[test]
fn test_version_ignores_other_arguments() {
    antimac()
        .args(["-c", "en0", "not-a-mac", "--bogus", "-v"])
        .assert()
        .success()
        .stdout("Version: 0.0.1\n");
}

#[test]
fn test_help_prints_usage() {
    antimac()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage:\n  antimac <device>\n"));
}

#[test]
fn test_no_arguments_is_usage_error() {
    antimac()
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_missing_mac_is_usage_error() {
    antimac()
        .args(["-c", "en0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("antimac --config <device> <new-mac-address>"));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    antimac()
        .arg("-x")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_mac_is_rejected() {
    antimac()
        .args(["-c", "antimac-test0", "aa:bb:cc:dd:ee:f"])
        .env("ANTIMAC_LOG", "off")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Mac address is not valid."));
}

#[test]
fn test_show_unknown_device() {
    antimac()
        .args(["-s", "antimac-test0"])
        .env("ANTIMAC_LOG", "off")
        .assert()
        .code(1)
        .stdout("Could not get MAC address for antimac-test0\n");
}
