use assert_cmd::Command;
use predicates::prelude::*;

fn movelens() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("movelens").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    movelens()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("networks"));
}

#[test]
fn test_analyze_help_lists_tuning_flags() {
    movelens()
        .args(["analyze", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-depth"))
        .stdout(predicate::str::contains("--max-obj-depth"))
        .stdout(predicate::str::contains("--threshold"))
        .stdout(predicate::str::contains("--sample-size"))
        .stdout(predicate::str::contains("--no-sampling"))
        .stdout(predicate::str::contains("--critical-type"))
        .stdout(predicate::str::contains("--pretty"));
}

#[test]
fn test_version_flag() {
    movelens()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("movelens"));
}

#[test]
fn test_analyze_requires_a_package_argument() {
    movelens().arg("analyze").assert().failure();
}

#[test]
fn test_analyze_rejects_unknown_network() {
    movelens()
        .args(["analyze", "0x2", "--network", "devnet9000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown network"));
}

#[test]
fn test_unknown_subcommand_fails() {
    movelens().arg("frobnicate").assert().failure();
}
