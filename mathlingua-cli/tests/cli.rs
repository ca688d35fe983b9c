use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const NATURALS: &str = "[\\natural]\nDefines: n\nwritten: \"\\mathbb{N}\"\ncalled: \"Natural numbers\"\n";
const THEOREM: &str = "Theorem:\ngiven: x\nthen: 'x is \\natural'\n";
const UNDEFINED: &str = "Theorem:\nthen: 'y is \\missing'\n";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("fixture to be written");
    path
}

#[test]
fn check_succeeds_on_consistent_files() {
    let dir = TempDir::new().unwrap();
    let naturals = write(dir.path(), "naturals.math", NATURALS);
    let theorem = write(dir.path(), "theorem.math", THEOREM);

    let mut cmd = cargo_bin_cmd!("mathlingua");
    cmd.arg("check").arg(&naturals).arg(&theorem);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));
}

#[test]
fn check_reports_undefined_signatures() {
    let dir = TempDir::new().unwrap();
    let theorem = write(dir.path(), "theorem.math", UNDEFINED);

    let mut cmd = cargo_bin_cmd!("mathlingua");
    cmd.arg("check").arg(&theorem);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("ERROR:").and(predicate::str::contains(
            "Undefined signature '\\missing'",
        )));
}

#[test]
fn check_emits_json() {
    let dir = TempDir::new().unwrap();
    let theorem = write(dir.path(), "theorem.math", UNDEFINED);

    let mut cmd = cargo_bin_cmd!("mathlingua");
    cmd.arg("check").arg("--json").arg(&theorem);
    cmd.assert().code(1).stdout(
        predicate::str::contains("\"message\"")
            .and(predicate::str::contains("\"row\": 1"))
            .and(predicate::str::contains("\"path\"")),
    );
}

#[test]
fn render_expands_with_context_files() {
    let dir = TempDir::new().unwrap();
    let naturals = write(dir.path(), "naturals.math", NATURALS);
    let theorem = write(dir.path(), "theorem.math", THEOREM);

    let mut cmd = cargo_bin_cmd!("mathlingua");
    cmd.arg("render").arg(&theorem).arg(&naturals);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("x is \\mathbb{N}"));

    let mut cmd = cargo_bin_cmd!("mathlingua");
    cmd.arg("render").arg(&theorem).arg(&naturals).arg("--no-expand");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("x is \\natural"));
}

#[test]
fn complete_and_search() {
    let dir = TempDir::new().unwrap();
    let naturals = write(dir.path(), "naturals.math", NATURALS);

    let mut cmd = cargo_bin_cmd!("mathlingua");
    cmd.arg("complete").arg("\\nat").arg(&naturals).arg("--signatures");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\\natural"));

    let mut cmd = cargo_bin_cmd!("mathlingua");
    cmd.arg("search").arg("natural").arg(&naturals);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("naturals.math"));
}

#[test]
fn missing_files_are_reported() {
    let mut cmd = cargo_bin_cmd!("mathlingua");
    cmd.arg("check").arg("does-not-exist.math");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot read does-not-exist.math"));
}

#[test]
fn malformed_overrides_are_rejected() {
    let dir = TempDir::new().unwrap();
    let naturals = write(dir.path(), "naturals.math", NATURALS);

    let mut cmd = cargo_bin_cmd!("mathlingua");
    cmd.arg("check").arg(&naturals).arg("--set").arg("render.html");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("key=value"));
}
