//! Integration tests for the trivial-irc binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const LOG: &str = "\
Pregunta: 1 / 2
GASTRONOMÍA LICOR DE COLOR AMARILLO... (1 palabra)
>>>PLAYER1 a 01'23
La buena: ROMPOPE Mandada por: CASTRO
Pregunta: 2 / 2
HISTORIA ¿Año de la toma de la Bastilla?
La buena: 1789
";

fn trivial_irc() -> Command {
    let mut cmd = Command::cargo_bin("trivial-irc").unwrap();
    cmd.env_remove("TRIVIAL_IRC_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn log_file(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file
}

// ============================================================================
// extract
// ============================================================================

#[test]
fn extract_prints_first_page_as_json() {
    let file = log_file(LOG.as_bytes());
    let output = trivial_irc().arg("extract").arg(file.path()).output().unwrap();
    assert!(output.status.success());

    let page: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["totalRecords"], 2);
    assert_eq!(page["totalPages"], 1);
    assert_eq!(page["page"], 1);
    assert_eq!(page["hasMore"], false);
    assert_eq!(page["records"][0]["winner"], "PLAYER1");
    assert_eq!(page["records"][0]["responseTimeSeconds"], "1.23s");
    assert_eq!(page["records"][1]["answerText"], "1789");
}

#[test]
fn extract_reads_stdin() {
    trivial_irc()
        .args(["extract", "--page-size", "1", "--page", "2"])
        .write_stdin(LOG)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"page\": 2").and(predicate::str::contains("HISTORIA")));
}

#[test]
fn extract_tolerates_invalid_utf8() {
    let mut bytes = LOG.as_bytes().to_vec();
    bytes.extend_from_slice(b"\xff\xfe basura\n");
    let file = log_file(&bytes);
    trivial_irc().arg("extract").arg(file.path()).assert().success().stdout(predicate::str::contains("ROMPOPE"));
}

#[test]
fn extract_page_out_of_range_fails() {
    trivial_irc()
        .args(["extract", "--page", "3", "--page-size", "1"])
        .write_stdin(LOG)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("page 3"));
}

#[test]
fn extract_rejects_zero_page_size() {
    trivial_irc().args(["extract", "--page-size", "0"]).write_stdin(LOG).assert().code(2);
}

#[test]
fn extract_missing_file_fails() {
    trivial_irc()
        .args(["extract", "/definitely/not/here.log"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn extract_text_report() {
    trivial_irc()
        .args(["extract", "--format", "text", "--no-color"])
        .write_stdin(LOG)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Page 1/1")
                .and(predicate::str::contains("GASTRONOMÍA"))
                .and(predicate::str::contains("question header"))
                .and(predicate::str::contains("\x1b[").not()),
        );
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_file_sets_page_size() {
    let config = log_file(b"[batch]\npage_size = 1\n");
    trivial_irc()
        .arg("--config")
        .arg(config.path())
        .arg("extract")
        .write_stdin(LOG)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"totalPages\": 2"));
}

#[test]
fn config_from_environment() {
    let config = log_file(b"[scanner]\nexcluded_nicks = [\"PLAYER1\"]\n");
    trivial_irc()
        .env("TRIVIAL_IRC_CONFIG", config.path())
        .arg("extract")
        .write_stdin(LOG)
        .assert()
        .success()
        .stdout(predicate::str::contains("PLAYER1").not());
}

#[test]
fn invalid_config_fails() {
    let config = log_file(b"[batch]\nunknown = 1\n");
    trivial_irc().arg("--config").arg(config.path()).arg("patterns").assert().code(1);
}

// ============================================================================
// validate / patterns
// ============================================================================

#[test]
fn validate_reports_answers() {
    let output = trivial_irc().arg("validate").write_stdin(LOG).output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["answersFound"], 2);
    assert_eq!(report["answers"], serde_json::json!(["ROMPOPE", "1789"]));
    assert_eq!(report["processingWorks"], true);
}

#[test]
fn patterns_lists_rules() {
    trivial_irc()
        .arg("patterns")
        .assert()
        .success()
        .stdout(predicate::str::contains("player attempt").and(predicate::str::contains("fallbackHeader")));
}

#[test]
fn no_subcommand_is_a_usage_error() {
    trivial_irc().assert().code(2).stderr(predicate::str::contains("Usage"));
}
