use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn run_clock<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_literary-clock"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|err| panic!("failed to execute literary-clock binary: {err}"))
}

fn stdout_of(output: &Output) -> String {
    if !output.status.success() {
        panic!(
            "literary-clock failed (status={}):\nstdout:\n{}\nstderr:\n{}",
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn run_json<I, S>(args: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let stdout = stdout_of(&run_clock(args));
    serde_json::from_str(&stdout)
        .unwrap_or_else(|err| panic!("stdout is not valid JSON: {err}\nstdout:\n{stdout}"))
}

fn write(path: &Path, contents: &str) {
    fs::write(path, contents)
        .unwrap_or_else(|err| panic!("failed to write fixture {}: {err}", path.display()));
}

fn corpus_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("failed to create temp dir: {err}"));
    write(
        &dir.path().join("09_41.json"),
        r#"[{"time": "09:41", "quote_first": "The screen read ", "quote_time_case": "9:41 A.M.", "quote_last": " when it lit up.", "title": "Keynote", "author": "Anon", "sfw": "yes"}]"#,
    );
    write(
        &dir.path().join("15_22.json"),
        r#"[{"time": "15:22", "quote_first": "", "quote_time_case": "3:22 P.M.", "quote_last": "\nAs Stone Aimes stepped off the elevator on the sixth floor, his mind was running through his options.", "title": "Syndrome", "author": "Thomas Hoover", "sfw": "yes"}]"#,
    );
    dir
}

#[test]
fn once_at_minute_prints_indexed_quote_as_json() {
    let dir = corpus_dir();
    let corpus = dir.path().to_string_lossy().to_string();

    let frame = run_json(["--corpus", &corpus, "--at", "15:22", "--once", "--json"]);

    assert_eq!(frame["time_key"], "15:22");
    assert_eq!(frame["quote"]["title"], "Syndrome");
    assert_eq!(frame["quote"]["quote_time_case"], "3:22 P.M.");
    assert_eq!(frame["origin"]["kind"], "selected");
    assert_eq!(frame["origin"]["candidates"], 1);
    assert_eq!(frame["reused"], false);
}

#[test]
fn missing_corpus_falls_back_without_failing() {
    let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("failed to create temp dir: {err}"));
    let missing = dir.path().join("no-such-corpus").to_string_lossy().to_string();

    let frame = run_json(["--corpus", &missing, "--at", "04:04", "--once", "--json"]);

    assert_eq!(frame["origin"]["kind"], "fallback");
    assert_eq!(frame["quote"]["author"], "Khalil Gibran");
}

#[test]
fn text_output_is_plain_when_piped() {
    let dir = corpus_dir();
    let corpus = dir.path().to_string_lossy().to_string();

    let stdout = stdout_of(&run_clock(["--corpus", &corpus, "--at", "9:41", "--once"]));

    assert_eq!(stdout, "[09:41]\nThe screen read 9:41 A.M. when it lit up.\n    - Keynote, Anon");
}

#[test]
fn config_file_supplies_corpus_and_theme() {
    let dir = corpus_dir();
    let config = dir.path().join("clock.yaml");
    write(&config, &format!("corpus: {}\ntheme: dark\nselection: first\n", dir.path().display()));
    let config = config.to_string_lossy().to_string();

    let frame = run_json(["--config", &config, "--at", "09:41", "--once", "--json"]);

    assert_eq!(frame["theme"], "dark");
    assert_eq!(frame["quote"]["title"], "Keynote");
}

#[test]
fn invalid_time_argument_is_rejected() {
    let output = run_clock(["--at", "25:00", "--once"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--at"), "stderr should name the bad argument:\n{stderr}");
}

#[test]
fn out_of_range_tick_interval_is_rejected() {
    let output = run_clock(["--tick-interval-secs", "90", "--once"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tick_interval_secs"), "unexpected stderr:\n{stderr}");
}
