use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn lehrmittel() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lehrmittel"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(dir: &TempDir, args: &[&str]) -> Output {
    lehrmittel()
        .current_dir(dir.path())
        .args(args)
        .output()
        .expect("run CLI")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "cli exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// `<tmp>/kurs/<folder>/<file>` holding the given fixture.
fn course_with(folder: &str, file: &str, fixture: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("kurs").join(folder);
    fs::create_dir_all(&target).expect("create folder");
    let path = target.join(file);
    fs::copy(Path::new("tests/fixtures").join(fixture), &path).expect("copy fixture");
    (dir, path)
}

fn root(dir: &TempDir) -> String {
    dir.path().join("kurs").display().to_string()
}

#[test]
fn extract_then_convert() {
    let (dir, source) = course_with("3 Verträge", "2 Lehrmittel.md", "lehrmittel.md");
    let original = fs::read_to_string(&source).unwrap();

    let output = run(&dir, &["extract", &root(&dir)]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Extracted content saved to:"));
    assert_eq!(fs::read_to_string(&source).unwrap(), original);

    let questions = fs::read_to_string(source.with_file_name("2 Lehrmittel Fragen.md")).unwrap();
    assert_eq!(questions.matches("subId:").count(), 3);

    let output = run(&dir, &["convert", &root(&dir)]);
    assert_success(&output);

    let converted = fs::read_to_string(source.with_file_name("2 Lehrmittel Fragen new.md")).unwrap();
    assert!(converted.contains(
        "assignmentId=Verträge&subIds=**1.1 Lesen**&question1=Was ist ein Vertrag?&question2=Wer schliesst Verträge ab?"
    ));
    assert_eq!(converted.matches("#### Reflexionsfragen").count(), 1);
    assert!(converted.contains(
        "subIds=Refexionsfrage&question1=Wann hast du zuletzt einen Vertrag abgeschlossen?&question2=Was würdest du anders machen?\""
    ));
}

#[test]
fn convert_with_percent_encoding() {
    let (dir, source) = course_with("Budget", "2 Lehrmittel Fragen.md", "fragen.md");

    let output = run(&dir, &["convert", "--encoding", "percent", &root(&dir)]);
    assert_success(&output);

    let converted = fs::read_to_string(source.with_file_name("2 Lehrmittel Fragen new.md")).unwrap();
    assert!(converted.contains("subIds=2.1&question1=Was%20ist%20ein%20Budget%3F"));
}

#[test]
fn rewrite_in_place() {
    let (dir, source) = course_with("1 Verträge", "2 Lehrmittel.md", "lehrmittel.md");

    let output = run(&dir, &["rewrite", &root(&dir)]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Processed file:"));
    assert!(stdout.contains("1 files found: 1 written, 0 without records, 0 failed."));

    let rewritten = fs::read_to_string(&source).unwrap();
    assert!(rewritten.starts_with("# Einleitung\n\nDieses Kapitel"));
    assert!(rewritten.contains("\n<!-- Appended Reflexionsfragen -->\n"));
    assert!(!rewritten.contains("assignmentId=alt"));
}

#[test]
fn environment_overrides_settings() {
    let (dir, source) = course_with("Budget", "2 Lehrmittel Fragen.md", "fragen.md");

    let output = lehrmittel()
        .current_dir(dir.path())
        .env("LEHRMITTEL_CONVERTED_FILE", "antworten.md")
        .env("LEHRMITTEL_CONVERT_ENCODING", "percent")
        .args(["convert", &root(&dir)])
        .output()
        .expect("run CLI");
    assert_success(&output);

    assert!(!source.with_file_name("2 Lehrmittel Fragen new.md").exists());
    let converted = fs::read_to_string(source.with_file_name("antworten.md")).unwrap();
    assert!(converted.contains("subIds=2.1&question1=Was%20ist%20ein%20Budget%3F"));
}

#[test]
fn config_file_in_working_directory() {
    let (dir, source) = course_with("Budget", "2 Lehrmittel Fragen.md", "fragen.md");
    fs::write(
        dir.path().join("lehrmittel.toml"),
        "endpoint = \"https://example.org/antwort.html\"\n",
    )
    .unwrap();

    assert_success(&run(&dir, &["convert", &root(&dir)]));
    let converted = fs::read_to_string(source.with_file_name("2 Lehrmittel Fragen new.md")).unwrap();
    assert!(converted.contains("src=\"https://example.org/antwort.html?assignmentId=Budget&subIds=2.1"));
}

#[test]
fn dry_run_writes_nothing() {
    let (dir, source) = course_with("1 Verträge", "2 Lehrmittel.md", "lehrmittel.md");
    let original = fs::read_to_string(&source).unwrap();

    let output = run(&dir, &["rewrite", "--dry-run", &root(&dir)]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("1 would write"));
    assert_eq!(fs::read_to_string(&source).unwrap(), original);
}

#[test]
fn prompts_for_root_on_stdin() {
    let (dir, source) = course_with("1 Verträge", "2 Lehrmittel.md", "lehrmittel.md");

    let mut child = lehrmittel()
        .current_dir(dir.path())
        .arg("extract")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn CLI");
    child
        .stdin
        .as_mut()
        .expect("stdin open")
        .write_all(format!("{}\n", root(&dir)).as_bytes())
        .expect("write stdin");

    let output = child.wait_with_output().expect("read CLI output");
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Enter the path to the folder:"));
    assert!(source.with_file_name("2 Lehrmittel Fragen.md").exists());
}

#[test]
fn empty_answer_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = lehrmittel()
        .current_dir(dir.path())
        .arg("rewrite")
        .stdin(Stdio::null())
        .output()
        .expect("run CLI");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No path provided"));
}

#[test]
fn invalid_root_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gibt-es-nicht");
    let output = run(&dir, &["rewrite", &missing.display().to_string()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a valid directory"));
}

#[test]
fn broken_file_does_not_stop_the_batch() {
    let (dir, good) = course_with("2 gut", "2 Lehrmittel.md", "lehrmittel.md");
    let broken = dir.path().join("kurs").join("1 kaputt");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("2 Lehrmittel.md"), [0xff, 0xfe, 0x00, 0x41]).unwrap();

    let output = run(&dir, &["rewrite", &root(&dir)]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout)
        .contains("2 files found: 1 written, 0 without records, 1 failed."));
    assert!(fs::read_to_string(&good).unwrap().contains("assignmentId=gut"));
}

#[test]
fn nothing_found() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("kurs")).unwrap();
    let output = run(&dir, &["convert", &root(&dir)]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("No '2 Lehrmittel Fragen.md' found"));
}
