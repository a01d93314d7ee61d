//! Command-line integration tests.

use std::fs;
use std::process::Command;

const LAYOUT: &str = "\
| Date       | Narration | Debit  | Balance |
| 01-01-2024 | ATM WDL   | 500.00 | 1000.00 |
|            | REF 12345 |        |         |
| 02-01-2024 | TOTAL     | 500.00 |         |
";

fn stmtable() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_stmtable"));
    command.env("NO_COLOR", "1").env("CLICOLOR", "0");
    command
}

fn write_input(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_extract_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "statement.txt", LAYOUT);

    let output = stmtable().arg("extract").arg(&input).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "Date,Narration,Debit,Balance\n01-01-2024,ATM WDL REF 12345,500.00,1000.00\n"
    );
}

#[test]
fn test_batch_writes_one_file_per_input() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_input(&dir, "jan.txt", LAYOUT);
    let second = write_input(&dir, "feb.txt", LAYOUT);
    let out_dir = dir.path().join("out");

    let status = stmtable()
        .args(["batch", "--format", "json", "-o"])
        .arg(&out_dir)
        .arg(&first)
        .arg(&second)
        .status()
        .unwrap();
    assert!(status.success());

    let json = fs::read_to_string(out_dir.join("jan.json")).unwrap();
    assert!(json.contains("ATM WDL REF 12345"));
    assert!(out_dir.join("feb.json").exists());
}

#[test]
fn test_missing_header_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "notes.txt", "| a | b |\n| 1 | 2 |\n");

    let output = stmtable().arg("extract").arg(&input).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
}

#[test]
fn test_inspect_prints_roles_and_count() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "statement.txt", LAYOUT);

    let output = stmtable().arg("inspect").arg(&input).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("date: 0 (Date)"));
    assert!(stdout.contains("description: 1 (Narration)"));
    assert!(stdout.contains("balance: 3 (Balance)"));
    assert!(stdout.contains("Continuations merged: 1"));
    assert!(stdout.contains("Transactions: 1"));
}

#[test]
fn test_exclude_drops_matching_rows() {
    let dir = tempfile::tempdir().unwrap();
    let text = "\
| Date       | Narration     | Credit | Balance |
| 01-01-2024 | SALARY        | 900.00 | 1900.00 |
| 31-01-2024 | INTEREST PAID | 4.00   | 1904.00 |
";
    let input = write_input(&dir, "statement.txt", text);

    let output = stmtable().arg("extract").arg(&input).output().unwrap();
    assert_eq!(String::from_utf8(output.stdout).unwrap().lines().count(), 3);

    let output = stmtable()
        .arg("extract")
        .arg(&input)
        .args(["--exclude", "interest"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 2);
    assert!(!stdout.contains("INTEREST"));
}

#[test]
fn test_forced_grid_input_on_layout_text_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "statement.txt", LAYOUT);

    let output = stmtable()
        .arg("extract")
        .arg(&input)
        .args(["--input", "grid"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed output"));
}

#[test]
fn test_dedupe_and_delimiter_flags() {
    let dir = tempfile::tempdir().unwrap();
    let text = "\
; Date       ; Narration ; Balance ;
; 01-01-2024 ; TEA       ; 980     ;
; 01-01-2024 ; TEA       ; 980     ;
";
    let input = write_input(&dir, "statement.txt", text);

    let output = stmtable()
        .arg("extract")
        .arg(&input)
        .args(["--delimiter", ";"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().lines().count(), 3);

    let output = stmtable()
        .arg("extract")
        .arg(&input)
        .args(["--delimiter", ";", "--dedupe", "--format", "json", "--compact"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        r#"{"headers":["Date","Narration","Balance"],"rows":[["01-01-2024","TEA","980"]]}"#
    );
}
