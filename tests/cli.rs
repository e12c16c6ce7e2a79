use std::io::Write;
use std::process::Stdio;
use std::thread;
use std::time::Duration;

use assert_cmd::Command;

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 253) as u8).collect()
}

fn pipemeter() -> Command {
    Command::cargo_bin("pipemeter").expect("binary built")
}

#[test]
fn help_lists_flags() {
    let assert = pipemeter().arg("--help").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8");
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--buffer-size"));
    assert!(stdout.contains("--status-append"));
}

#[test]
fn rejects_unknown_flag() {
    pipemeter().arg("--definitely-not-a-flag").assert().failure();
}

#[test]
fn two_mebibytes_summary_in_status_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = dir.path().join("status.log");
    let data = pattern(2 * 1024 * 1024);

    let assert = pipemeter()
        .args(["-q", "-b", "1048576", "-s"])
        .arg(&status)
        .write_stdin(data.clone())
        .assert()
        .success();
    assert_eq!(assert.get_output().stdout, data);

    let text = std::fs::read_to_string(&status).expect("status written");
    assert!(text.contains("\nSummary:\nPiped    2.00 MB in "), "{text}");
    assert!(text.ends_with("B/second\n"));
}

#[test]
fn fancy_lines_go_to_status_file_with_newlines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = dir.path().join("status.log");

    pipemeter()
        .args(["-o", "-b", "1024", "-s"])
        .arg(&status)
        .write_stdin(pattern(4096))
        .assert()
        .success();

    let text = std::fs::read_to_string(&status).expect("status written");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4, "{text}");
    assert!(lines[3].contains("   4.00 kB "), "{}", lines[3]);
    assert!(lines.iter().all(|l| l.contains("B/second (")));
    assert!(!text.contains("Summary:"));
}

#[test]
fn unscaled_si_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = dir.path().join("status.log");

    pipemeter()
        .args(["-q", "-u", "-I", "-s"])
        .arg(&status)
        .write_stdin(pattern(12_345))
        .assert()
        .success();

    let text = std::fs::read_to_string(&status).expect("status written");
    assert!(text.contains("Piped   12345 B in "), "{text}");
}

#[test]
fn append_mode_keeps_previous_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = dir.path().join("status.log");

    for _ in 0..2 {
        pipemeter()
            .args(["-q", "-S"])
            .arg(&status)
            .write_stdin(pattern(100))
            .assert()
            .success();
    }

    let text = std::fs::read_to_string(&status).expect("status written");
    assert_eq!(text.matches("Summary:").count(), 2);
}

#[test]
fn silent_mode_writes_no_status() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = dir.path().join("status.log");
    let data = pattern(50_000);

    let assert = pipemeter()
        .args(["-Q", "-s"])
        .arg(&status)
        .write_stdin(data.clone())
        .assert()
        .success();
    assert_eq!(assert.get_output().stdout, data);
    assert_eq!(std::fs::read_to_string(&status).expect("created"), "");
}

#[test]
fn raw_mode_writes_one_rate_per_second() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = dir.path().join("status.log");

    let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_pipemeter"))
        .args(["-r", "-b", "1024", "-s"])
        .arg(&status)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn pipemeter");

    let mut stdin = child.stdin.take().expect("stdin piped");
    let data = pattern(3 * 1024);
    for (i, piece) in data.chunks(1024).enumerate() {
        if i > 0 {
            thread::sleep(Duration::from_millis(800));
        }
        stdin.write_all(piece).expect("write piece");
    }
    drop(stdin);

    let output = child.wait_with_output().expect("child exits");
    assert!(output.status.success());
    assert_eq!(output.stdout, data);

    let text = std::fs::read_to_string(&status).expect("created");
    assert!(!text.contains("Summary:"));
    let rates: Vec<u64> = text
        .lines()
        .map(|l| l.parse().unwrap_or_else(|_| panic!("not a rate: {l:?}")))
        .collect();
    assert!(!rates.is_empty(), "status={text:?}");
    assert!(rates.iter().sum::<u64>() <= data.len() as u64);
}

#[test]
fn unopenable_status_file_falls_back_to_stderr() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = dir.path().join("missing").join("status.log");

    let assert = pipemeter()
        .args(["-q", "-s"])
        .arg(&status)
        .write_stdin(pattern(10))
        .assert()
        .success();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("Summary:"), "{stderr}");
    assert!(stderr.contains("\rSummary:\n"), "{stderr}");
}

#[test]
fn unopenable_status_file_is_fatal_with_errors_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = dir.path().join("missing").join("status.log");

    let assert = pipemeter()
        .args(["-e", "-q", "-s"])
        .arg(&status)
        .write_stdin(pattern(10))
        .assert()
        .failure();
    assert!(assert.get_output().stdout.is_empty());
}
