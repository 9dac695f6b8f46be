#![cfg(unix)]

use std::error::Error;
use std::process::Command;

use scriptvisor::coordinator::FINISHED_MESSAGE;
use scriptvisor_test_utils::builders::ScriptDir;

type TestResult = Result<(), Box<dyn Error>>;

fn scriptvisor() -> Command {
    Command::new(env!("CARGO_BIN_EXE_scriptvisor"))
}

#[test]
fn failing_scripts_still_exit_zero() -> TestResult {
    let dir = ScriptDir::new()
        .with_script("ok.sh", "echo fine\n")
        .with_script("bad.sh", "echo broken >&2\nexit 1\n");

    let output = scriptvisor()
        .arg("--interpreter")
        .arg("sh")
        .arg("--dir")
        .arg(dir.path())
        .args(["ok.sh", "bad.sh", "gone.sh"])
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("[ok.sh] fine\n"));
    assert!(stdout.contains("[bad.sh][ERROR] broken\n"));
    assert!(stdout.contains("bad.sh completed with error: "));
    assert!(stdout.contains("gone.sh"));
    assert!(stdout.ends_with(&format!("{FINISHED_MESSAGE}\n")));

    Ok(())
}

#[test]
fn no_arguments_runs_builtin_list_from_cwd() -> TestResult {
    let dir = ScriptDir::new();

    let output = scriptvisor().current_dir(dir.path()).output()?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Gesture_Controller.py"));
    assert!(stdout.contains("proton.py"));
    assert_eq!(stdout.matches("Error: File not found: ").count(), 2);
    assert!(stdout.ends_with(&format!("{FINISHED_MESSAGE}\n")));

    Ok(())
}

#[test]
fn invalid_chunk_size_is_rejected_before_any_job() -> TestResult {
    let dir = ScriptDir::new().with_script("a.sh", "echo ran\n");

    let output = scriptvisor()
        .args(["--interpreter", "sh", "--chunk-size", "0", "--dir"])
        .arg(dir.path())
        .arg("a.sh")
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8(output.stdout)?.contains("ran"));

    Ok(())
}
