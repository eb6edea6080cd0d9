#![cfg(feature = "cli")]

#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::process::{Command, Output};

const HEXSEND_EXE: &str = env!("CARGO_BIN_EXE_hexsend");

fn run(args: &[&str]) -> Output {
    Command::new(HEXSEND_EXE)
        .args(args)
        .output()
        .expect("Failed to run hexsend")
}

#[test]
fn test_hexsend_shows_help() {
    for flag in ["--help", "help", "-h"] {
        // Act
        let output = run(&[flag]);

        // Assert
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.contains("Usage"),
            "stdout did not look like help text:\n{stdout}"
        );
    }
}

#[test]
fn test_hexsend_without_command_fails() {
    let output = run(&[]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}

#[test]
fn test_hexsend_shows_info_valid() {
    // Act
    let output = run(&["info", "tests/fixtures/blink.hex"]);

    // Assert
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Records:     13"), "stdout:\n{stdout}");
    assert!(stdout.contains("Data Size:   182 bytes"), "stdout:\n{stdout}");
    assert!(
        stdout.contains("Range:       0x0000_0000 - 0x0000_00B5"),
        "stdout:\n{stdout}"
    );
    assert!(stdout.contains("Terminated:  yes"), "stdout:\n{stdout}");
}

#[test]
fn test_hexsend_shows_info_start_address() {
    let output = run(&["info", "tests/fixtures/stm32.hex"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Range:       0x0800_0000 - 0x0800_003F"),
        "stdout:\n{stdout}"
    );
    assert!(stdout.contains("Start:       0x0800_0131"), "stdout:\n{stdout}");
    assert!(stdout.contains("Start Linear Address"), "stdout:\n{stdout}");
}

#[test]
fn test_hexsend_info_reports_checksum_error() {
    // Act
    let output = run(&["info", "tests/fixtures/bad_checksum.hex"]);

    // Assert
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line #3"), "stderr:\n{stderr}");
    assert!(stderr.to_lowercase().contains("checksum"), "stderr:\n{stderr}");
}

#[test]
fn test_hexsend_info_missing_file() {
    let output = run(&["info", "tests/fixtures/does_not_exist.hex"]);

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File not found"), "stderr:\n{stderr}");
}

#[test]
fn test_hexsend_info_missing_argument() {
    let output = run(&["info"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing input file path"));
}

#[test]
fn test_hexsend_lists_boards() {
    let output = run(&["boards"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for sig in ["ARDUINO_UNO_R3", "ARDUINO_NANO", "ARDUINO_MEGA", "STM32F103"] {
        assert!(stdout.contains(sig), "missing {sig} in:\n{stdout}");
    }
}

#[test]
fn test_hexsend_send_requires_port() {
    let output = run(&["send", "tests/fixtures/blink.hex"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--port"));
}

#[test]
fn test_hexsend_signature_rejects_unknown_board() {
    let output = run(&["signature", "--port", "COM99", "--board", "ESP32"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown board"));
}
