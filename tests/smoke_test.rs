/// Smoke tests to verify the binary runs without panicking
use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .arg("run")
        .arg("--quiet")
        .arg("--")
        .args(args)
        .output()
        .expect("Failed to execute cargo run")
}

#[test]
fn binary_shows_help() {
    let output = run(&["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fractal-clock"), "Help output should mention fractal-clock");
    assert!(stdout.contains("--repetitions"));
}

#[test]
fn binary_shows_version() {
    let output = run(&["--version"]);

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_flag_fails_gracefully() {
    let output = run(&["--no-such-flag"]);

    // Should fail with error, not panic
    assert!(!output.status.success(), "Invalid flag should return error status");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("panicked at"), "Invalid flag should not cause panic");
}

#[test]
fn print_mode_renders_one_frame() {
    let output = run(&[
        "--print", "--no-color", "--cols", "40", "--rows", "12", "--length", "400", "--show-time",
        "--config", "/nonexistent/fractal-clock.toml",
    ]);

    assert!(
        output.status.success(),
        "Print mode failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 12);
    assert!(stdout.lines().all(|line| line.chars().count() == 40));
    assert!(stdout.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)));
}

#[test]
fn print_mode_survives_degenerate_config() {
    let output = run(&[
        "--print", "--no-color", "--cols", "20", "--rows", "6", "-r", "0", "-c", "-4",
        "--mode", "unknown", "--config", "/nonexistent/fractal-clock.toml",
    ]);

    assert!(
        output.status.success(),
        "Degenerate config failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(!String::from_utf8_lossy(&output.stderr).contains("panicked at"));
}
