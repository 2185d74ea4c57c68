use std::process::{Command, Output};

fn argweave() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_argweave"));
    cmd.env_remove("COLUMNS").env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    argweave()
        .args(args)
        .output()
        .expect("failed to run argweave")
}

fn assert_success(out: &Output, what: &str) {
    assert!(
        out.status.success(),
        "argweave {what} failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
}

#[test]
fn help_works() {
    let out = run(&["--help"]);
    assert_success(&out, "--help");

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.starts_with("Composable argument parsing demo.\n\nUsage:\n"),
        "unexpected help output:\n{stdout}"
    );
    assert!(
        stdout.contains("greet <name> <options>") && stdout.contains("Where subcommands are:"),
        "unexpected help output:\n{stdout}"
    );
    assert!(
        stdout.contains("  -?, -h, --help    display usage information"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn subcommand_help_short_circuits_required_args() {
    let out = run(&["greet", "-h"]);
    assert_success(&out, "greet -h");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Usage:"), "unexpected help output:\n{stdout}");
}

#[test]
fn greet_prints_greeting() {
    let out = run(&["greet", "-n", "2", "--colour=green", "World"]);
    assert_success(&out, "greet");
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "Hello, green World!\nHello, green World!\n"
    );
}

#[test]
fn greet_shouts() {
    let out = run(&["greet", "--shout", "ferris"]);
    assert_success(&out, "greet --shout");
    assert_eq!(String::from_utf8_lossy(&out.stdout), "HELLO, FERRIS!\n");
}

#[test]
fn missing_required_argument_is_a_usage_error() {
    let out = run(&["greet"]);
    assert_eq!(out.status.code(), Some(2), "unexpected status: {}", out.status);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.starts_with("error: Missing token: name\n"),
        "unexpected stderr:\n{stderr}"
    );
    assert!(stderr.contains("Usage:"), "help not printed:\n{stderr}");
    assert!(out.stdout.is_empty());
}

#[test]
fn unknown_subcommand_is_reported() {
    let out = run(&["frobnicate"]);
    assert_eq!(out.status.code(), Some(2), "unexpected status: {}", out.status);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Unrecognised token: frobnicate"),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn missing_subcommand_is_reported() {
    let out = run(&[]);
    assert_eq!(out.status.code(), Some(2), "unexpected status: {}", out.status);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.starts_with("error: a subcommand is required"),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn bad_value_conversion_is_reported() {
    let out = run(&["greet", "--times", "lots", "you"]);
    assert_eq!(out.status.code(), Some(2), "unexpected status: {}", out.status);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Unable to convert 'lots' to destination type"),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn tokens_prints_json_lines() {
    let out = run(&["tokens", "--raw=-abc", "-r:-o=file"]);
    assert_success(&out, "tokens");

    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("token line is not JSON"))
        .collect();
    let texts: Vec<_> = lines.iter().map(|v| v["text"].as_str().unwrap_or_default()).collect();
    let kinds: Vec<_> = lines.iter().map(|v| v["kind"].as_str().unwrap_or_default()).collect();

    assert_eq!(texts, ["-a", "-b", "-c", "-o", "file"]);
    assert_eq!(kinds, ["option", "option", "option", "option", "argument"]);
    assert_eq!(lines[0]["arg"], "-abc");
    assert_eq!(lines[4]["arg"], "-o=file");
}

#[test]
fn options_before_subcommand_are_unrecognised() {
    let out = run(&["-v", "greet", "x"]);
    assert_eq!(out.status.code(), Some(2), "unexpected status: {}", out.status);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("error: Unrecognised token: -v"), "unexpected stderr:\n{stderr}");
}

#[test]
fn verbose_dumps_parsed_values() {
    let out = run(&["greet", "-v", "x"]);
    assert_success(&out, "greet -v");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("GreetArgs")
            && stderr.contains("verbose: true")
            && stderr.contains("\"x\""),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn narrow_console_wraps_help() {
    let out = argweave()
        .env("COLUMNS", "40")
        .arg("-h")
        .output()
        .expect("failed to run argweave -h");
    assert_success(&out, "-h with COLUMNS=40");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.lines().all(|line| line.chars().count() <= 40),
        "help wider than 40 columns:\n{stdout}"
    );
}
