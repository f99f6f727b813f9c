use assert_cmd::Command;

// Exercises the binary's argument handling without a terminal.

#[test]
fn refuses_to_run_without_a_tty() {
    let output = Command::cargo_bin("clamtap")
        .unwrap()
        .write_stdin("")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stdin must be a tty"), "stderr: {stderr}");
}

#[test]
fn help_lists_game_flags() {
    let output = Command::cargo_bin("clamtap")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--duration", "--clams", "--crabs", "--columns", "--seed"] {
        assert!(stdout.contains(flag), "missing {flag} in help");
    }
}

#[test]
fn rejects_zero_clams() {
    Command::cargo_bin("clamtap")
        .unwrap()
        .args(["--clams", "0"])
        .write_stdin("")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn rejects_oversized_field() {
    for args in [["--clams", "501"], ["--crabs", "501"], ["--columns", "65"]] {
        Command::cargo_bin("clamtap")
            .unwrap()
            .args(args)
            .write_stdin("")
            .assert()
            .failure()
            .code(2);
    }
}
