use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::{contains, starts_with};

const BINARY_NAME: &str = "tabiya";

#[test]
fn queries() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("turn\nstate\nmoves b1\nd\nquit\n")
            .assert()
            .success()
            .stdout(
                starts_with("white\nidle\na3 c3\n")
                    .and(contains("1 R N B Q K B N R"))
                    .and(contains("turn: white")),
            ),
    );
}

#[test]
fn engine_replies() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args(["--seed", "1", "--engine", "black"]);

    drop(
        cmd.write_stdin("move e2e4\nhistory\n")
            .assert()
            .success()
            .stdout(starts_with("ok e2e4\nmove ").and(contains("\ne2e4 "))),
    );
}

#[test]
fn fools_mate() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("move f2f3\nmove e7e5\nmove g2g4\nmove d8h4\ngo\n")
            .assert()
            .success()
            .stdout(
                contains("game over: checkmate")
                    .and(contains("error the game is over: checkmate")),
            ),
    );
}

#[test]
fn invalid_commands() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("uci\nmove e2e5\nmoves x1\nhistory\n")
            .assert()
            .success()
            .stdout(
                contains("error unknown command: uci")
                    .and(contains("error illegal move e2e5"))
                    .and(contains("error parsing square \"x1\"")),
            ),
    );
}

#[test]
fn version() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("version\n")
            .assert()
            .success()
            .stdout(starts_with("tabiya ").and(contains("commit"))),
    );
}

#[test]
fn logs_go_to_stderr() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args(["--seed", "3", "--log-level", "debug"]);

    drop(
        cmd.write_stdin("go\n")
            .assert()
            .success()
            .stdout(starts_with("move "))
            .stderr(contains("white plays")),
    );
}

#[test]
fn rejects_unknown_side() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args(["--engine", "green"]);

    drop(cmd.assert().failure());
}
