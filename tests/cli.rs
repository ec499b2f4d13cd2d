#![cfg(feature = "cli")]

use std::process::Command;

fn bbp_pi() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bbp-pi"));
    cmd.env_remove("BBP_PI_RANK").env_remove("BBP_PI_SIZE");
    cmd
}

#[test]
fn test_threads_mode_prints_digits() {
    let output = bbp_pi().args(["30", "-n", "3"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("workers: 3"));
    assert!(stdout.contains("3.1415926535 8979323846 2643383279\n"));
}

#[test]
fn test_processes_mode_matches_threads_mode() {
    let output = bbp_pi()
        .args(["60", "--workers", "4", "--mode", "processes"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(
        "3.1415926535 8979323846 2643383279 5028841971 6939937510\n  5820974944\n"
    ));
}

#[test]
fn test_invalid_digit_count_exits_with_one() {
    for digits in ["0", "-7"] {
        let output = bbp_pi().args([digits, "-n", "2"]).output().unwrap();
        assert_eq!(output.status.code(), Some(1));
        assert!(output.stdout.is_empty());

        let stderr = String::from_utf8(output.stderr).unwrap();
        assert_eq!(stderr.matches("Error:").count(), 1);
    }
}

#[test]
fn test_empty_group_exits_with_two() {
    let output = bbp_pi().args(["10", "-n", "0"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}
