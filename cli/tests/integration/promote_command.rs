//! Integration tests for `drode promote`, `drode wait` and `drode status`
//! against a stub Drone server.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;

use crate::support::{StubDrone, TempConfig, build_json, drode, drode_process, single_project};

fn stub() -> StubDrone {
    StubDrone::start(vec![
        build_json(213, "success", "push"),
        build_json(212, "success", "promote"),
        build_json(200, "failure", "push"),
    ])
}

#[test]
fn test_promote_confirmed_triggers_one_promotion() {
    let drone = stub();
    let config = TempConfig::new(&single_project(&drone.url));

    drode()
        .args(["-c", config.arg(), "promote"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "You're about to promote job #213 of the pipeline owner/web to production",
        ))
        .stdout(predicate::str::contains("With commit 9d4c1b0f: Fix the login form"))
        .stdout(predicate::str::contains("Job #214 has started."))
        .stderr(predicate::str::contains("Are you sure? [y/N]:"));

    let promotes = drone.promotes();
    assert_eq!(promotes.len(), 1);
    assert_eq!(promotes[0].path, "/api/repos/owner/web/builds/213/promote");
    assert_eq!(promotes[0].target.as_deref(), Some("production"));
}

#[test]
fn test_promote_declined_exits_zero_without_promotion() {
    let drone = stub();
    let config = TempConfig::new(&single_project(&drone.url));

    drode()
        .args(["-c", config.arg(), "promote", "213", "staging"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[INFO] Promotion of job #213 aborted"));

    assert!(drone.promotes().is_empty());
}

#[test]
fn test_promote_declined_json_prints_aborted_document() {
    let drone = stub();
    let config = TempConfig::new(&single_project(&drone.url));

    let assert = drode()
        .args(["-c", config.arg(), "--json", "promote", "213", "staging"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("[INFO] Promotion of job #213 aborted"));

    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("one JSON document");
    assert_eq!(value["aborted"], true);
    assert_eq!(value["message"], "Promotion of job #213 aborted");
    assert!(drone.promotes().is_empty());
}

/// Ctrl-C while the confirmation is pending must end the process, so a later
/// `y` on stdin can never reach Drone.
#[cfg(unix)]
#[test]
fn test_promote_wait_interrupted_at_prompt_triggers_nothing() {
    use std::io::{Read as _, Write as _};
    use std::os::unix::process::ExitStatusExt as _;
    use std::process::Stdio;

    let drone = stub();
    let config = TempConfig::new(&single_project(&drone.url));
    let mut child = drode_process()
        .args(["-c", config.arg(), "promote", "213", "staging", "-w"])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn drode");

    // The question has no trailing newline, so read byte by byte.
    let mut stderr = child.stderr.take().expect("stderr");
    let mut seen = Vec::new();
    let mut byte = [0u8; 1];
    while !String::from_utf8_lossy(&seen).contains("Are you sure? [y/N]:") {
        let n = stderr.read(&mut byte).expect("read stderr");
        assert!(n > 0, "exited before prompting: {}", String::from_utf8_lossy(&seen));
        seen.push(byte[0]);
    }

    let killed = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("run kill");
    assert!(killed.success());

    // The pipe may already be closed; the answer must be ignored either way.
    let mut stdin = child.stdin.take().expect("stdin");
    let _ = stdin.write_all(b"y\n");
    drop(stdin);

    let status = child.wait().expect("wait for drode");
    assert_eq!(status.signal(), Some(2), "expected SIGINT exit, got {status:?}");
    assert!(drone.promotes().is_empty());
}

#[test]
fn test_promote_failed_build_is_refused() {
    let drone = stub();
    let config = TempConfig::new(&single_project(&drone.url));

    drode()
        .args(["-c", config.arg(), "promote", "200", "production"])
        .write_stdin("y\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "[ERROR] You can't promote job #200 to production as it's status is failure",
        ));

    assert!(drone.promotes().is_empty());
}

#[test]
fn test_promote_json_prints_triggered_build() {
    let drone = stub();
    let config = TempConfig::new(&single_project(&drone.url));

    let out = drode()
        .args(["-c", config.arg(), "--json", "promote", "213", "staging"])
        .write_stdin("yes\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
    assert_eq!(value["number"], 214);
    assert_eq!(value["source"], 213);
    assert_eq!(value["environment"], "staging");
}

#[test]
fn test_promote_missing_build_is_not_found() {
    let drone = stub();
    let config = TempConfig::new(&single_project(&drone.url));

    drode()
        .args(["-c", config.arg(), "promote", "999"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "The build 999 was not found at the pipeline owner/web",
        ));
}

#[test]
fn test_wait_on_finished_build_returns_its_status() {
    let drone = stub();
    let config = TempConfig::new(&single_project(&drone.url));

    drode()
        .args(["-c", config.arg(), "wait", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Job #200 has finished with status failure"));
}

#[test]
fn test_wait_latest_without_active_jobs() {
    let drone = stub();
    let config = TempConfig::new(&single_project(&drone.url));

    drode()
        .args(["-c", config.arg(), "wait"])
        .assert()
        .success()
        .stdout(predicate::str::contains("There are no active jobs"))
        .stdout(predicate::str::contains("Job #213 has finished with status success"));
}

#[test]
fn test_bad_token_is_an_authentication_error() {
    let drone = stub();
    let yaml = single_project(&drone.url).replace("token: secret", "token: wrong");
    let config = TempConfig::new(&yaml);

    let out = drode()
        .args(["-c", config.arg(), "--json", "wait", "213"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
    assert_eq!(value["code"], "authentication");
}

#[test]
fn test_drone_credentials_fall_back_to_environment() {
    let drone = stub();
    let config = TempConfig::new("projects:\n  web:\n    pipeline: owner/web\n");

    drode()
        .args(["-c", config.arg(), "wait", "213"])
        .env("DRONE_SERVER", &drone.url)
        .env("DRONE_TOKEN", "secret")
        .assert()
        .success()
        .stdout(predicate::str::contains("Job #213 has finished with status success"));
}

#[test]
fn test_missing_drone_credentials_is_a_configuration_error() {
    let config = TempConfig::new("projects:\n  web:\n    pipeline: owner/web\n");
    drode()
        .args(["-c", config.arg(), "wait", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DRONE_SERVER and DRONE_TOKEN"));
}

#[test]
fn test_status_without_aws_section_reports_nothing_to_show() {
    let config = TempConfig::new("projects:\n  web:\n    pipeline: owner/web\n");
    drode()
        .args(["-c", config.arg(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The project web has no autoscaling groups configured",
        ));
}

#[test]
fn test_status_json_without_aws_section() {
    let config = TempConfig::new("projects:\n  web:\n    pipeline: owner/web\n");
    let out = drode()
        .args(["-c", config.arg(), "--json", "status"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
    assert!(value["production"].is_null());
    assert!(value["staging"].is_null());
}
