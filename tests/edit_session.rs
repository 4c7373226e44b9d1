//! End-to-end edit sessions: real binary, scripted admin server, fake editor.
#![cfg(unix)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::os::unix::fs::PermissionsExt;
use std::thread;
use std::time::Duration;

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

const BASELINE: &str = r#"{"version":5,"last_timestamp":1000,"nodes":[1,2]}"#;

/// Accept one connection and answer each request line with the next scripted
/// response. Returns the request lines the server saw.
fn spawn_server(responses: Vec<String>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind scripted server");
    let addr = listener.local_addr().expect("local addr").to_string();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut writer = stream;
        let mut seen = Vec::new();

        for response in responses {
            let mut line = String::new();
            if reader.read_line(&mut line).expect("read request") == 0 {
                break;
            }
            seen.push(line.trim_end().to_owned());
            writer.write_all(response.as_bytes()).expect("write response");
            writer.write_all(b"\n").expect("write newline");
        }
        seen
    });

    (addr, handle)
}

fn ok() -> String {
    serde_json::json!({"ok": true}).to_string()
}

fn fetch_ok() -> String {
    serde_json::json!({"ok": true, "payload": BASELINE}).to_string()
}

/// Write an executable shell script that replaces the edit buffer wholesale.
fn fake_editor(tmp: &assert_fs::TempDir, replacement: &str) -> String {
    let script = tmp.child("fake-editor.sh");
    script
        .write_str(&format!(
            "#!/bin/sh\ncat > \"$1\" <<'JSON'\n{replacement}\nJSON\n"
        ))
        .expect("write editor script");

    let path = script.path().to_path_buf();
    let mut perms = std::fs::metadata(&path).expect("stat").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod");
    path.to_str().expect("utf8 path").to_owned()
}

/// An "editor" that saves the buffer untouched.
fn noop_editor(tmp: &assert_fs::TempDir) -> String {
    let script = tmp.child("noop-editor.sh");
    script.write_str("#!/bin/sh\nexit 0\n").expect("write editor script");

    let path = script.path().to_path_buf();
    let mut perms = std::fs::metadata(&path).expect("stat").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod");
    path.to_str().expect("utf8 path").to_owned()
}

fn ncfg() -> Command {
    let mut cmd = Command::cargo_bin("ncfg").expect("binary builds");
    cmd.timeout(Duration::from_secs(30));
    cmd
}

#[test]
fn applying_an_edit_writes_the_reconciled_document() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    let editor = fake_editor(
        &tmp,
        r#"{"version": 5, "last_timestamp": 1000, "nodes": [1, 2, 3]}"#,
    );
    let (addr, handle) = spawn_server(vec![ok(), fetch_ok(), ok()]);

    ncfg()
        .args(["edit", "--no-color", "--addr", &addr, "--editor", &editor])
        .write_stdin("1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("following diff"))
        .stdout(predicate::str::contains("Successfully updated the config"));

    let seen = handle.join().expect("server thread");
    assert_eq!(seen.len(), 3);
    assert!(seen[2].contains("overwrite-config"));
    // The write carries the forced version bump, not the version we read.
    assert!(seen[2].contains(r#"\"version\":6"#));
    assert!(!seen[2].contains(r#"\"version\":5"#));
}

#[test]
fn cancelling_never_writes() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    let editor = fake_editor(
        &tmp,
        r#"{"version": 5, "last_timestamp": 1000, "nodes": []}"#,
    );
    let (addr, handle) = spawn_server(vec![ok(), fetch_ok()]);

    ncfg()
        .args(["edit", "--no-color", "--addr", &addr, "--editor", &editor])
        .write_stdin("3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes applied"));

    let seen = handle.join().expect("server thread");
    assert_eq!(seen.len(), 2, "no overwrite request may be sent");
}

#[test]
fn resaving_unchanged_asks_for_a_retry() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    let editor = noop_editor(&tmp);
    let (addr, handle) = spawn_server(vec![ok(), fetch_ok()]);

    ncfg()
        .args(["edit", "--no-color", "--addr", &addr, "--editor", &editor])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("no changes detected"))
        .stdout(predicate::str::contains("No changes applied"));

    let seen = handle.join().expect("server thread");
    assert_eq!(seen.len(), 2);
}
