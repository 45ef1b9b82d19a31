//! Runs the `batchfetch` binary and checks exit codes and console output.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

const FETCH_SCRIPT: &str = "#!/bin/sh\nprintf '%s\\n' \"$1\" > \"$1.done\"\n";

/// Scratch working directory with a config file, `code/download_ctx.s` and
/// XDG dirs pointed inside it so the user's files are never touched.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("batchfetch.toml"), "max_concurrent = 2\n").unwrap();
        let script = dir.path().join("code/download_ctx.s");
        fs::create_dir_all(script.parent().unwrap()).unwrap();
        fs::write(&script, FETCH_SCRIPT).unwrap();
        let mut perms = fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script, perms).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_batchfetch"))
            .arg("--config")
            .arg(self.path().join("batchfetch.toml"))
            .args(args)
            .current_dir(self.path())
            .env("XDG_STATE_HOME", self.path().join("state"))
            .env("XDG_CONFIG_HOME", self.path().join("config"))
            .output()
            .expect("run batchfetch")
    }
}

#[test]
fn invalid_type_exits_1_before_launching() {
    let ws = Workspace::new();
    fs::write(ws.path().join("ids.txt"), "A\nB\n").unwrap();
    let out = ws.run(&["themis", "ids.txt", "out"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("batchfetch error:"), "stderr: {}", stderr);
    assert!(stderr.contains("invalid content type"), "stderr: {}", stderr);
    assert!(!String::from_utf8_lossy(&out.stdout).contains("Started downloading"));
    assert!(!ws.path().join("out").exists());
}

#[test]
fn empty_list_exits_1() {
    let ws = Workspace::new();
    fs::write(ws.path().join("ids.txt"), "\n  \n").unwrap();
    let out = ws.run(&["ctx", "ids.txt"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no item ids found"), "stderr: {}", stderr);
}

#[test]
fn missing_fetcher_exits_1() {
    let ws = Workspace::new();
    fs::write(ws.path().join("ids.txt"), "A\n").unwrap();
    let out = ws.run(&["hirise_rdr", "ids.txt"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("fetcher not found"));
}

#[test]
fn full_run_exits_0_and_reports_each_start() {
    let ws = Workspace::new();
    fs::write(ws.path().join("ids.txt"), "A\nB\n\nC\nD\nE\n").unwrap();
    let out = ws.run(&["ctx", "ids.txt", "downloads"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        out.status.code(),
        Some(0),
        "stdout: {} stderr: {}",
        stdout,
        String::from_utf8_lossy(&out.stderr)
    );

    assert!(stdout.contains("Created download directory:"));
    assert!(stdout.contains("Found 5 item IDs to download."));
    assert_eq!(stdout.matches("Started downloading").count(), 5);
    for (seq, id) in ["A", "B", "C", "D", "E"].iter().enumerate() {
        let prefix = format!("Started downloading {}/5 (PID: ", seq + 1);
        assert!(
            stdout
                .lines()
                .any(|l| l.starts_with(&prefix) && l.ends_with(&format!(") - {}", id))),
            "no start line for {}: {}",
            id,
            stdout
        );
        assert!(ws.path().join("downloads").join(format!("{}.done", id)).exists());
    }
    assert_eq!(stdout.matches("All downloads completed!").count(), 1);
    assert_eq!(stdout.lines().last(), Some("All downloads completed!"));
}
