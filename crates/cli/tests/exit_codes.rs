//! Process-level contract of the `edb-healthcheck` binary:
//! exit 0 and silence when healthy, exit 1 plus a stderr diagnostic on
//! probe failure, exit 2 on bad configuration.

use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct Sandbox {
    root: TempDir,
    _listener: UnixListener,
}

impl Sandbox {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("run")).unwrap();
        std::fs::create_dir(root.path().join("bin")).unwrap();
        let listener =
            UnixListener::bind(root.path().join("run").join(".s.EDGEDB.admin.5656")).unwrap();
        Self {
            root,
            _listener: listener,
        }
    }

    fn runtime_dir(&self) -> PathBuf {
        self.root.path().join("run")
    }

    fn install_client(&self, body: &str) {
        let path = self.root.path().join("bin").join("edgedb");
        std::fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn run(&self, args: &[&str]) -> Output {
        let search_path = format!("{}:/usr/bin:/bin", self.root.path().join("bin").display());
        Command::new(env!("CARGO_BIN_EXE_edb-healthcheck"))
            .args(args)
            .env("PATH", search_path)
            .env("EDB_HEALTHCHECK_RUNTIME_DIR", self.runtime_dir())
            .env_remove("EDB_HEALTHCHECK_CONFIG")
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn test_healthy_exits_zero_silently() {
    let sandbox = Sandbox::new();
    sandbox.install_client("cat >/dev/null\necho 1\n");

    let output = sandbox.run(&[]);

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty(), "stderr: {}", text(&output.stderr));
}

#[test]
fn test_client_error_exits_nonzero_with_diagnostic() {
    let sandbox = Sandbox::new();
    sandbox.install_client("cat >/dev/null\necho boom >&2\nexit 2\n");

    let output = sandbox.run(&[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = text(&output.stderr);
    assert!(stderr.contains("returned with code 2"), "stderr: {}", stderr);
    assert!(stderr.contains("boom"), "stderr: {}", stderr);
}

#[test]
fn test_missing_runtime_dir_exits_nonzero() {
    let sandbox = Sandbox::new();
    sandbox.install_client("echo 1\n");
    let missing = sandbox.root.path().join("absent");

    let output = sandbox.run(&["--runtime-dir", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(text(&output.stderr).contains("does not exist"));
}

#[test]
fn test_json_format_reports_on_stdout() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["--format", "json", "--client", "edgedb-absent"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = text(&output.stdout);
    assert!(stdout.contains("\"kind\":\"DependencyMissing\""), "stdout: {}", stdout);
    assert!(stdout.contains("\"healthy\":false"));
}

#[test]
fn test_json_format_healthy() {
    let sandbox = Sandbox::new();
    sandbox.install_client("cat >/dev/null\necho 1\n");

    let output = sandbox.run(&["--format", "json"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(text(&output.stdout).contains("\"healthy\":true"));
}

#[test]
fn test_invalid_configuration_exits_two() {
    let sandbox = Sandbox::new();
    let config = sandbox.root.path().join("missing.toml");

    let output = sandbox.run(&["--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(text(&output.stderr).contains("Invalid configuration"));
}
