//! Probe edge cases: hung clients, odd exits, non-default layouts

mod common;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use common::Fixture;
use healthcheck_core::domain::ProbeSettings;
use healthcheck_core::{FailureKind, HealthcheckError};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn test_hung_client_times_out() {
    let fixture = Fixture::healthy_server();
    fixture.install_client("exec sleep 60\n");
    let settings = ProbeSettings {
        timeout: Some(Duration::from_millis(300)),
        ..fixture.settings()
    };

    let start = Instant::now();
    let err = assert_err!(fixture.probe_with(settings).run_healthcheck().await);

    assert!(matches!(err, HealthcheckError::ClientTimeout { .. }));
    assert_eq!(err.kind(), FailureKind::ClientError);
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_client_ignoring_sigterm_is_killed() {
    let fixture = Fixture::healthy_server();
    fixture.install_client("trap '' TERM\nwhile :; do sleep 1; done\n");
    let settings = ProbeSettings {
        timeout: Some(Duration::from_millis(300)),
        grace_period: Duration::from_millis(200),
        ..fixture.settings()
    };

    let start = Instant::now();
    let err = assert_err!(fixture.probe_with(settings).run_healthcheck().await);

    assert!(matches!(err, HealthcheckError::ClientTimeout { .. }));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_client_killed_by_signal() {
    let fixture = Fixture::healthy_server();
    fixture.install_client("kill -9 $$\n");

    let err = assert_err!(fixture.probe().run_healthcheck().await);

    assert!(matches!(
        err,
        HealthcheckError::ClientFailed { code: -9, .. }
    ));
}

#[tokio::test]
async fn test_client_ignoring_stdin_is_always_healthy() {
    let fixture = Fixture::healthy_server();
    fixture.install_client("echo 1\n");
    let probe = fixture.probe();

    for run in 0..200 {
        if let Err(e) = probe.run_healthcheck().await {
            panic!("run {} failed: {}", run, e);
        }
    }
}

#[tokio::test]
async fn test_client_failure_lists_stderr_then_stdout() {
    let fixture = Fixture::healthy_server();
    fixture.install_client("cat >/dev/null\necho partial\necho 'connection refused' >&2\nexit 1\n");

    let err = assert_err!(fixture.probe().run_healthcheck().await);

    assert_eq!(
        err.to_string(),
        "`edgedb` returned with code 1:\nconnection refused\npartial"
    );
}

#[tokio::test]
async fn test_non_utf8_output_is_client_error() {
    let fixture = Fixture::healthy_server();
    fixture.install_client("cat >/dev/null\nprintf '\\377\\376'\n");

    let err = assert_err!(fixture.probe().run_healthcheck().await);

    assert_eq!(err.kind(), FailureKind::ClientError);
    assert!(err.to_string().contains("UTF-8"));
}

#[tokio::test]
async fn test_non_executable_client_is_missing() {
    let fixture = Fixture::healthy_server();
    let path = fixture.install_client("echo 1\n");
    std::fs::set_permissions(
        &path,
        std::os::unix::fs::PermissionsExt::from_mode(0o644),
    )
    .unwrap();

    let err = assert_err!(fixture.probe().run_healthcheck().await);

    assert_eq!(err.kind(), FailureKind::DependencyMissing);
}

#[tokio::test]
async fn test_explicit_socket_outside_runtime_dir() {
    let mut fixture = Fixture::new();
    fixture.create_runtime_dir();
    fixture.bind_socket();
    fixture.install_client("cat >/dev/null\necho 1\n");

    let settings = ProbeSettings {
        admin_socket: Some(fixture.socket_path()),
        runtime_dir: fixture.runtime_dir(),
        ..Default::default()
    };
    assert_ok!(fixture.probe_with(settings).run_healthcheck().await);

    let settings = ProbeSettings {
        admin_socket: Some(PathBuf::from("/nonexistent/admin.sock")),
        ..fixture.settings()
    };
    let err = assert_err!(fixture.probe_with(settings).run_healthcheck().await);
    assert!(matches!(err, HealthcheckError::SocketMissing(_)));
}

#[tokio::test]
async fn test_custom_instance_and_port() {
    let fixture = Fixture::new();
    fixture.create_runtime_dir();
    let settings = ProbeSettings {
        instance: "TEST".to_string(),
        admin_port: 10701,
        ..fixture.settings()
    };
    let _listener =
        std::os::unix::net::UnixListener::bind(settings.admin_socket_path()).unwrap();
    fixture.install_client("cat >/dev/null\necho 1\n");

    assert!(settings
        .admin_socket_path()
        .ends_with(".s.TEST.admin.10701"));
    assert_ok!(fixture.probe_with(settings).run_healthcheck().await);
}
