//! Shared fixture: a fake runtime directory, admin socket and stub client

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use healthcheck_core::domain::ProbeSettings;
use healthcheck_core::port::time_provider::SystemTimeProvider;
use healthcheck_core::Probe;
use healthcheck_infra_system::{LocalFileSystem, PathResolver, SubprocessClientRunner};

pub const CLIENT: &str = "edgedb";

pub struct Fixture {
    root: TempDir,
    listener: Option<UnixListener>,
}

impl Fixture {
    /// Empty sandbox; the runtime directory does not exist yet
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("bin")).unwrap();
        Self {
            root,
            listener: None,
        }
    }

    /// Runtime directory with a live admin socket
    pub fn healthy_server() -> Self {
        let mut fixture = Self::new();
        fixture.create_runtime_dir();
        fixture.bind_socket();
        fixture
    }

    pub fn runtime_dir(&self) -> PathBuf {
        self.root.path().join("run")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    pub fn settings(&self) -> ProbeSettings {
        ProbeSettings {
            runtime_dir: self.runtime_dir(),
            timeout: Some(Duration::from_secs(10)),
            grace_period: Duration::from_millis(200),
            ..Default::default()
        }
    }

    pub fn socket_path(&self) -> PathBuf {
        self.settings().admin_socket_path()
    }

    pub fn create_runtime_dir(&self) {
        std::fs::create_dir_all(self.runtime_dir()).unwrap();
    }

    pub fn bind_socket(&mut self) {
        self.listener = Some(UnixListener::bind(self.socket_path()).unwrap());
    }

    /// Regular file where the socket should be
    pub fn plant_socket_file(&self) {
        std::fs::write(self.socket_path(), b"").unwrap();
    }

    /// Install an executable `/bin/sh` script as the client
    pub fn install_client(&self, body: &str) -> PathBuf {
        let path = self.bin_dir().join(CLIENT);
        write_script(&path, body);
        path
    }

    /// File recorded by clients installed with `install_recording_client`
    pub fn record_path(&self) -> PathBuf {
        self.root.path().join("record")
    }

    /// Client that stores its arguments and stdin, then prints `1`
    pub fn install_recording_client(&self) -> PathBuf {
        let record = self.record_path();
        self.install_client(&format!(
            "echo \"$@\" > '{0}'\ncat >> '{0}'\necho 1\n",
            record.display()
        ))
    }

    pub fn probe(&self) -> Probe {
        self.probe_with(self.settings())
    }

    pub fn probe_with(&self, settings: ProbeSettings) -> Probe {
        Probe::new(
            settings,
            Arc::new(LocalFileSystem),
            Arc::new(PathResolver::with_search_path(self.bin_dir().into_os_string())),
            Arc::new(SubprocessClientRunner::new()),
            Arc::new(SystemTimeProvider),
        )
    }
}

pub fn write_script(path: &Path, body: &str) {
    std::fs::write(path, format!("#!/bin/sh\n{}", body)).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}
