// Probe Settings

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use super::constants::{
    DEFAULT_ADMIN_PORT, DEFAULT_CLIENT, DEFAULT_GRACE_PERIOD, DEFAULT_INSTANCE,
    DEFAULT_RUNTIME_DIR, DEFAULT_TIMEOUT,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Where to look and what to run
///
/// Defaults match the server's standard container layout:
/// `/run/edgedb/.s.EDGEDB.admin.5656` probed with the `edgedb` client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub runtime_dir: PathBuf,
    /// Explicit socket path; derived from `runtime_dir`, `instance` and `admin_port` when unset
    pub admin_socket: Option<PathBuf>,
    pub instance: String,
    pub admin_port: u16,
    pub client: String,
    /// `None` waits for the client forever
    pub timeout: Option<Duration>,
    pub grace_period: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            runtime_dir: PathBuf::from(DEFAULT_RUNTIME_DIR),
            admin_socket: None,
            instance: DEFAULT_INSTANCE.to_string(),
            admin_port: DEFAULT_ADMIN_PORT,
            client: DEFAULT_CLIENT.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}

impl ProbeSettings {
    /// Admin socket path, `<runtime_dir>/.s.<instance>.admin.<port>` unless overridden
    pub fn admin_socket_path(&self) -> PathBuf {
        match &self.admin_socket {
            Some(path) => path.clone(),
            None => self
                .runtime_dir
                .join(format!(".s.{}.admin.{}", self.instance, self.admin_port)),
        }
    }

    /// Arguments passed to the client: admin mode over the admin socket
    pub fn client_args(&self) -> Vec<String> {
        vec![
            "--admin".to_string(),
            format!("--host={}", self.admin_socket_path().display()),
        ]
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.runtime_dir.as_os_str().is_empty() {
            return Err(SettingsError::ValidationError(
                "runtime directory cannot be empty".to_string(),
            ));
        }

        if self.client.trim().is_empty() {
            return Err(SettingsError::ValidationError(
                "client executable name cannot be empty".to_string(),
            ));
        }

        if self.client.contains('/') {
            return Err(SettingsError::ValidationError(format!(
                "client must be a bare executable name, got '{}'",
                self.client
            )));
        }

        if self.admin_socket.is_none() {
            if self.instance.is_empty() {
                return Err(SettingsError::ValidationError(
                    "instance name cannot be empty".to_string(),
                ));
            }
            if self.admin_port == 0 {
                return Err(SettingsError::ValidationError(
                    "admin port must be greater than zero".to_string(),
                ));
            }
        }

        Ok(())
    }
}
