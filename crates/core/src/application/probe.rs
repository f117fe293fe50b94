// Liveness probe use case
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::constants::{EXPECTED_RESULT, HEALTH_QUERY};
use crate::domain::{CapturedOutput, ProbeReport, ProbeSettings};
use crate::error::{HealthcheckError, Result};
use crate::port::{
    ClientInvocation, ClientOutput, ClientRunner, EntryKind, ExecutableResolver,
    FileSystemInspector, RunError, TimeProvider,
};

/// Liveness probe against the local server's admin socket
///
/// Checks, in order, stopping at the first failure:
/// 1. runtime directory is a directory
/// 2. admin socket is a Unix socket
/// 3. client executable is on the search path
/// 4. client exits 0 after `SELECT 1;`
/// 5. client printed exactly `1`
pub struct Probe {
    settings: ProbeSettings,
    filesystem: Arc<dyn FileSystemInspector>,
    resolver: Arc<dyn ExecutableResolver>,
    runner: Arc<dyn ClientRunner>,
    time_provider: Arc<dyn TimeProvider>,
}

impl Probe {
    /// Create a new probe
    ///
    /// # Example
    /// ```ignore
    /// let probe = Probe::new(
    ///     ProbeSettings::default(),
    ///     Arc::new(LocalFileSystem),
    ///     Arc::new(PathResolver::from_env()),
    ///     Arc::new(SubprocessClientRunner::new()),
    ///     Arc::new(SystemTimeProvider),
    /// );
    /// probe.run_healthcheck().await?;
    /// ```
    pub fn new(
        settings: ProbeSettings,
        filesystem: Arc<dyn FileSystemInspector>,
        resolver: Arc<dyn ExecutableResolver>,
        runner: Arc<dyn ClientRunner>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            settings,
            filesystem,
            resolver,
            runner,
            time_provider,
        }
    }

    /// Run every check; `Ok(())` means the server is alive
    pub async fn run_healthcheck(&self) -> Result<()> {
        self.check_runtime_dir().await?;
        self.check_admin_socket().await?;
        let client = self.resolve_client()?;
        let output = self.query(&client).await?;
        self.verify_result(output)
    }

    /// Run the probe and summarize the outcome with timing
    pub async fn run(&self) -> ProbeReport {
        let checked_at = self.time_provider.now();
        let start = self.time_provider.now_millis();

        let result = self.run_healthcheck().await;
        let duration_ms = self.time_provider.now_millis() - start;

        match result {
            Ok(()) => {
                info!(duration_ms = %duration_ms, "Healthcheck passed");
                ProbeReport::healthy(checked_at, duration_ms)
            }
            Err(e) => {
                info!(
                    kind = %e.kind(),
                    duration_ms = %duration_ms,
                    error = %e,
                    "Healthcheck failed"
                );
                ProbeReport::failed(&e, checked_at, duration_ms)
            }
        }
    }

    async fn check_runtime_dir(&self) -> Result<()> {
        let dir = &self.settings.runtime_dir;
        let kind = self.filesystem.entry_kind(dir).await;
        debug!(path = %dir.display(), kind = ?kind, "Checked runtime directory");

        if kind != EntryKind::Directory {
            return Err(HealthcheckError::RuntimeDirMissing(dir.clone()));
        }
        Ok(())
    }

    async fn check_admin_socket(&self) -> Result<()> {
        let socket = self.settings.admin_socket_path();
        let kind = self.filesystem.entry_kind(&socket).await;
        debug!(path = %socket.display(), kind = ?kind, "Checked admin socket");

        if kind != EntryKind::Socket {
            return Err(HealthcheckError::SocketMissing(socket));
        }
        Ok(())
    }

    fn resolve_client(&self) -> Result<PathBuf> {
        let name = &self.settings.client;
        let resolved = self.resolver.resolve(name);
        debug!(client = %name, resolved = ?resolved, "Resolved client executable");

        resolved.ok_or_else(|| HealthcheckError::DependencyMissing(name.clone()))
    }

    async fn query(&self, client: &Path) -> Result<ClientOutput> {
        let invocation = ClientInvocation {
            program: client.to_path_buf(),
            args: self.settings.client_args(),
            input: HEALTH_QUERY.to_string(),
            timeout: self.settings.timeout,
            grace_period: self.settings.grace_period,
        };

        self.runner
            .run(&invocation)
            .await
            .map_err(|e| self.client_error(e))
    }

    fn verify_result(&self, output: ClientOutput) -> Result<()> {
        let tool = self.settings.client.clone();
        let captured = CapturedOutput::decode(&output.stdout, &output.stderr).map_err(|e| {
            HealthcheckError::ClientIo {
                tool: tool.clone(),
                reason: e.to_string(),
            }
        })?;

        if !output.success() {
            return Err(HealthcheckError::ClientFailed {
                tool,
                code: output.exit_code,
                output: captured,
            });
        }

        // Only matters when the client still claimed success
        if let Some(reason) = output.stdin_error {
            return Err(HealthcheckError::ClientIo {
                tool,
                reason: format!("failed to write query: {}", reason),
            });
        }

        if captured.stdout != EXPECTED_RESULT {
            return Err(HealthcheckError::UnexpectedResult {
                tool,
                output: captured,
            });
        }

        Ok(())
    }

    fn client_error(&self, error: RunError) -> HealthcheckError {
        let tool = self.settings.client.clone();
        match error {
            RunError::Timeout(timeout) => HealthcheckError::ClientTimeout { tool, timeout },
            RunError::SpawnFailed(reason) | RunError::IoError(reason) => {
                HealthcheckError::ClientIo { tool, reason }
            }
        }
    }
}
