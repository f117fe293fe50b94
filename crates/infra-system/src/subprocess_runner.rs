// Client subprocess runner
// reason: tokio for async process management, nix for SIGTERM before SIGKILL
use async_trait::async_trait;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use healthcheck_core::port::client_runner::{
    ClientInvocation, ClientOutput, ClientRunner, RunError,
};

/// Everything collected from a child that ran to completion
struct Exchange {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    stdin_error: Option<io::Error>,
}

/// Spawns the client with piped stdin/stdout/stderr and waits for it
///
/// When the invocation carries a timeout and the client overruns it, the
/// client gets SIGTERM, then SIGKILL after the grace period.
#[derive(Default)]
pub struct SubprocessClientRunner;

impl SubprocessClientRunner {
    pub fn new() -> Self {
        Self
    }

    fn spawn(&self, invocation: &ClientInvocation) -> Result<Child, RunError> {
        Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RunError::SpawnFailed(e.to_string()))
    }

    /// Feed stdin, then close it and drain both output pipes until exit
    async fn exchange(child: &mut Child, input: &[u8]) -> io::Result<Exchange> {
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (stdin_error, status, stdout, stderr) = tokio::join!(
            write_input(stdin, input),
            child.wait(),
            read_pipe(stdout),
            read_pipe(stderr),
        );

        Ok(Exchange {
            status: status?,
            stdout: stdout?,
            stderr: stderr?,
            stdin_error,
        })
    }

    /// Kill process with SIGTERM first, then SIGKILL if needed
    async fn terminate(&self, child: &mut Child, grace_period: Duration) {
        let Some(pid) = child.id() else {
            // Already reaped
            return;
        };

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            info!(pid = %pid, "Sending SIGTERM for graceful shutdown");
            if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                warn!(pid = %pid, error = %e, "SIGTERM failed");
            }

            if timeout(grace_period, child.wait()).await.is_ok() {
                info!(pid = %pid, "Process exited gracefully after SIGTERM");
                return;
            }

            warn!(pid = %pid, "Process did not exit after SIGTERM, sending SIGKILL");
        }

        #[cfg(not(unix))]
        let _ = grace_period;

        if let Err(e) = child.kill().await {
            warn!(pid = %pid, error = %e, "SIGKILL failed");
        }
    }
}

/// Write the query and close stdin
///
/// A client may exit without reading its input; the closed pipe is not an
/// error, the exit code and output decide the outcome.
async fn write_input(stdin: Option<ChildStdin>, input: &[u8]) -> Option<io::Error> {
    let mut stdin = stdin?;
    let written = match stdin.write_all(input).await {
        // Dropping the handle closes the pipe and signals end-of-input
        Ok(()) => stdin.shutdown().await,
        Err(e) => Err(e),
    };

    match written {
        Ok(()) => None,
        Err(e) if is_closed_pipe(&e) => {
            debug!(error = %e, "Client closed stdin before reading the query");
            None
        }
        Err(e) => Some(e),
    }
}

fn is_closed_pipe(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset
    )
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Exit code, or `-N` for a process killed by signal N
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}

#[async_trait]
impl ClientRunner for SubprocessClientRunner {
    async fn run(&self, invocation: &ClientInvocation) -> Result<ClientOutput, RunError> {
        debug!(
            program = %invocation.program.display(),
            args = ?invocation.args,
            timeout = ?invocation.timeout,
            "Starting client"
        );

        let mut child = self.spawn(invocation)?;
        let input = invocation.input.as_bytes();

        let result = match invocation.timeout {
            Some(limit) => {
                let finished = timeout(limit, Self::exchange(&mut child, input)).await;
                match finished {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(
                            program = %invocation.program.display(),
                            timeout = ?limit,
                            "Client did not exit in time"
                        );
                        self.terminate(&mut child, invocation.grace_period).await;
                        return Err(RunError::Timeout(limit));
                    }
                }
            }
            None => Self::exchange(&mut child, input).await,
        };
        let exchange = result.map_err(|e| RunError::IoError(e.to_string()))?;

        let exit_code = exit_code(exchange.status);

        if let Some(e) = &exchange.stdin_error {
            debug!(error = %e, "Writing client stdin failed");
        }

        debug!(
            program = %invocation.program.display(),
            exit_code = %exit_code,
            stdout_bytes = exchange.stdout.len(),
            stderr_bytes = exchange.stderr.len(),
            "Client finished"
        );

        Ok(ClientOutput {
            exit_code,
            stdout: exchange.stdout,
            stderr: exchange.stderr,
            stdin_error: exchange.stdin_error.map(|e| e.to_string()),
        })
    }
}
