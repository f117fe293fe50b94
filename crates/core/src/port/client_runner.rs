// Client Runner Port
// Abstraction for running the database client once and capturing its output

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// One client run: program, arguments and stdin contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub input: String,
    /// `None` waits forever
    pub timeout: Option<Duration>,
    /// Delay between SIGTERM and SIGKILL once the timeout fires
    pub grace_period: Duration,
}

/// Raw result of a finished client run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOutput {
    /// Exit code; `-N` when terminated by signal N
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Failure writing stdin, reported after the process was reaped
    pub stdin_error: Option<String>,
}

impl ClientOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Client run errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process timeout after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Client Runner trait
///
/// Implementations:
/// - SubprocessClientRunner: spawns the real client binary
/// - MockClientRunner: canned output for tests
#[async_trait]
pub trait ClientRunner: Send + Sync {
    /// Run the client to completion
    ///
    /// # Errors
    /// - RunError::SpawnFailed if the process cannot be started
    /// - RunError::Timeout if the process outlives `invocation.timeout`
    /// - RunError::IoError if its output cannot be collected
    async fn run(&self, invocation: &ClientInvocation) -> Result<ClientOutput, RunError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit with code, stdout, stderr
        Exit {
            code: i32,
            stdout: String,
            stderr: String,
        },
        /// Return the raw output as-is
        Raw(ClientOutput),
        /// Fail with the given error
        Fail(RunError),
    }

    /// Mock Client Runner for testing
    pub struct MockClientRunner {
        behavior: Arc<Mutex<MockBehavior>>,
        invocations: Arc<Mutex<Vec<ClientInvocation>>>,
    }

    impl MockClientRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                invocations: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_exit(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
            Self::new(MockBehavior::Exit {
                code,
                stdout: stdout.into(),
                stderr: stderr.into(),
            })
        }

        pub fn new_healthy() -> Self {
            Self::new_exit(0, "1\n", "")
        }

        pub fn new_fail(error: RunError) -> Self {
            Self::new(MockBehavior::Fail(error))
        }

        pub fn call_count(&self) -> usize {
            self.invocations.lock().unwrap().len()
        }

        pub fn last_invocation(&self) -> Option<ClientInvocation> {
            self.invocations.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl ClientRunner for MockClientRunner {
        async fn run(&self, invocation: &ClientInvocation) -> Result<ClientOutput, RunError> {
            self.invocations.lock().unwrap().push(invocation.clone());

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Exit {
                    code,
                    stdout,
                    stderr,
                } => Ok(ClientOutput {
                    exit_code: code,
                    stdout: stdout.into_bytes(),
                    stderr: stderr.into_bytes(),
                    stdin_error: None,
                }),
                MockBehavior::Raw(output) => Ok(output),
                MockBehavior::Fail(error) => Err(error),
            }
        }
    }
}
