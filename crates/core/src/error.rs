// Central Error Type for the Probe

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::domain::CapturedOutput;

/// Failure classification reported to the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// Runtime directory or admin socket absent or of the wrong type
    EnvironmentMissing,
    /// Client executable not found on the search path
    DependencyMissing,
    /// Client could not be run to completion or exited non-zero
    ClientError,
    /// Client exited cleanly but printed something other than the expected row
    UnexpectedResult,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::EnvironmentMissing => "EnvironmentMissing",
            FailureKind::DependencyMissing => "DependencyMissing",
            FailureKind::ClientError => "ClientError",
            FailureKind::UnexpectedResult => "UnexpectedResult",
        };
        f.write_str(name)
    }
}

/// Probe failure
///
/// Every variant is terminal: the probe stops at the first one raised.
/// Use [`HealthcheckError::kind`] to get the coarse classification.
#[derive(Error, Debug)]
pub enum HealthcheckError {
    #[error("{} does not exist", .0.display())]
    RuntimeDirMissing(PathBuf),

    #[error("Socket {} not present", .0.display())]
    SocketMissing(PathBuf),

    #[error("Missing `{0}` client executable")]
    DependencyMissing(String),

    #[error("`{tool}` returned with code {code}:{output}")]
    ClientFailed {
        tool: String,
        code: i32,
        output: CapturedOutput,
    },

    #[error("`{tool}` did not exit within {timeout:?}")]
    ClientTimeout { tool: String, timeout: Duration },

    #[error("Failed to run `{tool}`: {reason}")]
    ClientIo { tool: String, reason: String },

    #[error("`{tool}` returned unexpected result:{output}")]
    UnexpectedResult { tool: String, output: CapturedOutput },
}

impl HealthcheckError {
    pub fn kind(&self) -> FailureKind {
        match self {
            HealthcheckError::RuntimeDirMissing(_) | HealthcheckError::SocketMissing(_) => {
                FailureKind::EnvironmentMissing
            }
            HealthcheckError::DependencyMissing(_) => FailureKind::DependencyMissing,
            HealthcheckError::ClientFailed { .. }
            | HealthcheckError::ClientTimeout { .. }
            | HealthcheckError::ClientIo { .. } => FailureKind::ClientError,
            HealthcheckError::UnexpectedResult { .. } => FailureKind::UnexpectedResult,
        }
    }
}

/// Result type alias using HealthcheckError
pub type Result<T> = std::result::Result<T, HealthcheckError>;
