// Captured client output

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("{stream} is not valid UTF-8: {reason}")]
pub struct DecodeError {
    pub stream: &'static str,
    pub reason: String,
}

/// Decoded and trimmed stdout/stderr of one client run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn new(stdout: &str, stderr: &str) -> Self {
        Self {
            stdout: stdout.trim().to_string(),
            stderr: stderr.trim().to_string(),
        }
    }

    /// Decode raw pipe contents, rejecting invalid UTF-8 instead of replacing it
    pub fn decode(stdout: &[u8], stderr: &[u8]) -> Result<Self, DecodeError> {
        let stdout = std::str::from_utf8(stdout).map_err(|e| DecodeError {
            stream: "stdout",
            reason: e.to_string(),
        })?;
        let stderr = std::str::from_utf8(stderr).map_err(|e| DecodeError {
            stream: "stderr",
            reason: e.to_string(),
        })?;

        Ok(Self::new(stdout, stderr))
    }
}

/// Renders as a suffix for error messages: `\n<stderr>` then `\n<stdout>`,
/// each only when non-empty.
impl fmt::Display for CapturedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.stderr.is_empty() {
            write!(f, "\n{}", self.stderr)?;
        }
        if !self.stdout.is_empty() {
            write!(f, "\n{}", self.stdout)?;
        }
        Ok(())
    }
}
