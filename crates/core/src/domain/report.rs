// Probe Report (machine-readable outcome)

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{FailureKind, HealthcheckError};

/// Outcome of one probe run
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub duration_ms: i64,
    pub checked_at: DateTime<Utc>,
}

impl ProbeReport {
    pub fn healthy(checked_at: DateTime<Utc>, duration_ms: i64) -> Self {
        Self {
            healthy: true,
            kind: None,
            message: None,
            duration_ms,
            checked_at,
        }
    }

    pub fn failed(error: &HealthcheckError, checked_at: DateTime<Utc>, duration_ms: i64) -> Self {
        Self {
            healthy: false,
            kind: Some(error.kind()),
            message: Some(error.to_string()),
            duration_ms,
            checked_at,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
