//! Logging setup
//!
//! Logs go to stderr so stdout stays reserved for the JSON report.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (default: `healthcheck=warn`)
//! - `EDB_HEALTHCHECK_LOG_FORMAT`: `pretty` (default) or `json`

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "healthcheck=warn";

pub fn init_logging() -> Result<()> {
    let log_format =
        std::env::var("EDB_HEALTHCHECK_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
