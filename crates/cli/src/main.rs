//! edb-healthcheck - liveness probe for a local EdgeDB server
//!
//! Exits 0 when the server answers `SELECT 1;` over its admin socket,
//! 1 when any check fails, 2 on invalid command line or configuration.

mod logging;
mod settings;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

use healthcheck_core::domain::ProbeSettings;
use healthcheck_core::port::time_provider::SystemTimeProvider;
use healthcheck_core::Probe;
use healthcheck_infra_system::{LocalFileSystem, PathResolver, SubprocessClientRunner};

const EXIT_INVALID_CONFIG: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Silent on success, message on stderr on failure
    Text,
    /// JSON report on stdout for every outcome
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "edb-healthcheck")]
#[command(about = "Liveness probe for a local EdgeDB server", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// TOML file with probe settings
    #[arg(long, env = "EDB_HEALTHCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Server runtime directory (default: /run/edgedb)
    #[arg(long)]
    runtime_dir: Option<PathBuf>,

    /// Admin socket path; derived from the runtime directory when omitted
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Instance name in the admin socket filename (default: EDGEDB)
    #[arg(long)]
    instance: Option<String>,

    /// Port in the admin socket filename (default: 5656)
    #[arg(long)]
    port: Option<u16>,

    /// Client executable looked up on PATH (default: edgedb)
    #[arg(long)]
    client: Option<String>,

    /// Seconds to wait for the client, 0 to wait forever (default: 30)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn build_probe(settings: ProbeSettings) -> Probe {
    Probe::new(
        settings,
        Arc::new(LocalFileSystem),
        Arc::new(PathResolver::from_env()),
        Arc::new(SubprocessClientRunner::new()),
        Arc::new(SystemTimeProvider),
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging() {
        eprintln!("Failed to initialize logging: {:#}", e);
    }

    let settings = match settings::load(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid configuration: {:#}", e);
            return ExitCode::from(EXIT_INVALID_CONFIG);
        }
    };

    debug!(
        runtime_dir = %settings.runtime_dir.display(),
        socket = %settings.admin_socket_path().display(),
        client = %settings.client,
        timeout = ?settings.timeout,
        "Probe configured"
    );

    let probe = build_probe(settings);

    match cli.format {
        OutputFormat::Text => match probe.run_healthcheck().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        OutputFormat::Json => {
            let report = probe.run().await;
            match report.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to serialize report: {}", e),
            }
            if report.healthy {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
