//! Layered probe configuration
//!
//! Precedence, lowest to highest: built-in defaults, optional TOML file,
//! `EDB_HEALTHCHECK_*` environment variables, command-line flags.

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use healthcheck_core::domain::constants::{
    DEFAULT_ADMIN_PORT, DEFAULT_CLIENT, DEFAULT_GRACE_PERIOD, DEFAULT_INSTANCE,
    DEFAULT_RUNTIME_DIR, DEFAULT_TIMEOUT,
};
use healthcheck_core::domain::ProbeSettings;

use crate::Cli;

pub const ENV_PREFIX: &str = "EDB_HEALTHCHECK";

#[derive(Debug, Deserialize)]
struct RawSettings {
    runtime_dir: PathBuf,
    admin_socket: Option<PathBuf>,
    instance: String,
    admin_port: u16,
    client: String,
    /// 0 disables the bound
    timeout_secs: u64,
    grace_period_secs: u64,
}

impl From<RawSettings> for ProbeSettings {
    fn from(raw: RawSettings) -> Self {
        Self {
            runtime_dir: raw.runtime_dir,
            admin_socket: raw.admin_socket,
            instance: raw.instance,
            admin_port: raw.admin_port,
            client: raw.client,
            timeout: (raw.timeout_secs > 0).then(|| Duration::from_secs(raw.timeout_secs)),
            grace_period: Duration::from_secs(raw.grace_period_secs),
        }
    }
}

/// Load and validate settings from every layer
pub fn load(cli: &Cli) -> Result<ProbeSettings> {
    load_with_env(cli, Environment::with_prefix(ENV_PREFIX))
}

fn load_with_env(cli: &Cli, env: Environment) -> Result<ProbeSettings> {
    let mut builder = defaults()?;

    if let Some(path) = &cli.config {
        builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
    }

    let raw: RawSettings = overrides(builder.add_source(env.try_parsing(true)), cli)?
        .build()
        .context("Failed to load configuration")?
        .try_deserialize()
        .context("Failed to parse configuration")?;

    let settings = ProbeSettings::from(raw);
    settings.validate()?;
    Ok(settings)
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
    Ok(Config::builder()
        .set_default("runtime_dir", DEFAULT_RUNTIME_DIR)?
        .set_default("instance", DEFAULT_INSTANCE)?
        .set_default("admin_port", i64::from(DEFAULT_ADMIN_PORT))?
        .set_default("client", DEFAULT_CLIENT)?
        .set_default("timeout_secs", DEFAULT_TIMEOUT.as_secs() as i64)?
        .set_default("grace_period_secs", DEFAULT_GRACE_PERIOD.as_secs() as i64)?)
}

fn overrides(
    builder: ConfigBuilder<config::builder::DefaultState>,
    cli: &Cli,
) -> Result<ConfigBuilder<config::builder::DefaultState>> {
    let path_string = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());

    Ok(builder
        .set_override_option("runtime_dir", path_string(&cli.runtime_dir))?
        .set_override_option("admin_socket", path_string(&cli.socket))?
        .set_override_option("instance", cli.instance.clone())?
        .set_override_option("admin_port", cli.port.map(i64::from))?
        .set_override_option("client", cli.client.clone())?
        .set_override_option("timeout_secs", cli.timeout_secs.map(|s| s as i64))?)
}
