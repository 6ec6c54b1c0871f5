//! Daemon settings
//!
//! Layered: built-in defaults, then an optional TOML file, then `CLINICQ_*`
//! environment variables.
//!
//! # Environment Variables
//!
//! - `CLINICQ_CONFIG`: config file path (default: `<config dir>/clinicq/config.toml`)
//! - `CLINICQ_RPC_HOST` / `CLINICQ_RPC_PORT`
//! - `CLINICQ_DEFAULT_AVERAGE_WAIT_MINUTES`
//! - `CLINICQ_DEPARTMENTS`: comma-separated departments created at startup
//! - `CLINICQ_STRICT_DEPARTMENTS`: reject check-in for unknown departments
//! - `CLINICQ_LOG_FORMAT`: `pretty` | `json`
//! - `CLINICQ_LOG_DIR`: also write daily-rotated JSON logs there

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

const ENV_PREFIX: &str = "CLINICQ";
const CONFIG_PATH_VAR: &str = "CLINICQ_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    pub rpc_host: String,
    pub rpc_port: u16,
    pub default_average_wait_minutes: u32,
    pub departments: Vec<String>,
    pub strict_departments: bool,
    pub log_format: LogFormat,
    pub log_dir: Option<String>,
}

impl DaemonConfig {
    /// Load from the default file location and the process environment
    pub fn load() -> Result<Self> {
        Self::build(config_path(), Environment::with_prefix(ENV_PREFIX))
    }

    fn build(file: Option<PathBuf>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("rpc_host", "127.0.0.1")?
            .set_default("rpc_port", 9630_i64)?
            .set_default("default_average_wait_minutes", 15_i64)?
            .set_default("departments", Vec::<String>::new())?
            .set_default("strict_departments", false)?
            .set_default("log_format", "pretty")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }

        let cfg: DaemonConfig = builder
            .add_source(
                env.try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("departments"),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.default_average_wait_minutes == 0 {
            bail!("default_average_wait_minutes must be positive");
        }
        if self.strict_departments && self.departments.is_empty() {
            bail!("strict_departments requires at least one entry in departments");
        }
        Ok(())
    }
}

/// `CLINICQ_CONFIG` (tilde-expanded), else the platform config dir
fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        return Some(PathBuf::from(shellexpand::tilde(&path).into_owned()));
    }

    directories::ProjectDirs::from("", "", "clinicq")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
