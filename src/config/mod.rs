mod file_config;

pub use file_config::FileConfig;

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub static_dir: Option<String>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub static_dir: Option<String>,
    /// Plain-text copy of the server log, appended to across restarts.
    pub log_file: Option<PathBuf>,
}

fn require_parent_dir(label: &str, path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            bail!("{} directory does not exist: {:?}", label, parent);
        }
    }
    Ok(())
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        if db_path.is_dir() {
            bail!("db_path points to a directory: {:?}", db_path);
        }
        require_parent_dir("Database", &db_path)?;

        let port = file.port.unwrap_or(cli.port);

        let logging_level = match file.logging_level {
            Some(s) => match parse_logging_level(&s) {
                Some(level) => level,
                None => bail!("Unknown logging_level in config file: {}", s),
            },
            None => cli.logging_level.clone(),
        };

        let static_dir = file.static_dir.or_else(|| cli.static_dir.clone());
        if let Some(dir) = &static_dir {
            if !PathBuf::from(dir).is_dir() {
                bail!("static_dir is not a directory: {:?}", dir);
            }
        }

        let log_file = file
            .log_file
            .map(PathBuf::from)
            .or_else(|| cli.log_file.clone());
        if let Some(path) = &log_file {
            if path.is_dir() {
                bail!("log_file points to a directory: {:?}", path);
            }
            require_parent_dir("Log file", path)?;
        }

        Ok(Self {
            db_path,
            port,
            logging_level,
            static_dir,
            log_file,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
