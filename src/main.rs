use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry::Registry, util::SubscriberInitExt, EnvFilter, Layer,
};

use booking_directory_server::clock::SystemClock;
use booking_directory_server::config::{AppConfig, CliConfig, FileConfig};
use booking_directory_server::directory_store::{DirectoryStore, SqliteDirectoryStore};
use booking_directory_server::server::{run_server, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite directory database file. Created if missing.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Directory served under /static.
    #[clap(long)]
    pub static_dir: Option<String>,

    /// Also append the server log, without colors, to this file.
    #[clap(long, value_parser = parse_path)]
    pub log_file: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            static_dir: self.static_dir.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

/// A plain-text log sink at INFO and above, appending to `path`.
fn log_file_layer(path: &Path) -> Result<Box<dyn Layer<Registry> + Send + Sync>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;
    Ok(fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(LevelFilter::INFO)
        .boxed())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let log_file = match &app_config.log_file {
        Some(path) => Some(log_file_layer(path)?),
        None => None,
    };

    tracing_subscriber::registry()
        .with(log_file)
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    if let Some(path) = &cli_args.config {
        info!("Loaded config file {:?}", path);
    }
    if let Some(path) = &app_config.log_file {
        info!("Writing log to {:?}", path);
    }

    info!("Opening SQLite directory database at {:?}...", app_config.db_path);
    let store = Arc::new(SqliteDirectoryStore::new(&app_config.db_path)?);
    info!(
        "Directory has {} venues, {} artists and {} shows",
        store.venues_count()?,
        store.artists_count()?,
        store.shows_count()?
    );

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level,
        port: app_config.port,
        static_dir: app_config.static_dir,
    };

    info!("Ready to serve at port {}!", server_config.port);
    run_server(server_config, store, Arc::new(SystemClock)).await
}
