//! Order-book-imbalance market maker - replay entry point.

use anyhow::Result;
use clap::Parser;
use obi_bot::{AppConfig, Application};
use obi_telemetry::{init_logging, LogTarget};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Replay recorded top-of-book data through the imbalance strategy.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via OBI_CONFIG env var)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tick data file, overrides `data_path`
    #[arg(long)]
    path: Option<PathBuf>,

    /// Instrument symbol, overrides `instrument`
    #[arg(long)]
    instrument: Option<String>,

    /// Process name; logs go to `<process>.out`
    #[arg(short, long)]
    process: String,

    /// Log to stdout instead of the process log file
    #[arg(short, long)]
    stdout: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&LogTarget::for_process(&args.process, args.stdout))?;
    info!("Starting obi-bot v{}", env!("CARGO_PKG_VERSION"));

    // CLI arg > OBI_CONFIG env var > default
    let explicit = args
        .config
        .clone()
        .or_else(|| std::env::var_os("OBI_CONFIG").map(PathBuf::from));

    let mut config = match explicit {
        Some(path) => {
            info!(config_path = %path.display(), "Loading configuration");
            AppConfig::from_file(&path)?
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            info!(config_path = DEFAULT_CONFIG_PATH, "Loading configuration");
            AppConfig::from_file(DEFAULT_CONFIG_PATH)?
        }
        None => {
            warn!(config_path = DEFAULT_CONFIG_PATH, "Config file not found, using defaults");
            AppConfig::default()
        }
    };

    if let Some(path) = args.path {
        config.data_path = Some(path);
    }
    if let Some(instrument) = args.instrument {
        config.instrument = instrument;
    }

    let app = Application::new(config)?;
    match app.run() {
        Ok(summary) => {
            info!(?summary, "Done");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            Err(e.into())
        }
    }
}
