//! Structured logging initialization.

use crate::error::{TelemetryError, TelemetryResult};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    /// Appended to, created if missing.
    File(PathBuf),
}

impl LogTarget {
    /// Stdout when requested, otherwise `<process>.out` in the working directory.
    pub fn for_process(process: &str, stdout: bool) -> Self {
        if stdout {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(format!("{process}.out")))
        }
    }
}

/// Initialize structured logging.
///
/// `RUST_LOG` overrides the default `info,obi=debug` filter.
/// `RUST_ENV=production` switches to JSON lines.
pub fn init_logging(target: &LogTarget) -> TelemetryResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,obi=debug"));

    let is_production = std::env::var("RUST_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    let (writer, ansi) = match target {
        LogTarget::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
    };

    let result = if is_production {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(writer),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init()
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    tracing::debug!(?target, json = is_production, "Logging initialized");
    Ok(())
}
