use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::client::ClientConfig;
use crate::config::settings::{LogFormat, LoggingConfig};

/// `--log-level` values; overrides the level from the config file.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Install the global subscriber for the CLI. Later calls are no-ops.
pub fn run(client_config: &ClientConfig, arg_log_level: Option<LogLevel>) {
    let mut cfg = client_config
        .logging
        .clone()
        .unwrap_or_else(|| LoggingConfig::new("info".to_owned(), LogFormat::from_env()));
    if let Some(level) = arg_log_level {
        cfg.level = LevelFilter::from(level).to_string();
    }
    init_logging(&cfg);
}

/// Logs go to stderr so response bodies on stdout stay machine-readable.
pub fn init_logging(cfg: &LoggingConfig) {
    let filter = EnvFilter::try_new(&cfg.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let json = cfg.format == LogFormat::Json;

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .flatten_event(true)
            .with_timer(UtcTime::rfc_3339())
            .with_writer(std::io::stderr)
    });
    let compact_layer = (!json).then(|| {
        fmt::layer()
            .compact()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(std::io::stderr)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(compact_layer)
        .try_init();
}
