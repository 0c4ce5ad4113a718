use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Directive variable that overrides `--log-level`, e.g.
/// `LORACODEC_LOG=loracodec_schema=debug,warn`.
pub const LOG_FILTER_ENV: &str = "LORACODEC_LOG";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Per-crate directives from [`LOG_FILTER_ENV`] win; otherwise every target
/// logs at `level`.
fn build_filter(directives: Option<&str>, level: LogLevel) -> EnvFilter {
    directives
        .filter(|text| !text.trim().is_empty())
        .and_then(|text| EnvFilter::try_new(text).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_directive()))
}

/// Install the stderr subscriber. Stdout carries only command output.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let directives = std::env::var(LOG_FILTER_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(build_filter(directives.as_deref(), level))
        .with_ansi(false)
        .with_target(true);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
