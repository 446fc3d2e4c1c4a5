use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{self as sdk, Resource};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "info,sqlx=warn,tower_http=info";
const DEFAULT_LOG_DIR: &str = "logs";

/// Configuration for tracing initialization.
#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    pub env_filter: Option<String>,
    /// Directory for a per-run log file. `None` keeps output on stdout only.
    pub log_dir: Option<PathBuf>,
    pub otlp_endpoint: Option<String>,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "directory-server",
            env_filter: None,
            log_dir: Some(PathBuf::from(DEFAULT_LOG_DIR)),
            otlp_endpoint: None,
        }
    }
}

impl ObsConfig {
    /// Defaults overridden by `LOG_DIR` (empty disables the file) and
    /// `OTLP_ENDPOINT`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("LOG_DIR") {
            config.log_dir = if dir.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(dir))
            };
        }
        config.otlp_endpoint = std::env::var("OTLP_ENDPOINT")
            .ok()
            .filter(|endpoint| !endpoint.trim().is_empty());
        config
    }
}

/// Install tracing subscribers: stdout, an optional log file, and an
/// optional OTLP exporter.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let filter = config
        .env_filter
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());

    let env_filter = EnvFilter::try_new(filter)?;
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    let file_layer = match config.log_dir.as_deref() {
        Some(dir) => {
            let appender = log_file_appender(dir, Utc::now())?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(appender),
            )
        }
        None => None,
    };

    let otel_layer = match config.otlp_endpoint {
        Some(endpoint) => {
            let exporter = SpanExporter::builder()
                .with_http()
                .with_protocol(Protocol::HttpBinary)
                .with_endpoint(endpoint)
                .build()?;

            let resource = Resource::builder()
                .with_service_name(config.service_name)
                .build();

            let provider = sdk::trace::SdkTracerProvider::builder()
                .with_resource(resource)
                .with_batch_exporter(exporter)
                .build();
            let tracer = provider.tracer(config.service_name);
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(file_layer)
        .with(otel_layer)
        .try_init()?;

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    Ok(())
}

fn log_file_stem(started_at: DateTime<Utc>) -> String {
    started_at.format("%Y%m%d%H%M%S").to_string()
}

/// One file per process run, named after its start time. Never rotated.
fn log_file_appender(dir: &Path, started_at: DateTime<Utc>) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(log_file_stem(started_at))
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("failed to open log file in {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::TimeZone;

    use super::*;

    #[test]
    fn log_files_are_named_after_start_time() {
        let started = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(log_file_stem(started), "20240309070501");
    }

    #[test]
    fn appender_creates_the_directory_and_run_file() {
        let dir = std::env::temp_dir()
            .join(format!("obs-test-{}", std::process::id()))
            .join("nested");
        let started = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut appender = log_file_appender(&dir, started).unwrap();
        writeln!(appender, "hello").unwrap();
        appender.flush().unwrap();
        let written = std::fs::read_to_string(dir.join("20240101000000.log")).unwrap();
        assert_eq!(written, "hello\n");
        std::fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }
}
