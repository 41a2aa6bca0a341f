//! Telemetry bootstrap for binaries embedding the quire editor crates.
//!
//! Provides:
//! - Prometheus metrics recorder (render with [`render`])
//! - Tracing with compact console output
//!
//! # Usage
//!
//! ```ignore
//! use quire_common::telemetry::{self, TelemetryConfig};
//!
//! fn main() {
//!     telemetry::init(TelemetryConfig::from_env("quire-editor"));
//!
//!     // the library crates emit `metrics` counters and `tracing` events
//!     tracing::info!("editor shell started");
//!     println!("{}", telemetry::render());
//! }
//! ```

use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name for labeling log lines
    pub service_name: String,
    /// Console log level (default: INFO, DEBUG in debug builds)
    pub console_level: Level,
}

impl TelemetryConfig {
    /// Load config from the environment.
    ///
    /// `RUST_LOG` is honored at [`init`] time and overrides `console_level`.
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        Self {
            service_name: service_name.into(),
            console_level,
        }
    }
}

/// Initialize metrics + tracing.
///
/// Safe to call more than once; later calls leave the first subscriber and
/// recorder in place.
pub fn init(config: TelemetryConfig) {
    init_metrics();
    init_tracing(&config);
}

/// Install the prometheus recorder, or return the one already installed.
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Some(handle);
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(PROMETHEUS_HANDLE.get_or_init(|| handle)),
        Err(e) => {
            tracing::warn!(error = %e, "failed to install prometheus recorder");
            None
        }
    }
}

fn init_tracing(config: &TelemetryConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.console_level.as_str().to_lowercase()));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_filter(env_filter);

    match tracing_subscriber::registry().with(console_layer).try_init() {
        Ok(()) => tracing::debug!(service = %config.service_name, "telemetry initialized"),
        Err(e) => tracing::debug!(error = %e, "tracing subscriber already set"),
    }
}

/// Render metrics in prometheus text format. Empty until [`init`] has run.
pub fn render() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}
