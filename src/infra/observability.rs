//! Logging and Prometheus metrics setup.
//!
//! Production logs are JSON lines; other environments get a human-readable
//! format. `RUST_LOG` takes precedence over `LOG_LEVEL` when set.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{AppConfig, Environment, LogLevel};

/// Prometheus handle for on-demand scrape output (GET /metrics).
pub type PrometheusHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Builds the filter for the configured level, unless `RUST_LOG` is set.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter_directive()))
}

/// Installs the global tracing subscriber.
///
/// Returns `false` when a subscriber was already installed (tests, repeated
/// calls), which is not an error.
pub fn init_tracing(config: &AppConfig) -> bool {
    let registry = tracing_subscriber::registry().with(env_filter(config.log_level));
    let result = match config.environment {
        Environment::Production => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
        Environment::Development | Environment::Test => {
            registry.with(fmt::layer().with_target(false)).try_init()
        }
    };
    result.is_ok()
}

/// Install the global metrics recorder and return a handle for rendering.
///
/// # Errors
/// Returns an error if a recorder is already installed or building fails.
pub fn init_metrics() -> Result<PrometheusHandle, metrics_exporter_prometheus::BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

/// Convenience to wrap the handle in Arc for shared use in app state.
#[must_use]
pub fn init_metrics_handle() -> Option<Arc<PrometheusHandle>> {
    init_metrics().ok().map(Arc::new)
}
