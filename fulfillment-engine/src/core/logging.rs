//! Tracing setup
//!
//! Console logging with an env-filter override (`RUST_LOG`). Production
//! deployments pass `json_format = true` for machine-readable output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber
///
/// `level` is the default filter when `RUST_LOG` is unset. Calling this
/// twice returns an error from the subscriber registry.
pub fn init_logging(level: &str, json_format: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json_format {
        let console_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true);
        registry.with(console_layer).try_init()?;
    } else {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        registry.with(console_layer).try_init()?;
    }

    tracing::info!(level, json_format, "Logging initialized");
    Ok(())
}
