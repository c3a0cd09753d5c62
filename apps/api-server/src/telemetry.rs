//! Diagnostic tracing. Audit records reach the console through the `audit` target,
//! so `RUST_LOG=audit=off` silences them without touching the audit file or store.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVES: &str = "info,api_server=debug,inkwell_infra=debug,audit=info";

#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// `LOG_FORMAT=json`: one JSON object per event instead of pretty output.
    pub json_logs: bool,
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        Self {
            json_logs: std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")),
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default directives.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let output = if config.json_logs {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().pretty().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(output)
        .try_init()?;

    tracing::info!(json_logs = config.json_logs, "Telemetry initialized");
    Ok(())
}
