//! Logging setup for the huddle binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the huddle crates and the binary itself. `RUST_LOG`
/// overrides it entirely when set.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "huddle_server", "huddle_client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use huddle_shared::logger::setup_logger;
///
/// setup_logger("huddle_server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    ["huddle_shared", "huddle_server", "huddle_client"]
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .chain(std::iter::once(format!(
            "{}={}",
            binary_target, default_log_level
        )))
        .chain(std::iter::once(format!("tower_http={}", default_log_level)))
        .collect::<Vec<_>>()
        .join(",")
}
