//! Logging setup utilities for the Linecast binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose log output is enabled by default.
const WORKSPACE_CRATES: [&str; 3] = ["linecast_shared", "linecast_server", "linecast_client"];

/// Build the default filter directive for the workspace crates and the binary.
///
/// Binary names use hyphens while tracing targets use underscores, so the
/// binary name is normalized before it is added.
pub fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    WORKSPACE_CRATES
        .iter()
        .map(|krate| krate.to_string())
        .chain(std::iter::once(binary_name.replace('-', "_")))
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "linecast-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use linecast_shared::logger::setup_logger;
///
/// setup_logger("linecast-server", "debug");
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
