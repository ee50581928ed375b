//! Logging setup for the buzzer binaries

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Builds the filter used when `RUST_LOG` is not set
///
/// Both the library and the calling binary log at `default_level`.
fn default_filter(binary_name: &str, default_level: &str) -> String {
    format!(
        "{}={default_level},{}={default_level}",
        env!("CARGO_PKG_NAME").replace('-', "_"),
        binary_name.replace('-', "_"),
    )
}

/// Installs a formatting tracing subscriber
///
/// The level can be overridden with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - Name of the binary, e.g. `buzzer-replay`
/// * `default_level` - Level used when `RUST_LOG` is not set, e.g. `info`
pub fn setup_logger(binary_name: &str, default_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
