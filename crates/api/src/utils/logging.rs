//! Tracing subscriber setup.
//!
//! The SDK only emits `tracing` events; installing a subscriber is left to
//! the application. [`init_tracing`] is a convenience for binaries and
//! demos that do not configure one themselves.

use tracing_subscriber::EnvFilter;

/// Output format for [`init_tracing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, one line per event.
    #[default]
    Pretty,
    /// One JSON object per event with fields flattened.
    Json,
}

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `default_directive` (for example
/// `"envase=debug"`). Returns `false` if a global subscriber was already
/// installed, in which case nothing changes.
pub fn init_tracing(default_directive: &str, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let installed = match format {
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init()
        }
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .try_init(),
    };

    installed.is_ok()
}
