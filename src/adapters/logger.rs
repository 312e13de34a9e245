//! Log subscriber setup for the host binary.
//!
//! Installs a `tracing-subscriber` formatter on stderr and bridges the `log`
//! facade into it, so the `log::info!`/`warn!` lines emitted across the
//! crate come out with a local `HH:MM:SS` timestamp. Filter directives come
//! from the `FILLGATE_LOG` environment variable (`info` when unset), using
//! the usual `EnvFilter` syntax, e.g. `debug` or `fillgate=trace`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "FILLGATE_LOG";

/// Directives used when `FILLGATE_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVES: &str = "info";

/// Build the filter from optional directives, falling back to
/// [`DEFAULT_DIRECTIVES`].
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the subscriber globally. Also routes `log` records into it.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let directives = std::env::var(LOG_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives.as_deref()))
        .with_timer(ChronoLocal::new("%H:%M:%S".to_string()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
}
