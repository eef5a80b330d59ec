//! Logging setup for applications embedding the adapter.
//!
//! The adapter itself only emits `tracing` events; nothing is printed unless
//! the application installs a subscriber, for example through [`init`].

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a formatting subscriber at INFO level.
///
/// ```
/// goboo_adapter::logging::init();
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Installs a formatting subscriber showing adapter events at `level`.
///
/// `RUST_LOG` takes precedence when set. Calling this again, or after another
/// subscriber was installed, leaves the existing one in place.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_line_number(true))
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

fn default_directive(level: Level) -> String {
    format!("{}={}", env!("CARGO_CRATE_NAME"), level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_targets_crate() {
        assert_eq!(default_directive(Level::DEBUG), "goboo_adapter=DEBUG");
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        init();
        init_with_level(Level::TRACE);
    }
}
