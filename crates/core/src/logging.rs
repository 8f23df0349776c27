//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::TweaksConfig;

/// Install a global `fmt` subscriber for the configured level.
///
/// `RUST_LOG` takes precedence over `logging.level` when set. Returns `false`
/// when a subscriber was already installed, which is not an error.
pub fn init_tracing(config: &TweaksConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.logging.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(
            "Tracing initialised (level: {}, json: {})",
            config.logging.level,
            config.logging.json
        );
    }
    installed
}
