//! # tweaks-core
//!
//! Shared foundation for the tweaks crates: layered configuration
//! (defaults, YAML files, `TWEAKS_*` environment variables) and tracing
//! initialisation.

pub mod config;
pub mod logging;

pub use config::{
    ConfigError, ConfigSource, ConfigValidator, LintConfig, LoggingConfig, OptimizerConfig,
    TweaksConfig,
};
pub use logging::init_tracing;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get framework version
pub fn version() -> &'static str {
    VERSION
}
