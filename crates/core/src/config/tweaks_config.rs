use crate::config::{ConfigError, ConfigSource, ConfigValidator, LogLevelValidator, RangeValidator};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Deepest serializer nesting the optimizer will follow.
pub const MAX_SUPPORTED_DEPTH: usize = 256;

/// Every configurable key, grouped by section.
const FIELDS: &[(&str, &[&str])] = &[
    ("optimizer", &["max_depth", "force_prefetch"]),
    ("logging", &["level", "json"]),
    ("lint", &["query_limit", "lock_limiter"]),
];

/// Settings for the serializer query optimizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Nesting depth after which a branch is left unoptimized
    pub max_depth: usize,
    /// Route every relation through prefetch related
    pub force_prefetch: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            force_prefetch: false,
        }
    }
}

/// Settings for the tracing subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Settings for the database access linters used by test clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Maximum number of SQL queries a single request may run
    pub query_limit: usize,
    /// Reject `SELECT ... FOR UPDATE` spanning several tables
    pub lock_limiter: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            query_limit: 10,
            lock_limiter: true,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweaksConfig {
    pub optimizer: OptimizerConfig,
    pub logging: LoggingConfig,
    pub lint: LintConfig,
    #[serde(skip)]
    sources: HashMap<String, ConfigSource>,
}

impl Default for TweaksConfig {
    fn default() -> Self {
        let mut config = Self {
            optimizer: OptimizerConfig::default(),
            logging: LoggingConfig::default(),
            lint: LintConfig::default(),
            sources: HashMap::new(),
        };
        config.sources = config.default_sources();
        config
    }
}

impl TweaksConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration for test runs
    pub fn testing() -> Self {
        let mut config = Self::new();
        config.logging.level = "warn".to_string();
        config.mark_programmatic("logging.level");
        config
    }

    /// Load configuration from `TWEAKS_*` environment variables on top of the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::from_yaml(yaml, "<inline>")
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents, &path.display().to_string())
    }

    fn from_yaml(yaml: &str, origin: &str) -> Result<Self, ConfigError> {
        let document: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let mut config: Self = if document.is_null() {
            Self::new()
        } else {
            serde_yaml::from_value(document.clone())?
        };
        config.sources = config.default_sources();

        for (section, keys) in FIELDS {
            for key in keys.iter() {
                let present = document
                    .get(*section)
                    .and_then(|values| values.get(*key))
                    .is_some();
                if present {
                    config
                        .sources
                        .insert(format!("{}.{}", section, key), ConfigSource::File(origin.to_string()));
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Override values with any `TWEAKS_*` environment variables that are set
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(max_depth) = env_value("TWEAKS_MAX_DEPTH", "optimizer.max_depth", "positive integer")? {
            self.optimizer.max_depth = max_depth;
            self.mark_env("optimizer.max_depth", "TWEAKS_MAX_DEPTH");
        }

        if let Some(force) = env_flag("TWEAKS_FORCE_PREFETCH", "optimizer.force_prefetch")? {
            self.optimizer.force_prefetch = force;
            self.mark_env("optimizer.force_prefetch", "TWEAKS_FORCE_PREFETCH");
        }

        if let Ok(level) = env::var("TWEAKS_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
            self.mark_env("logging.level", "TWEAKS_LOG_LEVEL");
        }

        if let Some(json) = env_flag("TWEAKS_LOG_JSON", "logging.json")? {
            self.logging.json = json;
            self.mark_env("logging.json", "TWEAKS_LOG_JSON");
        }

        if let Some(limit) = env_value("TWEAKS_QUERY_LIMIT", "lint.query_limit", "positive integer")? {
            self.lint.query_limit = limit;
            self.mark_env("lint.query_limit", "TWEAKS_QUERY_LIMIT");
        }

        if let Some(lock_limiter) = env_flag("TWEAKS_LOCK_LIMITER", "lint.lock_limiter")? {
            self.lint.lock_limiter = lock_limiter;
            self.mark_env("lint.lock_limiter", "TWEAKS_LOCK_LIMITER");
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        RangeValidator {
            field: "optimizer.max_depth",
            min: 1,
            max: MAX_SUPPORTED_DEPTH,
        }
        .validate(&self.optimizer.max_depth)?;

        LogLevelValidator.validate(self.logging.level.as_str())?;

        RangeValidator {
            field: "lint.query_limit",
            min: 1,
            max: usize::MAX,
        }
        .validate(&self.lint.query_limit)?;

        Ok(())
    }

    /// Where each configuration value came from, keyed by `section.key`
    pub fn config_sources(&self) -> &HashMap<String, ConfigSource> {
        &self.sources
    }

    /// Record that a value was set in code rather than loaded
    pub fn mark_programmatic(&mut self, key: &str) {
        self.sources.insert(key.to_string(), ConfigSource::Programmatic);
    }

    fn mark_env(&mut self, key: &str, var: &str) {
        self.sources.insert(key.to_string(), ConfigSource::EnvVar(var.to_string()));
    }

    fn default_sources(&self) -> HashMap<String, ConfigSource> {
        let defaults = [
            ("optimizer.max_depth", self.optimizer.max_depth.to_string()),
            ("optimizer.force_prefetch", self.optimizer.force_prefetch.to_string()),
            ("logging.level", self.logging.level.clone()),
            ("logging.json", self.logging.json.to_string()),
            ("lint.query_limit", self.lint.query_limit.to_string()),
            ("lint.lock_limiter", self.lint.lock_limiter.to_string()),
        ];

        defaults
            .into_iter()
            .map(|(key, value)| (key.to_string(), ConfigSource::Default(value)))
            .collect()
    }
}

fn env_value<T: FromStr>(var: &str, field: &str, expected: &str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::invalid_value(field, raw, expected)),
        Err(_) => Ok(None),
    }
}

fn env_flag(var: &str, field: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(var) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::invalid_value(field, raw, "true or false")),
        },
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "TWEAKS_MAX_DEPTH",
        "TWEAKS_FORCE_PREFETCH",
        "TWEAKS_LOG_LEVEL",
        "TWEAKS_LOG_JSON",
        "TWEAKS_QUERY_LIMIT",
        "TWEAKS_LOCK_LIMITER",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = TweaksConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.optimizer.max_depth, 32);
        assert!(!config.optimizer.force_prefetch);
        assert!(config.config_sources().values().all(ConfigSource::is_default));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides_defaults() {
        clear_env();
        env::set_var("TWEAKS_MAX_DEPTH", "4");
        env::set_var("TWEAKS_FORCE_PREFETCH", "yes");
        env::set_var("TWEAKS_LOG_LEVEL", "DEBUG");

        let config = TweaksConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.optimizer.max_depth, 4);
        assert!(config.optimizer.force_prefetch);
        assert_eq!(config.logging.level, "debug");
        assert!(config.config_sources()["optimizer.max_depth"].is_env_var());
        assert!(config.config_sources()["lint.query_limit"].is_default());
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_garbage() {
        clear_env();
        env::set_var("TWEAKS_QUERY_LIMIT", "lots");
        let result = TweaksConfig::from_env();
        clear_env();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field, .. }) if field == "lint.query_limit"
        ));
    }

    #[test]
    #[serial]
    fn test_from_env_validates_depth() {
        clear_env();
        env::set_var("TWEAKS_MAX_DEPTH", "0");
        let result = TweaksConfig::from_env();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn test_from_yaml_marks_file_sources() {
        let config = TweaksConfig::from_yaml_str(
            "optimizer:\n  force_prefetch: true\nlint:\n  query_limit: 3\n",
        )
        .unwrap();

        assert!(config.optimizer.force_prefetch);
        assert_eq!(config.optimizer.max_depth, 32);
        assert_eq!(config.lint.query_limit, 3);
        assert!(config.config_sources()["optimizer.force_prefetch"].is_file());
        assert!(config.config_sources()["optimizer.max_depth"].is_default());
    }

    #[test]
    fn test_from_yaml_empty_document_uses_defaults() {
        let config = TweaksConfig::from_yaml_str("").unwrap();
        assert_eq!(config.optimizer, OptimizerConfig::default());
    }

    #[test]
    fn test_from_yaml_rejects_invalid_level() {
        let result = TweaksConfig::from_yaml_str("logging:\n  level: loud\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_testing_profile() {
        let config = TweaksConfig::testing();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.config_sources()["logging.level"], ConfigSource::Programmatic);
    }
}
