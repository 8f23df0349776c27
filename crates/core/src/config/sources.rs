use std::fmt;

/// Origin of one `section.key` configuration value.
///
/// Later layers win: defaults, then a YAML file, then `TWEAKS_*` variables,
/// then values set in code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in default, with its rendered value
    Default(String),
    /// YAML document, by path or `<inline>`
    File(String),
    /// `TWEAKS_*` environment variable, by name
    EnvVar(String),
    /// Set through the API after loading
    Programmatic,
}

impl ConfigSource {
    pub fn is_default(&self) -> bool {
        matches!(self, ConfigSource::Default(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ConfigSource::File(_))
    }

    pub fn is_env_var(&self) -> bool {
        matches!(self, ConfigSource::EnvVar(_))
    }

    /// Layer rank, higher overrides lower
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default(_) => 0,
            ConfigSource::File(_) => 1,
            ConfigSource::EnvVar(_) => 2,
            ConfigSource::Programmatic => 3,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Default(value) => write!(f, "default ({})", value),
            ConfigSource::File(path) => write!(f, "file {}", path),
            ConfigSource::EnvVar(var) => write!(f, "${}", var),
            ConfigSource::Programmatic => f.write_str("set in code"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_follows_layering() {
        let layers = [
            ConfigSource::Default("32".to_string()),
            ConfigSource::File("tweaks.yaml".to_string()),
            ConfigSource::EnvVar("TWEAKS_MAX_DEPTH".to_string()),
            ConfigSource::Programmatic,
        ];

        assert!(layers.windows(2).all(|pair| pair[0].precedence() < pair[1].precedence()));
    }

    #[test]
    fn test_display() {
        assert_eq!(ConfigSource::EnvVar("TWEAKS_LOG_LEVEL".to_string()).to_string(), "$TWEAKS_LOG_LEVEL");
        assert_eq!(ConfigSource::Default("info".to_string()).to_string(), "default (info)");
    }
}
