use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::resolver::DEFAULT_THRESHOLD;

const DEFAULT_CONFIG: &str = r#"[resolver]
threshold = 0.5

[speech]
auto_restart = true
max_restarts = 0
channel_capacity = 32

[telemetry]
enabled = false
log_path = "~/.voice-ide/voice-ide.log"
"#;

/// Top-level configuration, read from `~/.voice-ide.toml`
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// File resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Speech subscription settings
    #[serde(default)]
    pub speech: SpeechConfig,
    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Settings for matching spoken file names
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Score a file must strictly exceed to be opened
    pub threshold: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Settings for the continuous recognition loop
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SpeechConfig {
    /// Reopen the recognizer after each session ends
    pub auto_restart: bool,
    /// Restart limit, 0 for unbounded
    pub max_restarts: u32,
    /// Buffered transcripts per session
    pub channel_capacity: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            auto_restart: true,
            max_restarts: 0,
            channel_capacity: 32,
        }
    }
}

/// Logging destination
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Log to a file instead of stdout
    pub enabled: bool,
    /// Log file, `~/` is expanded
    pub log_path: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: "~/.voice-ide/voice-ide.log".to_owned(),
        }
    }
}

impl Config {
    /// Load config from ~/.voice-ide.toml, writing the defaults if missing
    ///
    /// # Errors
    /// Returns error if HOME is unset or the file cannot be read or parsed
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default(&config_path).context("failed to create default config")?;
        }

        let contents = fs::read_to_string(&config_path).context("failed to read config file")?;

        Self::from_toml_str(&contents)
    }

    /// Parse config from TOML text; missing sections take their defaults
    ///
    /// # Errors
    /// Returns error if the TOML is malformed or values are out of range
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.resolver.threshold) {
            anyhow::bail!(
                "resolver.threshold must be within 0.0..=1.0, got {}",
                self.resolver.threshold
            );
        }
        if self.speech.channel_capacity == 0 {
            anyhow::bail!("speech.channel_capacity must be > 0");
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".voice-ide.toml"))
    }

    fn create_default(path: &Path) -> Result<()> {
        fs::write(path, DEFAULT_CONFIG).context("failed to write default config")?;
        Ok(())
    }

    /// Expand ~ in paths to home directory
    ///
    /// # Errors
    /// Returns error if the path starts with `~/` and HOME is unset
    pub fn expand_path(path: &str) -> Result<PathBuf> {
        if let Some(stripped) = path.strip_prefix("~/") {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            Ok(PathBuf::from(home).join(stripped))
        } else {
            Ok(PathBuf::from(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::from_toml_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::from_toml_str("[resolver]\nthreshold = 0.7\n").unwrap();
        assert!((config.resolver.threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.speech, SpeechConfig::default());
        assert_eq!(config.telemetry, TelemetryConfig::default());
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_threshold_out_of_range() {
        assert!(Config::from_toml_str("[resolver]\nthreshold = 1.5\n").is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let toml = "[speech]\nauto_restart = true\nmax_restarts = 0\nchannel_capacity = 0\n";
        assert!(Config::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(Config::from_toml_str("[speech\n").is_err());
    }

    #[test]
    fn test_expand_path() {
        let home = std::env::var("HOME").expect("HOME not set");
        assert_eq!(
            Config::expand_path("~/.voice-ide/log").unwrap(),
            PathBuf::from(home).join(".voice-ide/log")
        );
        assert_eq!(
            Config::expand_path("/var/log/app.log").unwrap(),
            PathBuf::from("/var/log/app.log")
        );
    }
}
