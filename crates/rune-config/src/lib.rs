//! Rune transition configuration system
//!
//! This crate provides centralized configuration for the transition engine
//! and its demo runner, loading settings from `rune.toml` with environment
//! variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "rune.toml";

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuneConfig {
    /// Transition engine settings
    pub transitions: TransitionSettings,
    /// Log output settings
    pub logging: LoggingConfig,
    /// Demo runner settings
    pub demo: DemoConfig,
}

/// Transition engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    /// Run transitions at all. When false every style change applies instantly
    /// and no lifecycle events are emitted.
    pub enabled: bool,
    /// Log every dispatched lifecycle event at info level (debug otherwise)
    pub log_events: bool,
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter directive, e.g. "info" or "rune_transition=debug".
    /// `RUST_LOG` wins when set.
    pub filter: Option<String>,
}

/// Demo runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Scenario to run (hover, reversal, detach, all)
    pub scenario: Option<String>,
    /// Simulated frame interval in milliseconds
    pub frame_ms: u64,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            log_events: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: None }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scenario: None,
            frame_ms: 16, // ~60fps
        }
    }
}

fn env_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl RuneConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from the default location (rune.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("RUNE_TRANSITIONS") {
            self.transitions.enabled = env_flag(&val);
        }
        if let Ok(val) = std::env::var("RUNE_LOG_EVENTS") {
            self.transitions.log_events = env_flag(&val);
        }

        if let Ok(filter) = std::env::var("RUNE_LOG") {
            self.logging.filter = Some(filter);
        }

        if let Ok(scenario) = std::env::var("DEMO_SCENARIO") {
            self.demo.scenario = Some(scenario);
        }
        if let Ok(val) = std::env::var("DEMO_FRAME_MS") {
            if let Ok(frame_ms) = val.parse::<u64>() {
                self.demo.frame_ms = frame_ms;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuneConfig::default();
        assert!(config.transitions.enabled);
        assert!(!config.transitions.log_events);
        assert_eq!(config.demo.frame_ms, 16);
        assert!(config.logging.filter.is_none());
    }

    #[test]
    fn test_toml_serialization() {
        let config = RuneConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: RuneConfig = toml::from_str(&toml_str).unwrap();
        assert!(parsed.transitions.enabled);
        assert_eq!(parsed.demo.frame_ms, 16);
    }

    #[test]
    fn test_partial_toml() {
        let parsed: RuneConfig = toml::from_str(
            r#"
            [transitions]
            enabled = false

            [demo]
            scenario = "reversal"
            "#,
        )
        .unwrap();

        assert!(!parsed.transitions.enabled);
        assert!(!parsed.transitions.log_events);
        assert_eq!(parsed.demo.scenario.as_deref(), Some("reversal"));
        assert_eq!(parsed.demo.frame_ms, 16);
    }

    #[test]
    fn test_load_from_file_errors() {
        let missing = RuneConfig::load_from_file("definitely/not/here/rune.toml");
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let path = std::env::temp_dir().join(format!("rune-config-test-{}.toml", std::process::id()));
        std::fs::write(&path, "[transitions]\nenabled = \"sometimes\"\n").unwrap();
        let invalid = RuneConfig::load_from_file(&path);
        std::fs::remove_file(&path).unwrap();

        let err = invalid.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("failed to parse config file"));
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if rune.toml doesn't exist
        let config = RuneConfig::load_or_default();
        assert!(toml::to_string(&config).is_ok());
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("DEMO_SCENARIO", "detach");
            std::env::set_var("DEMO_FRAME_MS", "33");
            std::env::set_var("RUNE_TRANSITIONS", "false");
            std::env::set_var("RUNE_LOG", "rune_transition=debug");
        }

        let mut config = RuneConfig::default();
        config.merge_with_env();

        assert_eq!(config.demo.scenario.as_deref(), Some("detach"));
        assert_eq!(config.demo.frame_ms, 33);
        assert!(!config.transitions.enabled);
        assert_eq!(config.logging.filter.as_deref(), Some("rune_transition=debug"));

        // Clean up
        unsafe {
            std::env::remove_var("DEMO_SCENARIO");
            std::env::remove_var("DEMO_FRAME_MS");
            std::env::remove_var("RUNE_TRANSITIONS");
            std::env::remove_var("RUNE_LOG");
        }
    }
}
