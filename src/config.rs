/*!
 * Configuration types for the update agent
 */

use crate::error::{AgentError, Result};
use ota_core_manifest::{ParseLimits, ParseOptions, UrlAlignment};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for manifest ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,

    /// Largest accepted update action or embedded manifest, in bytes
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,

    /// Deepest accepted object/array nesting
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// How download URLs are matched to manifest files
    #[serde(default)]
    pub url_alignment: UrlAlignment,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
            max_document_bytes: default_max_document_bytes(),
            max_nesting_depth: default_max_nesting_depth(),
            url_alignment: UrlAlignment::Positional,
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

// Default value functions for serde
fn default_max_document_bytes() -> usize {
    ota_core_manifest::options::DEFAULT_MAX_DOCUMENT_BYTES
}

fn default_max_nesting_depth() -> usize {
    ota_core_manifest::options::DEFAULT_MAX_NESTING_DEPTH
}

impl AgentConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AgentConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| AgentError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject limits that would refuse every document
    pub fn validate(&self) -> Result<()> {
        if self.max_document_bytes == 0 {
            return Err(AgentError::Config(
                "max_document_bytes must be greater than 0".to_string(),
            ));
        }
        if self.max_nesting_depth < 3 {
            // updateManifest > files > <id> > hashes needs three levels
            return Err(AgentError::Config(
                "max_nesting_depth must be at least 3".to_string(),
            ));
        }
        Ok(())
    }

    /// Options handed to the manifest parser
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            limits: ParseLimits {
                max_document_bytes: self.max_document_bytes,
                max_nesting_depth: self.max_nesting_depth,
            },
            url_alignment: self.url_alignment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(!config.verbose);
        assert_eq!(config.max_document_bytes, 1024 * 1024);
        assert_eq!(config.max_nesting_depth, 32);
        assert_eq!(config.url_alignment, UrlAlignment::Positional);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_options() {
        let config = AgentConfig {
            max_document_bytes: 4096,
            max_nesting_depth: 8,
            url_alignment: UrlAlignment::Strict,
            ..Default::default()
        };
        let options = config.parse_options();
        assert_eq!(options.limits.max_document_bytes, 4096);
        assert_eq!(options.limits.max_nesting_depth, 8);
        assert_eq!(options.url_alignment, UrlAlignment::Strict);
    }

    #[test]
    fn test_serialization() {
        let config = AgentConfig::default();
        let toml = toml::to_string(&config).unwrap();
        let deserialized: AgentConfig = toml::from_str(&toml).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AgentConfig = toml::from_str(
            r#"
log_level = "debug"
url_alignment = "strict"
"#,
        )
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.url_alignment, UrlAlignment::Strict);
        assert_eq!(config.max_document_bytes, 1024 * 1024);
    }

    #[test]
    fn test_file_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let config = AgentConfig {
            log_level: LogLevel::Warn,
            max_nesting_depth: 12,
            ..Default::default()
        };
        config.to_file(file.path()).unwrap();
        assert_eq!(AgentConfig::from_file(file.path()).unwrap(), config);
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "max_nesting_depth = 1\n").unwrap();
        let err = AgentConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "log_level = [").unwrap();
        let err = AgentConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(LogLevel::Info.to_tracing_level(), tracing::Level::INFO);
        assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
