use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::analytics::AnalyticsConfig;
use crate::decoder::SourceEncoding;
use crate::enrichment::EnrichmentConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: unable to read [{path}]: {source}")]
    Io {
        path: String,
        source: std::io::Error
    },
    #[error("Configuration error: {0}")]
    Toml(#[from] toml::de::Error)
}

/// All tunables for one pipeline run. Every field has a default, so an empty
/// file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input: InputConfig,
    pub enrichment: EnrichmentConfig,
    pub analytics: AnalyticsConfig
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Field separator for input lines.
    pub delimiter: char,
    /// Encodings to try, in order.
    pub encodings: Vec<SourceEncoding>
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: '|',
            encodings: SourceEncoding::DEFAULT_ORDER.to_vec()
        }
    }
}

impl PipelineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, PipelineConfig};
    use crate::decoder::SourceEncoding;
    use anyhow::Result;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() -> Result<()> {
        let config = PipelineConfig::from_toml_str("")?;

        assert_eq!(config.input.delimiter, '|');
        assert_eq!(config.input.encodings, SourceEncoding::DEFAULT_ORDER.to_vec());
        assert!(config.enrichment.enabled);
        assert_eq!(config.enrichment.max_attempts, 3);
        assert_eq!(config.analytics.top_n, 5);

        Ok(())
    }

    #[test]
    fn test_partial_config_overrides_only_given_fields() -> Result<()> {
        let config = PipelineConfig::from_toml_str(
            r#"
            [input]
            delimiter = ","
            encodings = ["utf8", "cp1252"]

            [enrichment]
            enabled = false
            timeout_ms = 250

            [analytics]
            top_n = 3
            "#
        )?;

        assert_eq!(config.input.delimiter, ',');
        assert_eq!(config.input.encodings, vec![SourceEncoding::Utf8, SourceEncoding::Windows1252]);
        assert!(!config.enrichment.enabled);
        assert_eq!(config.enrichment.timeout(), Duration::from_millis(250));
        assert_eq!(config.enrichment.concurrency, 8);
        assert_eq!(config.analytics.top_n, 3);
        assert_eq!(config.analytics.low_performer_threshold, 10);

        Ok(())
    }

    #[test]
    fn test_config_loads_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "[enrichment]\nbase_url = \"http://localhost:9000\"")?;

        let config = PipelineConfig::load(file.path())?;

        assert_eq!(config.enrichment.base_url, "http://localhost:9000");

        Ok(())
    }

    #[test]
    fn test_invalid_config_is_reported() {
        assert!(matches!(PipelineConfig::from_toml_str("[input]\ndelimiter = 5"), Err(ConfigError::Toml(_))));
        assert!(matches!(PipelineConfig::load("missing-config.toml"), Err(ConfigError::Io { .. })));
    }
}
