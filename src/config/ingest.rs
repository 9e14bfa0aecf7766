//! Gateway feed configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where gateway events come from and how messages are classified
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// `stdin` or a path to a JSON-lines file
    #[serde(default = "default_source")]
    pub source: String,

    /// Messages starting with this prefix are commands and are not stored
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

/// Resolved gateway feed location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Stdin,
    File(PathBuf),
}

impl IngestConfig {
    pub fn feed_source(&self) -> FeedSource {
        match self.source.trim() {
            "" | "-" | "stdin" => FeedSource::Stdin,
            path => FeedSource::File(PathBuf::from(path)),
        }
    }

    /// Validate ingest configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.command_prefix.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidCommandPrefix);
        }
        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            command_prefix: default_command_prefix(),
        }
    }
}

fn default_source() -> String {
    "stdin".to_string()
}

fn default_command_prefix() -> String {
    "--".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_read_stdin() {
        let config = IngestConfig::default();
        assert_eq!(config.feed_source(), FeedSource::Stdin);
        assert_eq!(config.command_prefix, "--");
    }

    #[test]
    fn test_path_source() {
        let config = IngestConfig {
            source: "/var/lib/vc/feed.jsonl".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.feed_source(),
            FeedSource::File(PathBuf::from("/var/lib/vc/feed.jsonl"))
        );
    }

    #[test]
    fn test_dash_means_stdin() {
        let config = IngestConfig {
            source: "-".to_string(),
            ..Default::default()
        };
        assert_eq!(config.feed_source(), FeedSource::Stdin);
    }

    #[test]
    fn test_whitespace_prefix_rejected() {
        let config = IngestConfig {
            command_prefix: "! ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
