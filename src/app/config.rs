//! Configuration for a matching session

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sequence::SequenceOptions;

/// Matching session configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Allow several sequences to be targeted at once
    pub multi_target: bool,
    /// Options given to sequences spawned through the context
    pub sequence: SequenceOptions,
    /// Input aggregation settings
    pub input: InputConfig,
}

/// Input aggregation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Append a tab token while the tab key is held
    pub tab_as_input: bool,
    /// Drop frames that only repeat a held key
    pub suppress_key_repeat: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            tab_as_input: true,
            suppress_key_repeat: true,
        }
    }
}

impl MatchingConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: MatchingConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from the default location or return the default config
    pub fn load_or_default() -> Self {
        // ~/.config/typematch/config.json
        if let Some(config_dir) = config_dir() {
            let config_path = config_dir.join("config.json");
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Ignoring config {}: {}", config_path.display(), e);
                    },
                }
            }
        }
        Self::default()
    }
}

/// Get the configuration directory path
fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("typematch"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = MatchingConfig::default();
        assert!(!config.multi_target);
        assert!(!config.sequence.case_sensitive);
        assert!(!config.sequence.optional_whitespace);
        assert!(config.input.tab_as_input);
        assert!(config.input.suppress_key_repeat);
    }

    #[test]
    fn test_config_partial_json() {
        let config: MatchingConfig =
            serde_json::from_str(r#"{"multi_target": true, "input": {"tab_as_input": false}}"#)
                .unwrap();
        assert!(config.multi_target);
        assert!(!config.input.tab_as_input);
        assert!(config.input.suppress_key_repeat);
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = MatchingConfig::default();
        config.multi_target = true;
        config.sequence.optional_whitespace = true;
        config.save(&path).unwrap();

        let restored = MatchingConfig::load(&path).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_config_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(MatchingConfig::load(&missing), Err(ConfigError::Io(_))));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(MatchingConfig::load(&broken), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_load_or_default_from_home() {
        let home = tempfile::tempdir().unwrap();
        std::env::set_var("HOME", home.path());
        assert_eq!(MatchingConfig::load_or_default(), MatchingConfig::default());

        let dir = home.path().join(".config").join("typematch");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ broken").unwrap();
        assert_eq!(MatchingConfig::load_or_default(), MatchingConfig::default());

        let mut config = MatchingConfig::default();
        config.multi_target = true;
        config.save(&path).unwrap();
        assert_eq!(MatchingConfig::load_or_default(), config);
    }
}
