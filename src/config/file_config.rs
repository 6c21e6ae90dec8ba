//! Writing configuration files.
//!
//! # Configuration File Format
//!
//! ```toml
//! [downloads]
//! directory = "./data/papers"
//!
//! [search]
//! api_url = "http://export.arxiv.org/api/query"
//! pdf_base_url = "https://arxiv.org/pdf"
//! max_results = 3
//! fetch_full_text = true
//!
//! [format]
//! max_tokens_per_source = 1000
//! include_raw_content = false
//! ```

use std::path::Path;

use super::Config;

impl Config {
    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::tempdir;

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.search.fetch_full_text = false;
        config.format.include_raw_content = true;

        config.save(&path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert!(!loaded.search.fetch_full_text);
        assert!(loaded.format.include_raw_content);
        assert_eq!(loaded.downloads, config.downloads);
    }

    #[test]
    fn test_to_toml_sections() {
        let toml = Config::default().to_toml().unwrap();
        assert!(toml.contains("[downloads]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("[format]"));
        assert!(toml.contains("max_tokens_per_source = 1000"));
    }
}
