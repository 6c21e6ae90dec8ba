//! Configuration management.
//!
//! Settings come from, in increasing precedence: built-in defaults, a TOML
//! file, and `RESEARCH_DIGEST_*` environment variables. Nested keys use a
//! double underscore, e.g. `RESEARCH_DIGEST_FORMAT__MAX_TOKENS_PER_SOURCE=500`.

mod file_config;

pub use file_config::ConfigFileError;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sources::arxiv::{ARXIV_API_URL, ARXIV_PDF_URL};
use crate::utils::FormatOptions;

/// Where downloaded PDFs land unless configured otherwise
pub const DEFAULT_DOWNLOAD_DIR: &str = "./data/papers";

/// Environment variable prefix
const ENV_PREFIX: &str = "RESEARCH_DIGEST";

/// File name looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "research-digest.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Download settings
    pub downloads: DownloadConfig,

    /// arXiv search settings
    pub search: SearchConfig,

    /// Digest formatting settings
    pub format: FormatConfig,
}

/// Download configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Directory PDFs are saved in
    pub directory: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
        }
    }
}

/// Search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// arXiv API endpoint
    pub api_url: String,

    /// Base URL for PDF links built from IDs
    pub pdf_base_url: String,

    /// Default number of results per search
    pub max_results: usize,

    /// Download each result's PDF and include its text
    pub fetch_full_text: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_url: ARXIV_API_URL.to_string(),
            pdf_base_url: ARXIV_PDF_URL.to_string(),
            max_results: 3,
            fetch_full_text: true,
        }
    }
}

/// Formatting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Approximate token cap per source's full text
    pub max_tokens_per_source: usize,

    /// Include full text in digests
    pub include_raw_content: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        let options = FormatOptions::default();
        Self {
            max_tokens_per_source: options.max_tokens_per_source,
            include_raw_content: options.include_raw_content,
        }
    }
}

impl FormatConfig {
    /// Formatter options for these settings
    pub fn options(&self) -> FormatOptions {
        FormatOptions::new(self.max_tokens_per_source).include_raw_content(self.include_raw_content)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Load configuration from defaults and the environment only
pub fn get_config() -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file in the default locations
///
/// Checks `./research-digest.toml`, then
/// `<config dir>/research-digest/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|p| p.is_file())
}

/// Per-user configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("research-digest").join("config.toml"))
}
