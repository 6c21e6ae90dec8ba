//! HTTP client utilities.

use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::models::DownloadResult;
use crate::sources::SourceError;

/// Shared HTTP client with sensible defaults
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::with_user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
    }

    /// Create a new HTTP client with a custom user agent
    pub fn with_user_agent(user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| SourceError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create from an existing reqwest Client
    pub fn from_client(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Start a GET request
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url)
    }

    /// Download a PDF to `<dir>/<file_stem>.pdf`, creating `dir` if needed
    pub async fn download_pdf(
        &self,
        pdf_url: &str,
        dir: &Path,
        file_stem: &str,
    ) -> Result<DownloadResult, SourceError> {
        let parsed = url::Url::parse(pdf_url)
            .map_err(|e| SourceError::InvalidRequest(format!("Bad PDF URL '{}': {}", pdf_url, e)))?;

        tokio::fs::create_dir_all(dir).await?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to download {}: {}", pdf_url, e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "PDF download returned status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read PDF body: {}", e)))?;

        let path = pdf_file_path(dir, file_stem);
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(DownloadResult::new(path, bytes.len() as u64))
    }
}

/// Where [`HttpClient::download_pdf`] saves a PDF for the given identifier
pub fn pdf_file_path(dir: &Path, file_stem: &str) -> PathBuf {
    dir.join(format!("{}.pdf", sanitize_file_stem(file_stem)))
}

/// Make an identifier safe to use as a file name
///
/// Old-style arXiv IDs contain a slash (`math.GT/0104020`).
fn sanitize_file_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}
