//! arXiv research source implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feed_rs::parser;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::models::{
    DownloadRequest, DownloadResult, SearchQuery, SearchResults, SortBy, SortOrder, SourceRecord,
};
use crate::sources::{Source, SourceError};
use crate::utils::{read_pdf, HttpClient};

/// Base URL for arXiv API
pub const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";
/// Base URL for arXiv PDFs
pub const ARXIV_PDF_URL: &str = "https://arxiv.org/pdf";
/// Largest page the arXiv API will serve in one request
const ARXIV_MAX_RESULTS: usize = 200;

/// arXiv research source
///
/// Search results carry the paper's PDF URL as their key and, when full text
/// is requested, a metadata header followed by the page-marked PDF text as
/// their raw content.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: Arc<HttpClient>,
    api_url: String,
    pdf_base_url: String,
    download_dir: PathBuf,
}

/// Metadata pulled from one Atom entry
#[derive(Debug, Clone, PartialEq)]
struct EntryMetadata {
    paper_id: String,
    entry_id: String,
    title: String,
    authors: Vec<String>,
    summary: String,
    published: Option<DateTime<Utc>>,
    updated: Option<DateTime<Utc>>,
    categories: Vec<String>,
    pdf_url: String,
}

impl ArxivSource {
    /// Create a new arXiv source
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?)))
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            api_url: ARXIV_API_URL.to_string(),
            pdf_base_url: ARXIV_PDF_URL.to_string(),
            download_dir: PathBuf::from(crate::config::DEFAULT_DOWNLOAD_DIR),
        }
    }

    /// Create from application configuration
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Ok(Self::new()?
            .api_url(&config.search.api_url)
            .pdf_base_url(&config.search.pdf_base_url)
            .download_dir(&config.downloads.directory))
    }

    /// Override the API endpoint
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Override the base URL used to build PDF links from IDs
    pub fn pdf_base_url(mut self, url: impl Into<String>) -> Self {
        self.pdf_base_url = url.into();
        self
    }

    /// Directory PDFs are downloaded into during search
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Parse an arXiv ID from various formats
    ///
    /// Handles formats like:
    /// - "2301.12345"
    /// - "2301.12345v1" (version is stripped)
    /// - "arxiv:2301.12345"
    /// - "https://arxiv.org/abs/2301.12345v1"
    /// - "https://arxiv.org/pdf/2301.12345v1.pdf"
    /// - "math.GT/0104020" (old style)
    pub fn parse_id(id: &str) -> Result<String, SourceError> {
        let id = id.trim();
        let lower = id.to_ascii_lowercase();

        let id = if let Some(pos) = lower.find("/abs/").or_else(|| lower.find("/pdf/")) {
            let after = &id[pos + 5..];
            after.strip_suffix(".pdf").unwrap_or(after)
        } else if lower.starts_with("arxiv:") {
            &id[6..]
        } else {
            id
        };

        let id = strip_version(id.trim_end_matches('/'));
        if id.is_empty() {
            return Err(SourceError::InvalidRequest("Empty arXiv ID".to_string()));
        }

        Ok(id.to_string())
    }

    /// Build search query for arXiv API
    fn build_search_query(query: &SearchQuery) -> String {
        let mut parts = Vec::new();

        if !query.query.trim().is_empty() {
            parts.push(format!("all:{}", query.query.trim()));
        }

        if let Some(author) = &query.author {
            parts.push(format!("au:{}", author));
        }

        if let Some(cat) = &query.category {
            parts.push(format!("cat:{}", cat));
        }

        if parts.is_empty() {
            "all:*".to_string()
        } else {
            parts.join(" AND ")
        }
    }

    fn build_request_url(&self, query: &SearchQuery) -> String {
        let sort_by = match query.sort_by {
            SortBy::Relevance => "relevance",
            SortBy::SubmittedDate => "submittedDate",
            SortBy::LastUpdatedDate => "lastUpdatedDate",
        };
        let sort_order = match query.sort_order {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        };

        format!(
            "{}?search_query={}&start=0&max_results={}&sortBy={}&sortOrder={}",
            self.api_url,
            urlencoding::encode(&Self::build_search_query(query)),
            query.max_results.min(ARXIV_MAX_RESULTS),
            sort_by,
            sort_order
        )
    }

    /// Parse an Atom feed entry
    fn parse_entry(&self, entry: &feed_rs::model::Entry) -> Result<EntryMetadata, SourceError> {
        let paper_id = Self::parse_id(&entry.id)
            .map_err(|_| SourceError::Parse(format!("Missing paper ID in entry '{}'", entry.id)))?;

        let title = entry
            .title
            .as_ref()
            .map(|t| collapse_whitespace(&t.content))
            .unwrap_or_default();

        let summary = entry
            .summary
            .as_ref()
            .map(|s| s.content.trim().to_string())
            .unwrap_or_default();

        let pdf_url = entry
            .links
            .iter()
            .find(|l| {
                l.media_type.as_deref() == Some("application/pdf") || l.title.as_deref() == Some("pdf")
            })
            .map(|l| l.href.clone())
            .unwrap_or_else(|| format!("{}/{}", self.pdf_base_url, paper_id));

        Ok(EntryMetadata {
            paper_id,
            entry_id: entry.id.clone(),
            title,
            authors: entry.authors.iter().map(|a| a.name.clone()).collect(),
            summary,
            published: entry.published,
            updated: entry.updated,
            categories: entry.categories.iter().map(|c| c.term.clone()).collect(),
            pdf_url,
        })
    }

    /// Download a paper and extract its text, or log why it could not be done
    async fn fetch_full_text(&self, meta: &EntryMetadata) -> String {
        let download = match self
            .client
            .download_pdf(&meta.pdf_url, &self.download_dir, &meta.paper_id)
            .await
        {
            Ok(download) => download,
            Err(e) => {
                tracing::warn!("Could not download PDF for {}: {}", meta.paper_id, e);
                return String::new();
            }
        };

        let path = download.path.clone();
        match tokio::task::spawn_blocking(move || read_pdf(&path)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!("Could not extract text from {}: {}", download.path.display(), e);
                String::new()
            }
            Err(e) => {
                tracing::warn!("PDF extraction task failed for {}: {}", meta.paper_id, e);
                String::new()
            }
        }
    }
}

#[async_trait]
impl Source for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, SourceError> {
        let url = self.build_request_url(query);
        tracing::debug!("Querying arXiv: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch arXiv results: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "arXiv API returned status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

        let feed = parser::parse(bytes.as_ref())
            .map_err(|e| SourceError::Parse(format!("Failed to parse Atom feed: {}", e)))?;

        let mut records = Vec::with_capacity(feed.entries.len());
        for entry in &feed.entries {
            let meta = self.parse_entry(entry)?;
            let pdf_text = if query.fetch_full_text {
                self.fetch_full_text(&meta).await
            } else {
                String::new()
            };

            records.push(
                SourceRecord::new(&meta.title, &meta.pdf_url, &meta.summary)
                    .with_raw_content(render_raw_content(&meta, &pdf_text)),
            );
        }

        tracing::info!("Found {} papers on arXiv for '{}'", records.len(), query.query);
        Ok(SearchResults::new(records))
    }

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadResult, SourceError> {
        let paper_id = Self::parse_id(&request.paper_id)?;
        let pdf_url = format!("{}/{}", self.pdf_base_url, paper_id);
        self.client
            .download_pdf(&pdf_url, &request.save_dir, &paper_id)
            .await
    }
}

/// Metadata header and paper text, as stored in a record's raw content
fn render_raw_content(meta: &EntryMetadata, pdf_text: &str) -> String {
    format!(
        "Title: {}\nAuthors: {}\nPublished: {}\nUpdated: {}\nCategories: {}\nAbstract: {}\nPDF URL: {}\nArXiv ID: {}\nContent: {}",
        meta.title,
        meta.authors.join(", "),
        rfc3339(meta.published),
        rfc3339(meta.updated),
        meta.categories.join(", "),
        meta.summary,
        meta.pdf_url,
        meta.entry_id,
        pdf_text
    )
}

fn rfc3339(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.to_rfc3339()).unwrap_or_default()
}

/// Strip a trailing version suffix such as `v2`
fn strip_version(id: &str) -> &str {
    match id.rfind(['v', 'V']) {
        Some(pos)
            if pos > 0
                && pos + 1 < id.len()
                && id[pos + 1..].bytes().all(|b| b.is_ascii_digit()) =>
        {
            &id[..pos]
        }
        _ => id,
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
