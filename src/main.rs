use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use research_digest::config::{default_config_path, find_config_file, get_config, load_config, Config};
use research_digest::models::{DownloadRequest, SearchQuery, SearchResponse, SearchResults, SortBy, SortOrder};
use research_digest::sources::{ArxivSource, Source};
use research_digest::utils::{deduplicate_and_format_sources, format_sources, read_pdf, FormatOptions};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Research Digest - Search arXiv and render deduplicated source digests
#[derive(Parser, Debug)]
#[command(name = "research-digest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search arXiv, extract paper text, and render deduplicated source digests", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for search results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Deduplicated source digest
    Digest,
    /// Bullet list of titles and URLs
    List,
    /// JSON (machine-readable)
    Json,
    /// Table format (human-readable)
    Table,
}

/// Sort field for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SortField {
    /// Sort by relevance
    Relevance,
    /// Sort by submission date
    Submitted,
    /// Sort by last update
    Updated,
}

/// Sort order
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Order {
    /// Ascending order
    Asc,
    /// Descending order
    Desc,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search arXiv; several queries are merged and deduplicated
    #[command(alias = "s")]
    Search {
        /// Search query strings
        #[arg(required = true)]
        queries: Vec<String>,

        /// Maximum number of results per query
        #[arg(long, short)]
        max_results: Option<usize>,

        /// Author filter
        #[arg(long, short)]
        author: Option<String>,

        /// Category/subject filter (e.g. cs.CL)
        #[arg(long, short)]
        category: Option<String>,

        /// Sort by field
        #[arg(long, value_enum)]
        sort_by: Option<SortField>,

        /// Sort order
        #[arg(long, value_enum)]
        order: Option<Order>,

        /// Skip PDF download and text extraction
        #[arg(long)]
        no_full_text: bool,

        /// Include each paper's full text in the digest
        #[arg(long)]
        include_raw_content: bool,

        /// Approximate token cap per paper's full text
        #[arg(long)]
        max_tokens: Option<usize>,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Digest)]
        output: OutputFormat,
    },

    /// Format search results stored as JSON (single or list form)
    #[command(alias = "f")]
    Format {
        /// JSON file to read ("-" or omitted for stdin)
        input: Option<PathBuf>,

        /// Include each source's full text
        #[arg(long)]
        include_raw_content: bool,

        /// Approximate token cap per source's full text
        #[arg(long)]
        max_tokens: Option<usize>,

        /// Render a bullet list instead of a digest
        #[arg(long)]
        list: bool,
    },

    /// Extract page-marked text from a PDF
    #[command(alias = "r")]
    Read {
        /// Path to the PDF file
        path: PathBuf,
    },

    /// Download a paper's PDF by arXiv ID
    #[command(alias = "d")]
    Download {
        /// arXiv ID or URL
        id: String,

        /// Directory to save into (default: configured download directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Inspect or create configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Where to write (default: user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("research_digest={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Search {
            queries,
            max_results,
            author,
            category,
            sort_by,
            order,
            no_full_text,
            include_raw_content,
            max_tokens,
            output,
        } => {
            let source = ArxivSource::from_config(&config)?;
            let fetch_full_text = config.search.fetch_full_text && !no_full_text;

            let mut collections = Vec::with_capacity(queries.len());
            for query in &queries {
                let mut search_query = SearchQuery::new(query)
                    .max_results(max_results.unwrap_or(config.search.max_results))
                    .fetch_full_text(fetch_full_text);
                search_query.author = author.clone();
                search_query.category = category.clone();
                if let Some(sort) = sort_by {
                    search_query = search_query.sort_by(match sort {
                        SortField::Relevance => SortBy::Relevance,
                        SortField::Submitted => SortBy::SubmittedDate,
                        SortField::Updated => SortBy::LastUpdatedDate,
                    });
                }
                if let Some(order) = order {
                    search_query = search_query.sort_order(match order {
                        Order::Asc => SortOrder::Ascending,
                        Order::Desc => SortOrder::Descending,
                    });
                }

                let results = source
                    .search(&search_query)
                    .await
                    .with_context(|| format!("arXiv search failed for '{}'", query))?;
                if !cli.quiet {
                    eprintln!("Found {} papers for '{}'", results.len(), query);
                }
                collections.push(results);
            }

            let options = format_options(&config, include_raw_content, max_tokens);
            output_results(collections, output, options)?;
        }

        Commands::Format {
            input,
            include_raw_content,
            max_tokens,
            list,
        } => {
            let value: serde_json::Value = serde_json::from_str(&read_input(input.as_deref())?)
                .context("Input is not valid JSON")?;

            if list {
                let results = SearchResults::from_value(&value)?;
                println!("{}", format_sources(&results));
            } else {
                let response = SearchResponse::from_value(&value)?;
                let options = format_options(&config, include_raw_content, max_tokens);
                println!("{}", deduplicate_and_format_sources(response, options)?);
            }
        }

        Commands::Read { path } => {
            let text = tokio::task::spawn_blocking(move || read_pdf(&path)).await??;
            println!("{}", text);
        }

        Commands::Download { id, dir } => {
            let source = ArxivSource::from_config(&config)?;
            let save_dir = dir.unwrap_or_else(|| config.downloads.directory.clone());
            let result = source.download(&DownloadRequest::new(&id, save_dir)).await?;
            if !cli.quiet {
                eprintln!("Downloaded {} bytes", result.bytes);
            }
            println!("{}", result.path.display());
        }

        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => {
                let path = path
                    .or_else(default_config_path)
                    .context("No config directory available; pass a path")?;
                if path.exists() && !force {
                    anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
                }
                Config::default().save(&path)?;
                println!("Wrote {}", path.display());
            }
            ConfigAction::Show => {
                print!("{}", config.to_toml()?);
            }
        },
    }

    Ok(())
}

/// Load the configuration named on the command line, else a discovered file, else the environment
fn resolve_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load_config(path).with_context(|| format!("Failed to load {}", path.display()));
    }

    if let Some(path) = find_config_file() {
        tracing::info!("Using config file: {}", path.display());
        return load_config(&path).with_context(|| format!("Failed to load {}", path.display()));
    }

    Ok(get_config()?)
}

/// Command-line flags take precedence over configured formatting
fn format_options(config: &Config, include_raw_content: bool, max_tokens: Option<usize>) -> FormatOptions {
    let mut options = config.format.options();
    if include_raw_content {
        options.include_raw_content = true;
    }
    if let Some(max_tokens) = max_tokens {
        options.max_tokens_per_source = max_tokens;
    }
    options
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn output_results(
    collections: Vec<SearchResults>,
    format: OutputFormat,
    options: FormatOptions,
) -> Result<()> {
    match format {
        OutputFormat::Digest => {
            println!("{}", deduplicate_and_format_sources(collections, options)?);
        }
        OutputFormat::List => {
            for results in &collections {
                println!("{}", format_sources(results));
            }
        }
        OutputFormat::Json => {
            let response = SearchResponse::from(collections);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Table => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["Title", "URL"]);

            for record in collections.iter().flat_map(|c| c.results.iter()) {
                let title = if record.title.chars().count() > 60 {
                    format!("{}...", record.title.chars().take(57).collect::<String>())
                } else {
                    record.title.clone()
                };

                table.add_row(vec![
                    Cell::new(title).add_attribute(Attribute::Bold),
                    Cell::new(&record.url),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["research-digest", "-vv", "read", "a.pdf"]);
        assert_eq!(cli.verbose, 2);

        let cli = Cli::parse_from(["research-digest", "read", "a.pdf", "--verbose"]);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_cli_quiet_and_config_flags() {
        let cli = Cli::parse_from([
            "research-digest",
            "-q",
            "--config",
            "/path/to/config.toml",
            "config",
            "show",
        ]);
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn test_cli_search_command() {
        let cli = Cli::parse_from(["research-digest", "search", "machine learning"]);
        match &cli.command {
            Commands::Search {
                queries,
                max_results,
                output,
                no_full_text,
                ..
            } => {
                assert_eq!(queries, &vec!["machine learning".to_string()]);
                assert_eq!(*max_results, None);
                assert_eq!(*output, OutputFormat::Digest);
                assert!(!no_full_text);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_search_with_options() {
        let cli = Cli::parse_from([
            "research-digest",
            "search",
            "rag",
            "retrieval",
            "-m",
            "5",
            "--category",
            "cs.CL",
            "--no-full-text",
            "--include-raw-content",
            "--max-tokens",
            "200",
            "-o",
            "json",
        ]);
        match &cli.command {
            Commands::Search {
                queries,
                max_results,
                category,
                include_raw_content,
                max_tokens,
                output,
                ..
            } => {
                assert_eq!(queries.len(), 2);
                assert_eq!(*max_results, Some(5));
                assert_eq!(category.as_deref(), Some("cs.CL"));
                assert!(include_raw_content);
                assert_eq!(*max_tokens, Some(200));
                assert_eq!(*output, OutputFormat::Json);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_search_requires_query() {
        assert!(Cli::try_parse_from(["research-digest", "search"]).is_err());
    }

    #[test]
    fn test_cli_format_command() {
        let cli = Cli::parse_from(["research-digest", "format", "results.json", "--list"]);
        match &cli.command {
            Commands::Format { input, list, .. } => {
                assert_eq!(input.as_deref(), Some(Path::new("results.json")));
                assert!(list);
            }
            _ => panic!("Expected Format command"),
        }
    }

    #[test]
    fn test_cli_download_command() {
        let cli = Cli::parse_from(["research-digest", "download", "2301.12345", "--dir", "/tmp/papers"]);
        match &cli.command {
            Commands::Download { id, dir } => {
                assert_eq!(id, "2301.12345");
                assert_eq!(dir.as_deref(), Some(Path::new("/tmp/papers")));
            }
            _ => panic!("Expected Download command"),
        }
    }

    #[test]
    fn test_cli_config_init() {
        let cli = Cli::parse_from(["research-digest", "config", "init", "--force"]);
        match &cli.command {
            Commands::Config {
                action: ConfigAction::Init { path, force },
            } => {
                assert!(path.is_none());
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_format_options_flags_override_config() {
        let config = Config::default();

        let options = format_options(&config, false, None);
        assert_eq!(options, config.format.options());

        let options = format_options(&config, true, Some(50));
        assert!(options.include_raw_content);
        assert_eq!(options.max_tokens_per_source, 50);
    }
}
