use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use signal_client::SummaryRequester;
use signal_common::{config::normalize_base_path, logger, AppConfig};
use signal_llm::ReadingLevel;
use signal_server::curate::{DEFAULT_PER_DOMAIN_CAP, DEFAULT_TOP};
use signal_server::{curate, export_site, ArticleStore, CurateOptions, ExportOptions};
use std::path::PathBuf;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        // Fallback to default dotenv behavior
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "signal")]
#[command(about = "Signal.ai newsletter - latest articles with reading-level AI summaries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Article dataset file (defaults to the embedded dataset)
        #[arg(long)]
        articles: Option<PathBuf>,
    },

    /// Request one summary from a running server
    Summarize {
        /// Reading level: novice, intermediate or expert
        #[arg(long)]
        level: ReadingLevel,

        /// Text to summarize (markup is stripped before sending)
        #[arg(long, required_unless_present = "article", conflicts_with = "article")]
        text: Option<String>,

        /// Summarize the N-th latest article instead (1-based)
        #[arg(long)]
        article: Option<usize>,

        /// Summarize endpoint (defaults to the configured server)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Print the latest articles
    Articles {
        /// Number of articles to show
        #[arg(long)]
        limit: Option<usize>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge gathered article files into the dataset, dedupe and rank it
    Curate {
        /// Dataset file to update (defaults to ARTICLES_PATH)
        #[arg(long)]
        store: Option<PathBuf>,

        /// JSON array of new article records; repeatable
        #[arg(long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Number of top picks to print
        #[arg(long, default_value_t = DEFAULT_TOP)]
        top: usize,

        /// Maximum top picks from one domain
        #[arg(long, default_value_t = DEFAULT_PER_DOMAIN_CAP)]
        per_domain_cap: usize,
    },

    /// Prerender the site into a directory for static hosting
    Export {
        /// Output directory
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,

        /// Path prefix the site is hosted under (e.g. /signal)
        #[arg(long)]
        base_path: Option<String>,

        /// Absolute summarize endpoint for the exported page
        #[arg(long)]
        api_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();

    let mut config = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            articles,
        }) => {
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }
            if let Some(path) = articles {
                config.articles_path = Some(path);
            }
            config.validate()?;

            serve(config).await?;
        }
        Some(Commands::Summarize {
            level,
            text,
            article,
            endpoint,
        }) => {
            logger::setup_console_logging(&config.log_level)?;

            let text = match (text, article) {
                (Some(text), _) => text,
                (None, Some(n)) => nth_latest_summary(&config, n)?,
                (None, None) => anyhow::bail!("either --text or --article is required"),
            };

            let endpoint = endpoint.unwrap_or_else(|| {
                format!(
                    "http://{}{}",
                    config.server_bind_address(),
                    config.summarize_path()
                )
            });

            let requester = SummaryRequester::new(endpoint)?;
            let outcome = requester.request(level, &text).await;
            println!("{}", outcome);

            if outcome.summary().is_none() {
                std::process::exit(1);
            }
        }
        Some(Commands::Articles { limit, json }) => {
            logger::setup_console_logging(&config.log_level)?;

            let store = ArticleStore::load(&config)?;
            let articles = store.latest(limit.unwrap_or(config.article_limit));

            if json {
                println!("{}", serde_json::to_string_pretty(&articles)?);
            } else {
                for article in &articles {
                    println!(
                        "{}  {}\n    {}",
                        article.published.format("%Y-%m-%d"),
                        article.title,
                        article.url
                    );
                }
            }
        }
        Some(Commands::Curate {
            store,
            inputs,
            top,
            per_domain_cap,
        }) => {
            logger::setup_console_logging(&config.log_level)?;

            let store_path = store
                .or_else(|| config.articles_path.clone())
                .context("--store is required when ARTICLES_PATH is not set")?;

            let options = CurateOptions {
                top,
                per_domain_cap,
                ..CurateOptions::default()
            };
            let report = curate(&store_path, &inputs, &options)?;

            println!(
                "{} articles ({} new, {} duplicates) in {}",
                report.total,
                report.merge.added,
                report.merge.duplicates,
                store_path.display()
            );
            for article in &report.top {
                println!(
                    "{:.3}  {}\n       {}",
                    article.signal.unwrap_or_default(),
                    article.title,
                    article.url
                );
            }
        }
        Some(Commands::Export {
            out_dir,
            base_path,
            api_url,
        }) => {
            logger::setup_console_logging(&config.log_level)?;

            if let Some(base_path) = base_path {
                config.base_path = normalize_base_path(&base_path);
            }
            config.validate()?;

            let store = ArticleStore::load(&config)?;
            let report = export_site(&config, &store, &ExportOptions { out_dir, api_url })?;
            for file in &report.files {
                println!("wrote {}", file.display());
            }
        }
        None => {
            serve(config).await?;
        }
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    logger::setup_logging(config.log_dir.as_deref(), &config.log_level)?;

    tracing::info!("Signal starting...");
    tracing::info!("Configuration loaded: {:?}", config);

    signal_server::start_server(config).await?;
    Ok(())
}

/// Plain summary text of the n-th latest article (1-based)
fn nth_latest_summary(config: &AppConfig, n: usize) -> Result<String> {
    let store = ArticleStore::load(config)?;
    let articles = store.latest(store.len());
    let article = n
        .checked_sub(1)
        .and_then(|i| articles.get(i))
        .with_context(|| format!("no article #{} (dataset has {})", n, articles.len()))?;

    tracing::info!("Summarizing \"{}\"", article.title);
    Ok(article.summary.clone())
}
