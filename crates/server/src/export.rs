use signal_common::{AppConfig, Result, SignalError};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::articles::ArticleStore;
use crate::page::{render_page, PageContext};

/// Static export options
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Output directory (created if missing)
    pub out_dir: PathBuf,
    /// Absolute summarize endpoint for hosts without the API; defaults to
    /// the base-path-relative route
    pub api_url: Option<String>,
}

/// Files written by an export
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub files: Vec<PathBuf>,
    pub article_count: usize,
}

/// Prerender the newsletter into `options.out_dir`.
///
/// Writes `index.html` (trailing-slash layout), `articles.json` with the
/// displayed articles, and an empty `.nojekyll` marker for GitHub Pages.
pub fn export_site(
    config: &AppConfig,
    store: &ArticleStore,
    options: &ExportOptions,
) -> Result<ExportReport> {
    std::fs::create_dir_all(&options.out_dir).map_err(|e| {
        SignalError::config(format!(
            "Failed to create output directory {}: {}",
            options.out_dir.display(),
            e
        ))
    })?;

    let articles = store.latest(config.article_limit);
    let summarize_url = options
        .api_url
        .clone()
        .unwrap_or_else(|| config.summarize_path());

    let html = render_page(&PageContext {
        articles: &articles,
        summarize_url: &summarize_url,
        subscribe_form_url: &config.subscribe_form_url,
        trust_markup: config.trust_article_markup,
    })?;

    let files = vec![
        write_file(&options.out_dir, "index.html", html.as_bytes())?,
        write_file(
            &options.out_dir,
            "articles.json",
            serde_json::to_string_pretty(&articles)?.as_bytes(),
        )?,
        write_file(&options.out_dir, ".nojekyll", b"")?,
    ];

    info!(
        "Static site exported to {} ({} articles, summarize endpoint {})",
        options.out_dir.display(),
        articles.len(),
        summarize_url
    );

    Ok(ExportReport {
        files,
        article_count: articles.len(),
    })
}

fn write_file(dir: &Path, name: &str, contents: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_writes_site() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("dist");

        let mut config = AppConfig::default();
        config.base_path = "/signal".to_string();
        config.article_limit = 3;

        let store = ArticleStore::embedded().unwrap();
        let report = export_site(
            &config,
            &store,
            &ExportOptions {
                out_dir: out_dir.clone(),
                api_url: None,
            },
        )
        .unwrap();

        assert_eq!(report.article_count, 3);
        assert_eq!(report.files.len(), 3);
        assert!(out_dir.join(".nojekyll").exists());

        let html = std::fs::read_to_string(out_dir.join("index.html")).unwrap();
        assert!(html.contains("data-summarize-url=\"/signal/api/summarize\""));
        assert_eq!(html.matches("class=\"card\"").count(), 3);

        let json = std::fs::read_to_string(out_dir.join("articles.json")).unwrap();
        let exported: Vec<crate::articles::Article> = serde_json::from_str(&json).unwrap();
        assert_eq!(exported, store.latest(3));
    }

    #[test]
    fn test_export_uses_explicit_api_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::embedded().unwrap();

        export_site(
            &AppConfig::default(),
            &store,
            &ExportOptions {
                out_dir: dir.path().to_path_buf(),
                api_url: Some("https://api.example.com/api/summarize".to_string()),
            },
        )
        .unwrap();

        let html = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(html.contains("data-summarize-url=\"https://api.example.com/api/summarize\""));
    }
}
