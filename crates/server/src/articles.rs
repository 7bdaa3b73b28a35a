use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use signal_common::{AppConfig, Result, SignalError};
use std::path::Path;
use tracing::info;

/// Dataset compiled into the binary
const EMBEDDED_DATASET: &str = include_str!("../data/sources.json");

/// Aggregated article record
///
/// `summary` may contain markup. `tags`, `domain`, `hash` and `signal` are
/// filled in by curation; unknown fields in the dataset are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub summary: String,
    #[serde(deserialize_with = "deserialize_published")]
    pub published: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// SHA-256 of the canonical URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Ranking score in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<f64>,
}

/// Read-only article collection
#[derive(Debug, Clone, Default)]
pub struct ArticleStore {
    articles: Vec<Article>,
}

impl ArticleStore {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    /// Parse a JSON array of articles
    pub fn from_json(json: &str) -> Result<Self> {
        let articles: Vec<Article> = serde_json::from_str(json)?;
        Ok(Self::new(articles))
    }

    /// Dataset embedded at build time
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_DATASET)
    }

    /// Load a dataset file
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            SignalError::config(format!(
                "Failed to read article dataset {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&data)
    }

    /// Dataset selected by configuration
    pub fn load(config: &AppConfig) -> Result<Self> {
        let store = match &config.articles_path {
            Some(path) => Self::from_path(path)?,
            None => Self::embedded()?,
        };
        info!(
            "Article dataset loaded: {} articles ({})",
            store.len(),
            config
                .articles_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "embedded".to_string())
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn all(&self) -> &[Article] {
        &self.articles
    }

    pub fn into_articles(self) -> Vec<Article> {
        self.articles
    }

    /// Most recently published articles first, at most `limit`.
    /// Articles sharing a timestamp keep their dataset order.
    pub fn latest(&self, limit: usize) -> Vec<Article> {
        let mut sorted = self.articles.clone();
        sorted.sort_by(|a, b| b.published.cmp(&a.published));
        sorted.truncate(limit);
        sorted
    }
}

fn deserialize_published<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_published(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized publish date: {}", raw)))
}

/// Parse RFC 3339, RFC 2822 (feeds), naive ISO date-times and plain dates.
/// Values without an offset are taken as UTC.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
