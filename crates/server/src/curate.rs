//! Dataset curation
//!
//! Merges newly gathered article records into the dataset file, dedupes
//! them by canonical URL, and ranks the result by signal score.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use signal_common::Result;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::articles::{Article, ArticleStore};

/// Stored summaries are cut to this many characters
pub const SUMMARY_MAX_CHARS: usize = 500;

/// Default number of top picks
pub const DEFAULT_TOP: usize = 10;

/// Default cap on top picks sharing one domain
pub const DEFAULT_PER_DOMAIN_CAP: usize = 3;

/// Previous dataset versions kept next to the file
const BACKUPS: usize = 5;

/// Source authority by domain; unknown domains score `DEFAULT_AUTHORITY`
const AUTHORITY: &[(&str, f64)] = &[
    ("openai.com", 1.0),
    ("anthropic.com", 1.0),
    ("deepmind.google", 1.0),
    ("arxiv.org", 0.9),
    ("huggingface.co", 0.85),
    ("github.com", 0.8),
];

const DEFAULT_AUTHORITY: f64 = 0.6;

/// Terms that mark an item as likely newsworthy
const BOOST_TERMS: &[&str] = &[
    "release",
    "open-source",
    "open source",
    "benchmark",
    "state-of-the-art",
    "reasoning",
    "agent",
    "inference",
    "safety",
    "multimodal",
];

/// Lowercase and drop the query string
pub fn canonicalize_url(url: &str) -> String {
    url.split('?')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Hex SHA-256 of an already canonical URL
pub fn url_hash(canonical_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_url.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Host part of `url` without a `www.` prefix; empty when there is no scheme
pub fn domain_of(url: &str) -> String {
    let rest = match url.split_once("://") {
        Some((_, rest)) => rest,
        None => return String::new(),
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    host.replace("www.", "")
}

/// Canonical URL, hash, domain and a bounded summary for a new record
pub fn normalize(mut article: Article) -> Article {
    let canonical = canonicalize_url(&article.url);
    article.hash = Some(url_hash(&canonical));
    article.domain = Some(domain_of(&canonical));
    article.url = canonical;
    article.title = article.title.trim().to_string();
    if article.summary.chars().count() > SUMMARY_MAX_CHARS {
        article.summary = article.summary.chars().take(SUMMARY_MAX_CHARS).collect();
    }
    article
}

/// Counts from one merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub duplicates: usize,
}

/// Append the unseen `incoming` records to `existing`.
///
/// Existing records are kept as they are apart from a missing domain.
/// A record is a duplicate when its hash or canonical URL is already
/// present, including earlier records of the same batch.
pub fn merge(existing: Vec<Article>, incoming: Vec<Article>) -> (Vec<Article>, MergeReport) {
    let mut seen_hashes = HashSet::new();
    let mut seen_urls = HashSet::new();

    let mut merged: Vec<Article> = existing
        .into_iter()
        .map(|mut article| {
            if article.domain.is_none() {
                article.domain = Some(domain_of(&article.url));
            }
            if let Some(hash) = &article.hash {
                seen_hashes.insert(hash.clone());
            }
            seen_urls.insert(canonicalize_url(&article.url));
            article
        })
        .collect();

    let mut report = MergeReport::default();
    for article in incoming.into_iter().map(normalize) {
        let hash = article.hash.clone().unwrap_or_default();
        if seen_hashes.contains(&hash) || seen_urls.contains(&article.url) {
            debug!("Skipping duplicate {}", article.url);
            report.duplicates += 1;
            continue;
        }
        seen_hashes.insert(hash);
        seen_urls.insert(article.url.clone());
        merged.push(article);
        report.added += 1;
    }

    (merged, report)
}

/// Ranking inputs for one article
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    /// 1 within three days of publication, linear decay to 0 at seven
    pub novelty: f64,
    pub authority: f64,
    pub keyword_hits: usize,
    pub engagement: f64,
}

pub fn extract_features(article: &Article, now: DateTime<Utc>) -> Features {
    let age_days = ((now - article.published).num_seconds() as f64 / 86_400.0).max(0.0);
    let novelty = if age_days <= 3.0 {
        1.0
    } else if age_days <= 7.0 {
        (1.0 - (age_days - 3.0) / 4.0).max(0.0)
    } else {
        0.0
    };

    let domain = article
        .domain
        .clone()
        .unwrap_or_else(|| domain_of(&article.url));
    let authority = AUTHORITY
        .iter()
        .find(|(d, _)| *d == domain)
        .map(|(_, a)| *a)
        .unwrap_or(DEFAULT_AUTHORITY);

    let text = format!("{} {}", article.title, article.summary).to_lowercase();
    let keyword_hits = BOOST_TERMS.iter().filter(|t| text.contains(*t)).count();

    let engagement = 0.3 + if domain.contains("github.com") { 0.15 } else { 0.0 };

    Features {
        novelty,
        authority,
        keyword_hits,
        engagement,
    }
}

/// Weighted signal score; keyword hits saturate at four
pub fn score(article: &Article, now: DateTime<Utc>) -> f64 {
    let f = extract_features(article, now);
    let keyword = (f.keyword_hits as f64 / 4.0).min(1.0);
    0.35 * f.novelty + 0.30 * f.authority + 0.25 * keyword + 0.10 * f.engagement
}

/// Score every article and order by signal, then recency
pub fn rank(articles: &mut [Article], now: DateTime<Utc>) {
    for article in articles.iter_mut() {
        article.signal = Some(score(article, now));
    }
    articles.sort_by(|a, b| {
        b.signal
            .unwrap_or_default()
            .total_cmp(&a.signal.unwrap_or_default())
            .then_with(|| b.published.cmp(&a.published))
    });
}

/// First `k` of `ranked`, skipping domains that already have
/// `per_domain_cap` picks
pub fn select(ranked: &[Article], k: usize, per_domain_cap: usize) -> Vec<Article> {
    let mut picked = Vec::new();
    let mut per_domain: HashMap<String, usize> = HashMap::new();

    for article in ranked {
        if picked.len() >= k {
            break;
        }
        let domain = article.domain.clone().unwrap_or_default();
        let count = per_domain.entry(domain).or_insert(0);
        if *count >= per_domain_cap {
            continue;
        }
        *count += 1;
        picked.push(article.clone());
    }

    picked
}

/// Write the dataset atomically, rotating up to five backups
/// (`sources.json.bak0` is the newest)
pub fn save_dataset(path: &Path, articles: &[Article]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, serde_json::to_string_pretty(articles)?)?;
    rotate_backups(path, BACKUPS)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".bak{}", index));
    PathBuf::from(name)
}

fn rotate_backups(path: &Path, keep: usize) -> Result<()> {
    if keep == 0 {
        return Ok(());
    }
    for i in (1..keep).rev() {
        let src = backup_path(path, i - 1);
        if src.exists() {
            std::fs::rename(&src, backup_path(path, i))?;
        }
    }
    if path.exists() {
        std::fs::rename(path, backup_path(path, 0))?;
    }
    Ok(())
}

/// Curation run settings
#[derive(Debug, Clone)]
pub struct CurateOptions {
    pub top: usize,
    pub per_domain_cap: usize,
    pub now: DateTime<Utc>,
}

impl Default for CurateOptions {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP,
            per_domain_cap: DEFAULT_PER_DOMAIN_CAP,
            now: Utc::now(),
        }
    }
}

/// Outcome of a curation run
#[derive(Debug, Clone)]
pub struct CurateReport {
    pub total: usize,
    pub merge: MergeReport,
    pub top: Vec<Article>,
}

/// Merge `inputs` into the dataset at `store_path`, rank it, and save it.
///
/// A missing dataset file starts empty.
pub fn curate(
    store_path: &Path,
    inputs: &[PathBuf],
    options: &CurateOptions,
) -> Result<CurateReport> {
    let existing = if store_path.exists() {
        ArticleStore::from_path(store_path)?.into_articles()
    } else {
        info!("No dataset at {}, starting empty", store_path.display());
        Vec::new()
    };

    let mut incoming = Vec::new();
    for input in inputs {
        let batch = ArticleStore::from_path(input)?.into_articles();
        debug!("Read {} records from {}", batch.len(), input.display());
        incoming.extend(batch);
    }

    let (mut merged, merge_report) = merge(existing, incoming);
    rank(&mut merged, options.now);
    save_dataset(store_path, &merged)?;

    let top = select(&merged, options.top, options.per_domain_cap);

    info!(
        "Dataset curated: {} articles ({} new, {} duplicates) -> {}",
        merged.len(),
        merge_report.added,
        merge_report.duplicates,
        store_path.display()
    );

    Ok(CurateReport {
        total: merged.len(),
        merge: merge_report,
        top,
    })
}
