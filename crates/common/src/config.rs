use crate::error::SignalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Placeholder form action used until a real form id is configured
pub const DEFAULT_SUBSCRIBE_FORM_URL: &str =
    "https://app.convertkit.com/forms/FORM_ID/subscriptions";

/// Signal application configuration
///
/// Loaded once by the binary and handed to every component explicitly.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Secret credential for the external LLM API
    pub openai_api_key: Option<String>,

    /// LLM API base URL
    pub openai_base_url: String,

    /// Model identifier sent with every summary request
    pub openai_model: String,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log level
    pub log_level: String,

    /// Log directory (console only when unset)
    pub log_dir: Option<PathBuf>,

    /// Article dataset override (embedded dataset when unset)
    pub articles_path: Option<PathBuf>,

    /// Number of articles shown on the page
    pub article_limit: usize,

    /// Third-party subscription form endpoint
    pub subscribe_form_url: String,

    /// Path prefix the site is served under (e.g. "/signal")
    pub base_path: String,

    /// Origin allowed to call the API cross-site
    pub cors_allowed_origin: Option<String>,

    /// Render article summaries as raw markup
    pub trust_article_markup: bool,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("articles_path", &self.articles_path)
            .field("article_limit", &self.article_limit)
            .field("subscribe_form_url", &self.subscribe_form_url)
            .field("base_path", &self.base_path)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("trust_article_markup", &self.trust_article_markup)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            log_level: "info".to_string(),
            log_dir: None,
            articles_path: None,
            article_limit: 5,
            subscribe_form_url: DEFAULT_SUBSCRIBE_FORM_URL.to_string(),
            base_path: String::new(),
            cors_allowed_origin: None,
            trust_article_markup: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, SignalError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SignalError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port = match non_empty("SERVER_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                SignalError::config(format!("SERVER_PORT is not a valid port: {}", raw))
            })?,
            None => defaults.server_port,
        };

        let article_limit = match non_empty("ARTICLE_LIMIT") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                SignalError::config(format!("ARTICLE_LIMIT is not a valid number: {}", raw))
            })?,
            None => defaults.article_limit,
        };

        let trust_article_markup = match non_empty("TRUST_ARTICLE_MARKUP") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                SignalError::config(format!("TRUST_ARTICLE_MARKUP is not a boolean: {}", raw))
            })?,
            None => defaults.trust_article_markup,
        };

        let config = Self {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openai_base_url),
            openai_model: non_empty("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            server_host: non_empty("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            log_level: non_empty("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: non_empty("LOG_DIR").map(PathBuf::from),
            articles_path: non_empty("ARTICLES_PATH").map(PathBuf::from),
            article_limit,
            subscribe_form_url: non_empty("SUBSCRIBE_FORM_URL")
                .unwrap_or(defaults.subscribe_form_url),
            base_path: non_empty("BASE_PATH")
                .map(|p| normalize_base_path(&p))
                .unwrap_or_default(),
            cors_allowed_origin: non_empty("CORS_ALLOWED_ORIGIN"),
            trust_article_markup,
        };

        config.validate()?;
        Ok(config)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Summarize endpoint path, including the base path
    pub fn summarize_path(&self) -> String {
        format!("{}/api/summarize", self.base_path)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SignalError> {
        if !self.openai_base_url.starts_with("http://")
            && !self.openai_base_url.starts_with("https://")
        {
            return Err(SignalError::config(
                "OpenAI base URL must start with http:// or https://",
            ));
        }

        if self.openai_model.trim().is_empty() {
            return Err(SignalError::config("Model name cannot be empty"));
        }

        if self.server_port == 0 {
            return Err(SignalError::config("Server port cannot be 0"));
        }

        if self.article_limit == 0 {
            return Err(SignalError::config("Article limit must be at least 1"));
        }

        if !self.base_path.is_empty()
            && (!self.base_path.starts_with('/') || self.base_path.ends_with('/'))
        {
            return Err(SignalError::config(
                "Base path must start with '/' and must not end with '/'",
            ));
        }

        Ok(())
    }
}

/// "signal", "/signal/" and "/signal" all become "/signal"; "/" becomes ""
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
