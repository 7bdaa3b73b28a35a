use signal_common::{AppConfig, Result};
use signal_llm::SummaryService;

use crate::articles::ArticleStore;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Summary service in front of the LLM API
    pub summaries: SummaryService,

    /// Article dataset
    pub articles: ArticleStore,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig) -> Result<Self> {
        let summaries = SummaryService::from_config(&config)?;
        let articles = ArticleStore::load(&config)?;

        Ok(Self::with_parts(config, summaries, articles))
    }

    /// Assemble state from prebuilt parts
    pub fn with_parts(config: AppConfig, summaries: SummaryService, articles: ArticleStore) -> Self {
        Self {
            config,
            summaries,
            articles,
        }
    }
}
