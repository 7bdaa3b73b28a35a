use reqwest::Client;
use signal_common::Result;
use signal_llm::{ReadingLevel, SummaryResult};
use std::fmt;
use tracing::{debug, warn};

use crate::markup::strip_markup;

/// Result of one summary request, as shown to the reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    pub level: ReadingLevel,
    /// Summary text, or the failure detail kept for logs
    pub result: std::result::Result<String, String>,
}

impl SummaryOutcome {
    /// Summary text on success
    pub fn summary(&self) -> Option<&str> {
        self.result.as_deref().ok()
    }

    /// Message displayed to the reader. Failures are generic and only
    /// mention the requested level.
    pub fn message(&self) -> String {
        match &self.result {
            Ok(summary) => format!("{} summary: {}", self.level, summary),
            Err(_) => format!("Error generating {} summary", self.level.prompt_word()),
        }
    }
}

impl fmt::Display for SummaryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Client for the summarize endpoint
#[derive(Debug, Clone)]
pub struct SummaryRequester {
    endpoint: String,
    client: Client,
}

impl SummaryRequester {
    /// Create requester posting to `endpoint` (e.g. "http://localhost:3000/api/summarize")
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Strip markup from `text` and request one summary at `level`.
    ///
    /// Exactly one network call per invocation; nothing is cached.
    pub async fn request(&self, level: ReadingLevel, text: &str) -> SummaryOutcome {
        let plain = strip_markup(text);
        debug!(
            "Requesting {} summary - {} chars after stripping markup",
            level,
            plain.len()
        );

        let result = self.send(level, &plain).await;
        if let Err(detail) = &result {
            warn!("{} summary request failed: {}", level, detail);
        }

        SummaryOutcome { level, result }
    }

    async fn send(&self, level: ReadingLevel, text: &str) -> std::result::Result<String, String> {
        let body = serde_json::json!({ "level": level, "text": text });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Request failed with status {}", status));
        }

        let result: SummaryResult = response.json().await.map_err(|e| e.to_string())?;
        match result {
            SummaryResult::Success { summary } => Ok(summary),
            SummaryResult::Failure { error } => Err(error),
        }
    }
}
