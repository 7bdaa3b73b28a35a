use signal_common::{AppConfig, Result, SignalError};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::client::OpenAiClient;
use crate::llm_trait::LlmClient;
use crate::prompts::summary_prompt;
use crate::types::{ResponsesRequest, SummaryRequest, SummaryResult};

/// Reading-level summarizer in front of the external LLM API
///
/// Stateless between calls; concurrent requests share nothing but the
/// underlying HTTP connection pool.
#[derive(Clone)]
pub struct SummaryService {
    client: Arc<dyn LlmClient>,
    api_key: Option<String>,
    model: String,
}

impl SummaryService {
    /// Create new service. A missing `api_key` is only reported when a
    /// summary is requested.
    pub fn new(
        client: Arc<dyn LlmClient>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key,
            model: model.into(),
        }
    }

    /// Build the service with an OpenAI client from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = OpenAiClient::new(&config.openai_base_url)?;
        Ok(Self::new(
            Arc::new(client),
            config.openai_api_key.clone(),
            &config.openai_model,
        ))
    }

    /// Model identifier sent upstream
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether a credential is configured
    pub fn has_credential(&self) -> bool {
        self.credential().is_ok()
    }

    fn credential(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SignalError::config("Missing OPENAI_API_KEY environment variable"))
    }

    /// Summarize `request.text` at `request.level`.
    ///
    /// Fails with `Config` before any external call when no credential is
    /// configured. A success without output text yields an empty summary.
    pub async fn summarize(&self, request: &SummaryRequest) -> Result<String> {
        let request_id = Uuid::new_v4();
        let span = info_span!("summarize", %request_id, level = %request.level);

        async {
            let api_key = self.credential().map_err(|e| {
                warn!("Summary requested without a configured credential");
                e
            })?;

            let upstream_request = ResponsesRequest {
                model: self.model.clone(),
                input: summary_prompt(request.level, &request.text),
            };

            info!("Requesting summary - Text length: {} chars", request.text.len());

            let response = self.client.create_response(api_key, &upstream_request).await?;
            let summary = response.summary_text();

            if response.output_text.is_none() {
                warn!("LLM response had no output_text; returning empty summary");
            }
            info!("Summary generated - Length: {} chars", summary.len());

            Ok::<String, SignalError>(summary)
        }
        .instrument(span)
        .await
    }

    /// Summarize and fold the outcome into the wire result shape
    pub async fn respond(&self, request: &SummaryRequest) -> (u16, SummaryResult) {
        match self.summarize(request).await {
            Ok(summary) => (200, SummaryResult::success(summary)),
            Err(e) => {
                warn!("Summary failed: {}", e);
                (e.status_code(), SummaryResult::failure(e.public_message()))
            }
        }
    }
}
