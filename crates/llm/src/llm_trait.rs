use crate::types::{ResponsesRequest, ResponsesResponse};
use async_trait::async_trait;
use signal_common::Result;

/// Common trait for LLM clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Issue one text-generation request.
    ///
    /// Transport failures map to `SignalError::Transport`, non-success
    /// statuses to `SignalError::Upstream` carrying the raw body.
    async fn create_response(
        &self,
        api_key: &str,
        request: &ResponsesRequest,
    ) -> Result<ResponsesResponse>;
}
