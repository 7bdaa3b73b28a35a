use serde::{Deserialize, Serialize};

/// Error body shared by every JSON endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    /// Whether summaries can be requested at all
    pub summaries_configured: bool,

    pub articles: usize,
}
