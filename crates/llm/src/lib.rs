//! Signal LLM Integration
//!
//! OpenAI Responses API client and reading-level summaries

mod client;
mod llm_trait;
mod prompts;
mod summarize;
mod types;

pub use client::OpenAiClient;
pub use llm_trait::LlmClient;
pub use prompts::summary_prompt;
pub use summarize::SummaryService;
pub use types::{ReadingLevel, ResponsesRequest, ResponsesResponse, SummaryRequest, SummaryResult};
