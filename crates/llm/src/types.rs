use serde::{Deserialize, Serialize};
use signal_common::SignalError;
use std::fmt;
use std::str::FromStr;

/// Reading level controlling the tone and depth of a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReadingLevel {
    Novice,
    Intermediate,
    Expert,
}

impl ReadingLevel {
    /// All levels, in the order they are offered to readers
    pub const ALL: [ReadingLevel; 3] = [
        ReadingLevel::Novice,
        ReadingLevel::Intermediate,
        ReadingLevel::Expert,
    ];

    /// Display name ("Novice")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Novice => "Novice",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
        }
    }

    /// Lowercased name used inside prompts and messages ("novice")
    pub fn prompt_word(&self) -> &'static str {
        match self {
            Self::Novice => "novice",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for ReadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingLevel {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "novice" => Ok(Self::Novice),
            "intermediate" => Ok(Self::Intermediate),
            "expert" => Ok(Self::Expert),
            other => Err(SignalError::invalid_input(format!(
                "Unknown reading level '{}'. Expected one of: Novice, Intermediate, Expert",
                other
            ))),
        }
    }
}

impl TryFrom<String> for ReadingLevel {
    type Error = SignalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReadingLevel> for String {
    fn from(level: ReadingLevel) -> Self {
        level.as_str().to_string()
    }
}

/// Inbound summary request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSummaryRequest")]
pub struct SummaryRequest {
    pub level: ReadingLevel,
    pub text: String,
}

#[derive(Deserialize)]
struct RawSummaryRequest {
    level: ReadingLevel,
    text: String,
}

impl TryFrom<RawSummaryRequest> for SummaryRequest {
    type Error = SignalError;

    fn try_from(raw: RawSummaryRequest) -> Result<Self, Self::Error> {
        SummaryRequest::new(raw.level, raw.text)
    }
}

impl SummaryRequest {
    /// Create a request; the text must contain something besides whitespace
    pub fn new(level: ReadingLevel, text: impl Into<String>) -> Result<Self, SignalError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SignalError::invalid_input("Text to summarize cannot be empty"));
        }
        Ok(Self { level, text })
    }
}

/// Outcome of one summary request: `{ summary }` or `{ error }`, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryResult {
    Success { summary: String },
    Failure { error: String },
}

impl SummaryResult {
    pub fn success(summary: impl Into<String>) -> Self {
        Self::Success {
            summary: summary.into(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Responses API request
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    /// Model name (e.g., "gpt-4o-mini")
    pub model: String,

    /// Prompt text
    pub input: String,
}

/// Responses API response; only the aggregated output text is read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsesResponse {
    /// Aggregated output text
    #[serde(default)]
    pub output_text: Option<String>,
}

impl ResponsesResponse {
    /// Trimmed output text, empty when the field is absent
    pub fn summary_text(&self) -> String {
        self.output_text
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }
}
