/// Signal error types
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Required configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external LLM API could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// The external LLM API answered with a non-success status.
    /// Holds the raw response body.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A page template failed to render
    #[error("Render error: {0}")]
    Render(String),

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SignalError {
    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Create upstream error
    pub fn upstream<S: Into<String>>(body: S) -> Self {
        Self::Upstream(body.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create render error
    pub fn render<S: Into<String>>(msg: S) -> Self {
        Self::Render(msg.into())
    }

    /// Create serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }
}

// HTTP response conversion
impl SignalError {
    /// Get HTTP status code
    ///
    /// Request bodies are decoded by the JSON extractor; `Json` only arises
    /// from server-side data.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Json(_) => 500,
            Self::Config(_) => 500,
            Self::Transport(_) => 500,
            Self::Upstream(_) => 500,
            Self::Render(_) => 500,
            Self::Serialization(_) => 500,
            Self::Io(_) => 500,
            Self::Other(_) => 500,
        }
    }

    /// Message placed in the `error` field of a failed response.
    ///
    /// Upstream failures surface the raw body untouched, transport failures
    /// the underlying transport text.
    pub fn public_message(&self) -> String {
        match self {
            Self::Config(msg)
            | Self::Transport(msg)
            | Self::Upstream(msg)
            | Self::InvalidInput(msg)
            | Self::Serialization(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
