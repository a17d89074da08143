use thiserror::Error;

/// Transport or remote failure talking to the generative service.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("service returned no text")]
    EmptyResponse,

    #[error("API key variable '{0}' is not set")]
    MissingApiKey(String),
}

/// The raw response could not be turned into artifacts.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object found in response: {detail}")]
    Parse { raw: String, detail: String },

    #[error("response JSON had no html, css or javascript content")]
    Validation { raw: String },
}

impl ExtractError {
    pub fn raw(&self) -> &str {
        match self {
            ExtractError::Parse { raw, .. } | ExtractError::Validation { raw } => raw,
        }
    }
}

/// Anything that ends a single generation attempt.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("{0}")]
    Extract(#[from] ExtractError),
}

impl PipelineError {
    pub fn retry_hint(&self) -> Option<&'static str> {
        match self {
            PipelineError::Generation(_) => None,
            PipelineError::Extract(_) => {
                Some("The model answered in an unexpected format. Try generating again.")
            }
        }
    }

    /// Raw model output kept for diagnostics, when there was any.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            PipelineError::Generation(_) => None,
            PipelineError::Extract(e) => Some(e.raw()),
        }
    }

    /// Text shown to the user.
    pub fn user_message(&self) -> String {
        match self.retry_hint() {
            Some(hint) => format!("{self}. {hint}"),
            None => self.to_string(),
        }
    }
}
