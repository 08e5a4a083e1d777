use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Input is required")]
    InvalidInput,

    #[error("Upstream generation failed: {0}")]
    UpstreamGenerationFailure(String),

    #[error("Generated output is not valid JSON: {0}")]
    MalformedGenerationOutput(String),

    /// Display text is part of the public response body and must stay fixed.
    #[error("Failed to generate an image after multiple attempts.")]
    RetriesExhausted { attempts: u32 },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl GenerationError {
    /// Message safe to hand back to an HTTP caller.
    pub fn public_message(&self) -> String {
        match self {
            GenerationError::InvalidInput | GenerationError::RetriesExhausted { .. } => {
                self.to_string()
            }
            GenerationError::UpstreamGenerationFailure(_) => {
                "Upstream generation failed".to_string()
            }
            GenerationError::MalformedGenerationOutput(_) => {
                "Generated output was not valid JSON".to_string()
            }
            GenerationError::ConfigError(_) => "Internal server error".to_string(),
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            GenerationError::InvalidInput => 400,
            GenerationError::UpstreamGenerationFailure(_)
            | GenerationError::MalformedGenerationOutput(_) => 502,
            GenerationError::RetriesExhausted { .. } | GenerationError::ConfigError(_) => 500,
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::UpstreamGenerationFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_messages_hide_upstream_details() {
        let err = GenerationError::UpstreamGenerationFailure("401 bad key sk-123".into());
        assert_eq!(err.public_message(), "Upstream generation failed");
        assert_eq!(err.http_status(), 502);

        let err = GenerationError::ConfigError("GROQ_API_KEY missing".into());
        assert_eq!(err.public_message(), "Internal server error");
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(GenerationError::InvalidInput.public_message(), "Input is required");
        assert_eq!(
            GenerationError::RetriesExhausted { attempts: 3 }.public_message(),
            "Failed to generate an image after multiple attempts."
        );
    }
}
