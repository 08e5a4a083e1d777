use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub chunk: String,
    pub done: bool,
    pub finish_reason: Option<String>,
}

impl StreamChunk {
    pub fn text(chunk: impl Into<String>) -> Self {
        Self {
            chunk: chunk.into(),
            done: false,
            finish_reason: None,
        }
    }

    pub fn finished(reason: Option<String>) -> Self {
        Self {
            chunk: String::new(),
            done: true,
            finish_reason: reason,
        }
    }
}

/// Body of every failed HTTP response: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
