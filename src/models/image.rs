use serde::{Deserialize, Serialize};
use std::fmt;

pub const DATA_URI_PREFIX: &str = "data:image/jpeg;charset=utf-8;base64,";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageQuery {
    pub name: Option<String>,
}

impl ImageQuery {
    /// First `name` pair wins; any other keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            name: pairs
                .into_iter()
                .find(|(key, _)| key == "name")
                .map(|(_, value)| value),
        }
    }

    /// The requested theme, or `default` when absent or empty.
    pub fn theme_or(self, default: &str) -> String {
        self.name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ImageGenerationResponse {
    pub image_data: Option<String>, // Base64 encoded
    pub model: String,
}

impl ImageGenerationResponse {
    pub fn payload(&self) -> Option<&str> {
        self.image_data.as_deref().filter(|data| !data.is_empty())
    }
}

/// Workers AI JSON envelope, e.g. `{"result":{"image":"..."},"success":true}`.
#[derive(Debug, Deserialize)]
pub struct WorkersAiResponse {
    pub result: Option<WorkersAiImage>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct WorkersAiImage {
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DataUri(String);

impl DataUri {
    pub fn jpeg_from_base64(payload: &str) -> Self {
        DataUri(format!("{}{}", DATA_URI_PREFIX, payload))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageResult {
    #[serde(rename = "dataURI")]
    pub data_uri: DataUri,
}
