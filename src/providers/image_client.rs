use crate::{
    config::ImageConfig,
    error::{GenerationError, Result},
    models::{ImageGenerationResponse, WorkersAiResponse},
    providers::ImageModel,
};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::json;

/// Cloudflare Workers AI text-to-image client.
#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    base_url: String,
    account_id: String,
    api_token: String,
    model: String,
}

impl ImageClient {
    pub fn new(client: Client, config: &ImageConfig) -> Result<Self> {
        let account_id = config.account_id.clone().ok_or_else(|| {
            GenerationError::ConfigError("CLOUDFLARE_ACCOUNT_ID is required".into())
        })?;
        let api_token = config.api_token.clone().ok_or_else(|| {
            GenerationError::ConfigError("CLOUDFLARE_API_TOKEN is required".into())
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            account_id,
            api_token,
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url.trim_end_matches('/'),
            self.account_id,
            self.model
        )
    }
}

#[async_trait]
impl ImageModel for ImageClient {
    async fn run(&self, prompt: &str) -> Result<ImageGenerationResponse> {
        log::info!("Generating image with model: {}", self.model);
        log::debug!("Image prompt: {}", prompt);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_token)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Image service returned {}: {}", status, body);
            return Err(GenerationError::UpstreamGenerationFailure(format!(
                "image service returned {}",
                status
            )));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.starts_with("application/json"));

        // flux answers with a JSON envelope, diffusion models with raw bytes.
        let image_data = if is_json {
            let body: WorkersAiResponse = response.json().await?;
            if !body.success {
                log::warn!("Image service reported failure: {:?}", body.errors);
            }
            body.result.and_then(|result| result.image)
        } else {
            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                None
            } else {
                Some(general_purpose::STANDARD.encode(&bytes))
            }
        };

        Ok(ImageGenerationResponse {
            image_data,
            model: self.model.clone(),
        })
    }
}
