pub mod chat_client;
pub mod image_client;

use crate::{
    config::Config,
    error::{GenerationError, Result},
    models::{ChatCompletionRequest, ImageGenerationResponse, StreamChunk},
};
use async_trait::async_trait;
use futures::stream::Stream;
use reqwest::Client;
use std::pin::Pin;
use std::time::Duration;

pub use chat_client::ChatClient;
pub use image_client::ImageClient;

pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// A hosted chat model that answers with a stream of text fragments.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete_stream(&self, request: ChatCompletionRequest) -> Result<ChunkStream>;
}

/// A hosted text-to-image model. `Ok` with no payload means the model
/// declined to produce an image.
#[async_trait]
pub trait ImageModel: Send + Sync {
    async fn run(&self, prompt: &str) -> Result<ImageGenerationResponse>;
}

#[derive(Clone)]
pub struct ProviderClients {
    chat_client: ChatClient,
    image_client: ImageClient,
}

impl ProviderClients {
    pub fn new(config: &Config) -> Result<Self> {
        if config.upstream_timeout_secs == 0 {
            return Err(GenerationError::ConfigError(
                "UPSTREAM_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .map_err(|e| GenerationError::ConfigError(e.to_string()))?;

        let api_key = config
            .chat
            .api_key
            .clone()
            .ok_or_else(|| GenerationError::ConfigError("GROQ_API_KEY is required".into()))?;

        Ok(Self {
            chat_client: ChatClient::new(http.clone(), &config.chat.base_url, api_key),
            image_client: ImageClient::new(http, &config.image)?,
        })
    }

    pub fn chat(&self) -> &ChatClient {
        &self.chat_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}
