use crate::{
    error::{GenerationError, Result},
    generators::extract_json,
    logger,
    models::{count_post_shaped, ChatCompletionRequest, ChatMessage, GenerationParams},
    prompts::POSTS_SYSTEM_PROMPT,
    providers::ChatCompletion,
};
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;

/// Turns a free-text instruction into feed posts through a streaming chat model.
#[derive(Clone)]
pub struct PostGenerator {
    client: Arc<dyn ChatCompletion>,
    params: GenerationParams,
}

impl PostGenerator {
    pub fn new(client: Arc<dyn ChatCompletion>, params: GenerationParams) -> Self {
        Self { client, params }
    }

    /// Single attempt: an upstream error or unparseable output ends the call.
    pub async fn generate(&self, input: &str) -> Result<Value> {
        if input.trim().is_empty() {
            return Err(GenerationError::InvalidInput);
        }

        let request = ChatCompletionRequest {
            model: self.params.model.clone(),
            messages: vec![
                ChatMessage::system(POSTS_SYSTEM_PROMPT),
                ChatMessage::user(input),
            ],
            temperature: self.params.temperature,
            top_p: self.params.top_p,
            max_tokens: self.params.max_tokens,
            stream: true,
        };

        let _timer = logger::timer("post generation");
        let mut stream = self.client.complete_stream(request).await?;

        let mut full_response = String::new();
        let mut chunk_count = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if !chunk.chunk.is_empty() {
                full_response.push_str(&chunk.chunk);
                chunk_count += 1;
            }
            if let Some(reason) = chunk.finish_reason {
                log::debug!("🏁 Finish reason: {}", reason);
            }
        }

        let full_response = full_response.trim();
        log::info!(
            "📊 Received {} chunks, {} characters",
            chunk_count,
            full_response.len()
        );
        log::debug!("📝 Completion text: {}", full_response);

        let parsed: Value = serde_json::from_str(extract_json(full_response))
            .map_err(|e| GenerationError::MalformedGenerationOutput(e.to_string()))?;

        match count_post_shaped(&parsed) {
            Some((matching, total)) if matching < total => log::warn!(
                "⚠️  Only {} of {} generated items have the post shape",
                matching,
                total
            ),
            Some((_, total)) => log::info!("✅ Generated {} posts", total),
            None => log::warn!("⚠️  Generated JSON is not an array"),
        }

        Ok(parsed)
    }
}
