use crate::{
    error::{GenerationError, Result},
    models::{ChatCompletionChunk, ChatCompletionRequest, StreamChunk},
    providers::{ChatCompletion, ChunkStream},
};
use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use reqwest::Client;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Streaming client for OpenAI-compatible chat completion endpoints (Groq).
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, PartialEq)]
enum SseLine {
    Chunk(StreamChunk),
    Done,
    Skip,
}

impl ChatClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn parse_sse_line(line: &str) -> Result<SseLine> {
        let line = line.trim();
        let data = match line.strip_prefix("data:") {
            Some(data) => data.trim_start(),
            None => return Ok(SseLine::Skip),
        };

        if data == "[DONE]" {
            return Ok(SseLine::Done);
        }

        let chunk: ChatCompletionChunk = serde_json::from_str(data).map_err(|e| {
            GenerationError::UpstreamGenerationFailure(format!("undecodable stream event: {}", e))
        })?;

        if let Some(error) = chunk.error {
            return Err(GenerationError::UpstreamGenerationFailure(error.to_string()));
        }

        let stream_chunk = match chunk.choices.into_iter().next() {
            Some(choice) => StreamChunk {
                chunk: choice.delta.content.unwrap_or_default(),
                done: choice.finish_reason.is_some(),
                finish_reason: choice.finish_reason,
            },
            None => StreamChunk::text(""),
        };

        Ok(SseLine::Chunk(stream_chunk))
    }

    /// Splits the byte stream into lines and forwards decoded chunks until
    /// `[DONE]`, an error, or the receiver going away.
    async fn pump<S, B>(body: S, tx: mpsc::Sender<Result<StreamChunk>>)
    where
        S: Stream<Item = std::result::Result<B, reqwest::Error>>,
        B: AsRef<[u8]>,
    {
        let mut body = Box::pin(body);
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(next) = body.next().await {
            match next {
                Ok(bytes) => buffer.extend_from_slice(bytes.as_ref()),
                Err(e) => {
                    let _ = tx.send(Err(e.into())).await;
                    return;
                }
            }

            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                if !Self::forward_line(&line, &tx).await {
                    return;
                }
            }
        }

        if !buffer.is_empty() {
            Self::forward_line(&buffer, &tx).await;
        }
    }

    async fn forward_line(line: &[u8], tx: &mpsc::Sender<Result<StreamChunk>>) -> bool {
        let line = String::from_utf8_lossy(line).into_owned();
        match Self::parse_sse_line(&line) {
            Ok(SseLine::Skip) => true,
            Ok(SseLine::Done) => {
                let _ = tx.send(Ok(StreamChunk::finished(None))).await;
                false
            }
            Ok(SseLine::Chunk(chunk)) => tx.send(Ok(chunk)).await.is_ok(),
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                false
            }
        }
    }
}

#[async_trait]
impl ChatCompletion for ChatClient {
    async fn complete_stream(&self, request: ChatCompletionRequest) -> Result<ChunkStream> {
        log::info!("Invoking streaming model: {}", request.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Chat service returned {}: {}", status, body);
            return Err(GenerationError::UpstreamGenerationFailure(format!(
                "chat service returned {}",
                status
            )));
        }

        let (tx, rx) = mpsc::channel(100);
        tokio::spawn(Self::pump(response.bytes_stream(), tx));

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}
