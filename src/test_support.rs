//! Fakes for the upstream traits, shared by unit tests.

use crate::{
    error::{GenerationError, Result},
    models::{ChatCompletionRequest, ImageGenerationResponse, StreamChunk},
    providers::{ChatCompletion, ChunkStream, ImageModel},
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Streams fixed fragments; `Err` entries become upstream failures mid-stream.
pub struct FakeChat {
    fragments: Vec<std::result::Result<String, String>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatCompletionRequest>>,
}

impl FakeChat {
    pub fn streaming(fragments: &[&str]) -> Arc<Self> {
        Self::scripted(fragments.iter().map(|f| Ok(f.to_string())).collect())
    }

    pub fn scripted(fragments: Vec<std::result::Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            fragments,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatCompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for FakeChat {
    async fn complete_stream(&self, request: ChatCompletionRequest) -> Result<ChunkStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);

        let items: Vec<Result<StreamChunk>> = self
            .fragments
            .iter()
            .map(|fragment| match fragment {
                Ok(text) => Ok(StreamChunk::text(text.as_str())),
                Err(e) => Err(GenerationError::UpstreamGenerationFailure(e.clone())),
            })
            .chain(std::iter::once(Ok(StreamChunk::finished(Some("stop".into())))))
            .collect();
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

/// Fails before any fragment is produced.
pub struct FailingChat;

#[async_trait]
impl ChatCompletion for FailingChat {
    async fn complete_stream(&self, _request: ChatCompletionRequest) -> Result<ChunkStream> {
        Err(GenerationError::UpstreamGenerationFailure(
            "connection refused".into(),
        ))
    }
}

pub enum Outcome {
    Image(&'static str),
    Empty,
    Fail,
}

/// Plays back outcomes in order, failing once the script runs out.
pub struct ScriptedModel {
    outcomes: Mutex<VecDeque<Outcome>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(outcomes: Vec<Outcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn always_failing() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn attempts(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageModel for ScriptedModel {
    async fn run(&self, prompt: &str) -> Result<ImageGenerationResponse> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Outcome::Fail);

        match outcome {
            Outcome::Image(data) => Ok(ImageGenerationResponse {
                image_data: Some(data.to_string()),
                model: "fake".to_string(),
            }),
            Outcome::Empty => Ok(ImageGenerationResponse {
                image_data: None,
                model: "fake".to_string(),
            }),
            Outcome::Fail => Err(GenerationError::UpstreamGenerationFailure(
                "model unavailable".into(),
            )),
        }
    }
}
