use crate::{
    error::{GenerationError, Result},
    models::DataUri,
    prompts::{image_templates, PromptTemplate, TemplateSelector, UniformRandom},
    providers::ImageModel,
};
use std::sync::Arc;

/// Also the upper bound on attempts per request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Requests an image for a theme, retrying immediately with a freshly selected
/// template until a payload arrives or the attempt budget is spent.
pub struct ImageGenerator {
    model: Arc<dyn ImageModel>,
    templates: Vec<PromptTemplate>,
    selector: Box<dyn TemplateSelector>,
    max_attempts: u32,
}

impl ImageGenerator {
    pub fn new(model: Arc<dyn ImageModel>) -> Self {
        Self {
            model,
            templates: image_templates(),
            selector: Box::new(UniformRandom),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_selector(mut self, selector: Box<dyn TemplateSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.clamp(1, DEFAULT_MAX_ATTEMPTS);
        self
    }

    /// An empty catalog is ignored.
    pub fn with_templates(mut self, templates: Vec<PromptTemplate>) -> Self {
        if !templates.is_empty() {
            self.templates = templates;
        }
        self
    }

    pub async fn generate_image(&self, theme: &str) -> Result<DataUri> {
        let mut attempt = 0;

        while attempt < self.max_attempts {
            let index = self.selector.select(self.templates.len()) % self.templates.len();
            let prompt = self.templates[index].render(theme);

            match self.model.run(&prompt).await {
                Ok(response) => match response.payload() {
                    Some(payload) => {
                        log::info!(
                            "✅ Image generated with {} on attempt {}",
                            response.model,
                            attempt + 1
                        );
                        return Ok(DataUri::jpeg_from_base64(payload));
                    }
                    None => log::warn!("⚠️  Attempt {} returned no image", attempt + 1),
                },
                Err(e) => log::error!("❌ Image request failed on attempt {}: {}", attempt + 1, e),
            }

            attempt += 1;
        }

        Err(GenerationError::RetriesExhausted { attempts: attempt })
    }
}
