use crate::{generators::images::DEFAULT_MAX_ATTEMPTS, prompts::SelectionStrategy};
use std::env;

pub const DEFAULT_CHAT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_IMAGE_MODEL: &str = "@cf/black-forest-labs/flux-1-schnell";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub account_id: Option<String>,
    pub api_token: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_attempts: u32,
    pub strategy: SelectionStrategy,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub upstream_timeout_secs: u64,
    pub chat: ChatConfig,
    pub image: ImageConfig,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.trim().parse().ok())
}

impl Default for ChatConfig {
    fn default() -> Self {
        ChatConfig {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.6,
            top_p: 0.95,
            max_tokens: 4096,
        }
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        ChatConfig {
            api_key: env::var("GROQ_API_KEY").ok(),
            base_url: env::var("GROQ_BASE_URL").unwrap_or(defaults.base_url),
            model: env::var("GROQ_MODEL").unwrap_or(defaults.model),
            temperature: env_parse("GROQ_TEMPERATURE").unwrap_or(defaults.temperature),
            top_p: env_parse("GROQ_TOP_P").unwrap_or(defaults.top_p),
            max_tokens: env_parse("GROQ_MAX_TOKENS").unwrap_or(defaults.max_tokens),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            account_id: None,
            api_token: None,
            base_url: "https://api.cloudflare.com/client/v4".to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            strategy: SelectionStrategy::UniformRandom,
        }
    }
}

impl ImageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let strategy = match env::var("IMAGE_TEMPLATE_STRATEGY") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!("⚠️  {}, falling back to uniform random", e);
                defaults.strategy
            }),
            Err(_) => defaults.strategy,
        };

        let max_attempts = match env_parse::<u32>("IMAGE_MAX_ATTEMPTS") {
            Some(0) | None => defaults.max_attempts,
            Some(n) if n > DEFAULT_MAX_ATTEMPTS => {
                log::warn!(
                    "⚠️  IMAGE_MAX_ATTEMPTS={} exceeds the limit, using {}",
                    n,
                    DEFAULT_MAX_ATTEMPTS
                );
                DEFAULT_MAX_ATTEMPTS
            }
            Some(n) => n,
        };

        ImageConfig {
            account_id: env::var("CLOUDFLARE_ACCOUNT_ID").ok(),
            api_token: env::var("CLOUDFLARE_API_TOKEN").ok(),
            base_url: env::var("CLOUDFLARE_BASE_URL").unwrap_or(defaults.base_url),
            model: env::var("IMAGE_MODEL").unwrap_or(defaults.model),
            max_attempts,
            strategy,
        }
    }

    pub fn with_credentials(
        mut self,
        account_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        self.account_id = Some(account_id.into());
        self.api_token = Some(api_token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: None,
            port: None,
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            chat: ChatConfig::default(),
            image: ImageConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            host: env::var("HOST").ok(),
            port: env_parse("PORT"),
            upstream_timeout_secs: env_parse("UPSTREAM_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            chat: ChatConfig::from_env(),
            image: ImageConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_upstream_timeout(mut self, secs: u64) -> Self {
        self.upstream_timeout_secs = secs;
        self
    }

    pub fn with_chat(mut self, config: ChatConfig) -> Self {
        self.chat = config;
        self
    }

    pub fn with_image(mut self, config: ImageConfig) -> Self {
        self.image = config;
        self
    }

    pub fn bind_address(&self) -> (String, u16) {
        (
            self.host.clone().unwrap_or_else(|| "127.0.0.1".to_string()),
            self.port.unwrap_or(8080),
        )
    }
}
