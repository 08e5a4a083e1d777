//! Backend for the OnlyCoins demo feed.
//!
//! Two stateless generators sit behind an actix-web server:
//! [`PostGenerator`] streams a chat completion and parses the JSON it embeds,
//! [`ImageGenerator`] asks an image model for a themed picture with a bounded
//! number of immediate retries.

pub mod config;
pub mod error;
pub mod generators;
pub mod logger;
pub mod models;
pub mod prompts;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ChatConfig, Config, ImageConfig};
pub use error::{GenerationError, Result};
pub use generators::{ImageGenerator, PostGenerator};
pub use models::*;
pub use prompts::{SelectionStrategy, TemplateSelector};
pub use providers::{ChatClient, ChatCompletion, ImageClient, ImageModel, ProviderClients};
