use crate::error::GenerationError;
use rand::Rng;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const DEFAULT_THEME: &str = "mystical warrior";

pub const POSTS_SYSTEM_PROMPT: &str = r#"You are an AI that generates JSON-formatted cryptocurrency-related social media posts. Each post should include an `id`, `imageUrl`, `caption`, `crypto`, `timestamp`, `likes`, `comments`, `shares`, `username`, `userHandle`, `verified` status, and `avatarUrl`.

Follow this structure:
```json
{
  "id": "1",
  "imageUrl": "/placeholder.svg?height=600&width=800",
  "caption": "Just bought more #Bitcoin during this dip! 📉➡️📈 Remember, it's not about timing the market, it's about time IN the market. HODL strong, friends! 💎🙌 #Crypto #BTC #ToTheMoon",
  "crypto": "Bitcoin",
  "timestamp": "2h ago",
  "likes": 3452,
  "comments": 128,
  "shares": 76,
  "username": "BitcoinBaron",
  "userHandle": "bitcoin_baron",
  "verified": true,
  "avatarUrl": "/placeholder.svg?height=40&width=40"
}
```

### Guidelines:
1. **`id`**: A unique string-based identifier (e.g., "1", "2", "3", etc.).
2. **`imageUrl`**: A placeholder image with dimensions 600x800.
3. **`caption`**: A dynamic crypto-related post, including hashtags and emojis.
4. **`crypto`**: The associated cryptocurrency, such as "Bitcoin", "Ethereum", "Dogecoin", or "Solana".
5. **`timestamp`**: A relative time indicator like "2h ago", "5h ago", "1d ago", "3d ago".
6. **`likes`**: A random integer between 1,000 and 10,000.
7. **`comments`**: A random integer between 50 and 500.
8. **`shares`**: A random integer between 20 and 250.
9. **`username`**: A creative crypto-related name.
10. **`userHandle`**: A lowercase handle derived from the username, replacing spaces with underscores.
11. **`verified`**: A boolean value (`true` or `false`) indicating account verification.
12. **`avatarUrl`**: A placeholder image with dimensions 40x40.

Generate a JSON array containing multiple posts that match this format, ensuring variety in usernames, captions, and engagement metrics."#;

const THEME_SLOT: &str = "{theme}";

const IMAGE_TEMPLATES: [&str; 25] = [
    "Woman in a {theme} outfit, smiling.",
    "Stylish woman with a {theme} theme.",
    "Cute woman dressed in {theme} style.",
    "Elegant woman in a {theme} dress.",
    "Woman with {theme} vibes, posing.",
    "Chill woman wearing {theme}-inspired clothes.",
    "Trendy woman with a {theme} look.",
    "Fantasy woman with a {theme} touch.",
    "Woman with {theme} aesthetic, standing confidently.",
    "Cool woman rocking a {theme} outfit.",
    "Casual woman with a {theme} feel.",
    "Mysterious woman with {theme} details.",
    "Sci-fi woman with {theme} accessories.",
    "Woman in a dreamy {theme} setting.",
    "Sporty woman with a {theme} twist.",
    "Charming woman inspired by {theme}.",
    "Cozy woman in a {theme} hoodie.",
    "Daring woman in a {theme} uniform.",
    "Elegant woman in a {theme} kimono.",
    "Edgy woman with {theme} attitude.",
    "Cheerful woman in a {theme} festival outfit.",
    "Magical woman with a {theme} wand.",
    "Street-style woman in {theme} fashion.",
    "Classy woman in a {theme} gown.",
    "Laid-back woman with {theme} accessories.",
];

/// A prompt with a single `{theme}` substitution slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn render(&self, theme: &str) -> String {
        self.text.replacen(THEME_SLOT, theme, 1)
    }
}

pub fn image_templates() -> Vec<PromptTemplate> {
    IMAGE_TEMPLATES.iter().map(|t| PromptTemplate::new(*t)).collect()
}

/// Picks which catalog entry the next image attempt uses.
pub trait TemplateSelector: Send + Sync {
    /// `catalog_len` is always non-zero; the result must be below it.
    fn select(&self, catalog_len: usize) -> usize;
}

#[derive(Debug, Default)]
pub struct UniformRandom;

impl TemplateSelector for UniformRandom {
    fn select(&self, catalog_len: usize) -> usize {
        rand::thread_rng().gen_range(0..catalog_len)
    }
}

#[derive(Debug, Default)]
pub struct RoundRobin {
    next: AtomicUsize,
}

impl TemplateSelector for RoundRobin {
    fn select(&self, catalog_len: usize) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % catalog_len
    }
}

#[derive(Debug)]
pub struct Fixed(pub usize);

impl TemplateSelector for Fixed {
    fn select(&self, catalog_len: usize) -> usize {
        self.0 % catalog_len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionStrategy {
    #[default]
    UniformRandom,
    RoundRobin,
    Fixed(usize),
}

impl SelectionStrategy {
    pub fn build(self) -> Box<dyn TemplateSelector> {
        match self {
            SelectionStrategy::UniformRandom => Box::new(UniformRandom),
            SelectionStrategy::RoundRobin => Box::new(RoundRobin::default()),
            SelectionStrategy::Fixed(index) => Box::new(Fixed(index)),
        }
    }
}

impl FromStr for SelectionStrategy {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        match value.as_str() {
            "random" | "uniform-random" => Ok(SelectionStrategy::UniformRandom),
            "round-robin" | "roundrobin" => Ok(SelectionStrategy::RoundRobin),
            other => other
                .strip_prefix("fixed:")
                .and_then(|index| index.parse().ok())
                .map(SelectionStrategy::Fixed)
                .ok_or_else(|| {
                    GenerationError::ConfigError(format!(
                        "Unknown template selection strategy: {}",
                        s
                    ))
                }),
        }
    }
}
