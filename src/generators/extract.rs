use once_cell::sync::Lazy;
use regex::Regex;

static JSON_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```json([\s\S]*?)```").expect("fence pattern is valid")
});

/// Returns the interior of the first ```` ```json ```` block, trimmed, or the
/// whole trimmed text when there is none.
pub fn extract_json(text: &str) -> &str {
    let text = text.trim();
    JSON_FENCE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map_or(text, |interior| interior.as_str().trim())
}
