use serde::{Deserialize, Serialize};

/// Shape the feed expects for each generated item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub image_url: String,
    pub caption: String,
    pub crypto: String,
    pub timestamp: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub username: String,
    pub user_handle: String,
    pub verified: bool,
    pub avatar_url: String,
}

/// Counts array elements that deserialize as a [`Post`]. Returns `None` when
/// the value is not an array.
pub fn count_post_shaped(value: &serde_json::Value) -> Option<(usize, usize)> {
    let items = value.as_array()?;
    let matching = items
        .iter()
        .filter(|item| Post::deserialize(*item).is_ok())
        .count();
    Some((matching, items.len()))
}
