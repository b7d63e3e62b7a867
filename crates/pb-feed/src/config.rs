use serde::{Deserialize, Serialize};

pub const DEFAULT_FEED_URL: &str = "https://jsonplaceholder.typicode.com/posts";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enabled: bool,
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_FEED_URL.into(),
            timeout_secs: 10,
        }
    }
}
