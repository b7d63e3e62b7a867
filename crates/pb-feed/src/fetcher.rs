use std::sync::Arc;

use async_trait::async_trait;
use pb_types::Post;

use crate::config::FeedConfig;
use crate::error::FeedResult;
use crate::http::HttpFeedFetcher;

/// Source of remote, read-only posts.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch the whole remote collection, upstream order preserved.
    async fn fetch_all(&self) -> FeedResult<Vec<Post>>;
}

/// A fixed set of remote posts, for tests and offline demos.
#[derive(Clone, Debug, Default)]
pub struct StaticFeed {
    posts: Vec<Post>,
}

impl StaticFeed {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl FeedFetcher for StaticFeed {
    async fn fetch_all(&self) -> FeedResult<Vec<Post>> {
        Ok(self.posts.clone())
    }
}

/// Feed turned off in configuration. Always empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledFeed;

#[async_trait]
impl FeedFetcher for DisabledFeed {
    async fn fetch_all(&self) -> FeedResult<Vec<Post>> {
        Ok(Vec::new())
    }
}

pub fn feed_from_config(config: &FeedConfig) -> FeedResult<Arc<dyn FeedFetcher>> {
    if !config.enabled {
        return Ok(Arc::new(DisabledFeed));
    }
    Ok(Arc::new(HttpFeedFetcher::new(config)?))
}
