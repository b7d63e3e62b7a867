use std::time::Duration;

use async_trait::async_trait;
use pb_types::Post;
use serde::Deserialize;
use tracing::debug;

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::fetcher::FeedFetcher;

/// Shape of one upstream item. `userId` and any other fields are ignored.
#[derive(Deserialize)]
struct UpstreamPost {
    id: i64,
    title: String,
    body: String,
}

/// Fetches the placeholder feed over HTTP.
#[derive(Clone, Debug)]
pub struct HttpFeedFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpFeedFetcher {
    pub fn new(config: &FeedConfig) -> FeedResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FeedError::Config(e.to_string()))?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch_all(&self) -> FeedResult<Vec<Post>> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;
        let upstream: Vec<UpstreamPost> =
            serde_json::from_slice(&bytes).map_err(|e| FeedError::Decode(e.to_string()))?;

        debug!(count = upstream.len(), url = %self.url, "fetched remote feed");
        Ok(upstream
            .into_iter()
            .map(|item| Post::remote(item.id, item.title, item.body))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use pb_types::{PostId, Provenance};
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/posts")
    }

    fn fetcher(url: String) -> HttpFeedFetcher {
        HttpFeedFetcher::new(&FeedConfig { enabled: true, url, timeout_secs: 5 }).unwrap()
    }

    #[tokio::test]
    async fn rewrites_ids_and_drops_extra_fields() {
        let body = r#"[
            {"userId": 1, "id": 1, "title": "sunt aut", "body": "quia et"},
            {"userId": 1, "id": 2, "title": "qui est", "body": "est rerum"}
        ]"#;
        let url = serve(Router::new().route("/posts", get(move || async move { body }))).await;

        let posts = fetcher(url).fetch_all().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, PostId::remote(1));
        assert_eq!(posts[1].id, PostId::remote(2));
        assert_eq!(posts[0].title, "sunt aut");
        assert!(posts.iter().all(|p| p.created_at.is_none()));
        assert!(posts.iter().all(|p| p.source == Provenance::Remote));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let url = serve(Router::new().route(
            "/posts",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        ))
        .await;
        assert!(matches!(fetcher(url).fetch_all().await, Err(FeedError::Status(503))));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let url = serve(Router::new().route("/posts", get(|| async { "{\"not\": \"a list\"}" }))).await;
        assert!(matches!(fetcher(url).fetch_all().await, Err(FeedError::Decode(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let result = fetcher(format!("http://{addr}/posts")).fetch_all().await;
        assert!(matches!(result, Err(FeedError::Transport(_))));
    }
}
