use pb_server::API_KEY_HEADER;
use pb_types::{NewPost, Post, PostPatch};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Thin client for the Postboard HTTP API.
#[derive(Clone, Debug)]
pub struct PostsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PostsClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
        };
        Err(ClientError::Api { status: status.as_u16(), message })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Post>, ClientError> {
        let response = Self::send(self.http.get(self.url("/posts"))).await?;
        Self::decode(response).await
    }

    pub async fn get(&self, id: &str) -> Result<Post, ClientError> {
        let response = Self::send(self.http.get(self.url(&format!("/posts/{id}")))).await?;
        Self::decode(response).await
    }

    pub async fn create(&self, post: &NewPost) -> Result<Post, ClientError> {
        let request = self.with_key(self.http.post(self.url("/posts")).json(post));
        let response = Self::send(request).await?;
        Self::decode(response).await
    }

    pub async fn update(&self, id: &str, patch: &PostPatch) -> Result<Post, ClientError> {
        let request = self.with_key(self.http.put(self.url(&format!("/posts/{id}"))).json(patch));
        let response = Self::send(request).await?;
        Self::decode(response).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let request = self.with_key(self.http.delete(self.url(&format!("/posts/{id}"))));
        Self::send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_feed::StaticFeed;
    use pb_server::{build_router, AppState, SharedSecretAuth};
    use pb_store::InMemoryPostStore;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    async fn spawn_server() -> String {
        let state = AppState {
            store: Arc::new(InMemoryPostStore::new()),
            feed: Arc::new(StaticFeed::new(vec![Post::remote(1, "filler", "from the feed")])),
            auth: Arc::new(SharedSecretAuth::new(Some("k".into()))),
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn full_lifecycle() {
        let client = PostsClient::new(spawn_server().await, Some("k".into()));

        let created = client.create(&NewPost::new("Hello", "one two three").unwrap()).await.unwrap();
        assert_eq!(created.title, "Hello");

        let listed = client.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, created.id);
        assert!(listed[1].id.is_remote());

        let id = created.id.to_string();
        let updated = client
            .update(&id, &PostPatch::new(Some("Renamed".into()), None))
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.body, "one two three");

        client.delete(&id).await.unwrap();
        let err = client.get(&id).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn missing_key_surfaces_server_message() {
        let client = PostsClient::new(spawn_server().await, None);
        let err = client.create(&NewPost::new("T", "B").unwrap()).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("Invalid API Key"));
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = PostsClient::new(format!("http://{addr}"), None);
        assert!(matches!(client.list().await, Err(ClientError::Transport(_))));
    }
}
