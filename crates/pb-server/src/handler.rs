use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::Json;
use pb_feed::FeedFetcher;
use pb_store::PostStore;
use pb_types::{NewPost, Post, PostPatch};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::auth::{Action, AuthProvider, Credentials};
use crate::error::{ApiError, ApiResult};

pub const COLLECTION_ALLOW: &str = "GET, POST";
pub const ITEM_ALLOW: &str = "GET, PUT, DELETE";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PostStore>,
    pub feed: Arc<dyn FeedFetcher>,
    pub auth: Arc<dyn AuthProvider>,
}

/// Body schema for create and update. Both fields are optional at the
/// schema level; each operation decides which it requires.
#[derive(Debug, Default, Deserialize)]
struct PostFields {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

impl PostFields {
    /// An empty body is treated as `{}`.
    fn parse(bytes: &Bytes) -> ApiResult<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes).map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))
    }
}

async fn authorize(state: &AppState, headers: &HeaderMap, action: Action) -> ApiResult<()> {
    let credentials = Credentials::from_headers(headers);
    state.auth.authorize(&credentials, &action).await
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "postboard",
        "version": env!("CARGO_PKG_VERSION"),
        "store": state.store.backend(),
    }))
}

/// `GET /posts`: every local post followed by every remote post.
///
/// Both sources are fetched concurrently. A feed failure degrades to local
/// posts only; a store failure fails the request.
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    let (local, remote) = tokio::join!(state.store.list(), state.feed.fetch_all());
    let local = local?;
    let remote = remote.unwrap_or_else(|err| {
        warn!(error = %err, "feed unavailable, serving local posts only");
        Vec::new()
    });
    Ok(Json(pb_view::merge(local, remote)))
}

/// `POST /posts`
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Post>)> {
    authorize(&state, &headers, Action::Create).await?;

    let fields = PostFields::parse(&body)?;
    let new_post = NewPost::new(fields.title.unwrap_or_default(), fields.body.unwrap_or_default())
        .map_err(|_| ApiError::BadRequest("Title and body are required".into()))?;

    let post = state.store.create(&new_post).await?;
    info!(id = %post.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// `GET /posts/{id}`
pub async fn get_post(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Post>> {
    let id = state.store.parse_id(&raw_id)?;
    Ok(Json(state.store.get(&id).await?))
}

/// `PUT /posts/{id}`: merge-patch of title and/or body.
pub async fn update_post(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Post>> {
    authorize(&state, &headers, Action::Update { id: raw_id.clone() }).await?;

    let id = state.store.parse_id(&raw_id)?;
    let fields = PostFields::parse(&body)?;
    let patch = PostPatch::non_empty(fields.title, fields.body)
        .map_err(|_| ApiError::BadRequest("At least one of title or body is required".into()))?;

    let post = state.store.update(&id, &patch).await?;
    info!(id = %post.id, "post updated");
    Ok(Json(post))
}

/// `DELETE /posts/{id}`
pub async fn delete_post(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    authorize(&state, &headers, Action::Delete { id: raw_id.clone() }).await?;

    let id = state.store.parse_id(&raw_id)?;
    state.store.delete(&id).await?;
    info!(%id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn collection_method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed { method, allow: COLLECTION_ALLOW }
}

pub async fn item_method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed { method, allow: ITEM_ALLOW }
}
