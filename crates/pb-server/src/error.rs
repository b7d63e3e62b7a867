use axum::http::header::ALLOW;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pb_store::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("feed error: {0}")]
    Feed(#[from] pb_feed::FeedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Failure of a single API request, mapped to an HTTP status.
///
/// `Internal` never carries diagnostic text: the detail is logged where the
/// error is converted, and callers only see a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized: Invalid API Key")]
    Unauthorized,

    #[error("Post not found")]
    NotFound,

    #[error("Method {method} Not Allowed")]
    MethodNotAllowed { method: Method, allow: &'static str },

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::InvalidId(_) => Self::BadRequest("Invalid post ID".into()),
            other => {
                error!(error = %other, unavailable = other.is_unavailable(), "store operation failed");
                Self::Internal
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let allow = match &self {
            Self::MethodNotAllowed { allow, .. } => Some(*allow),
            _ => None,
        };
        let mut response = (status, Json(ErrorResponse { message: self.to_string() })).into_response();
        if let Some(allow) = allow {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static(allow));
        }
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pb_types::PostId;

    #[test]
    fn store_errors_map_to_statuses() {
        assert_eq!(ApiError::from(StoreError::NotFound(PostId::Numeric(1))).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(StoreError::InvalidId("x".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(StoreError::Unavailable("pool timed out".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_hides_detail() {
        let err = ApiError::from(StoreError::Database("no such table: posts".into()));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn method_not_allowed_sets_allow_header() {
        let response = ApiError::MethodNotAllowed { method: Method::PATCH, allow: "GET, POST" }.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(ALLOW).unwrap(), "GET, POST");
    }
}
