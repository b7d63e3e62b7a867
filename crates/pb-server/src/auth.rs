use std::fmt;

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::error::ApiError;

/// Header carrying the shared API credential.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    /// Raw header bytes; not required to be ASCII.
    ApiKey(Vec<u8>),
    Anonymous,
}

impl Credentials {
    /// Extract credentials from request headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(API_KEY_HEADER)
            .map(|value| Self::ApiKey(value.as_bytes().to_vec()))
            .unwrap_or(Self::Anonymous)
    }

    pub fn api_key(key: impl AsRef<[u8]>) -> Self {
        Self::ApiKey(key.as_ref().to_vec())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    List,
    Read { id: String },
    Create,
    Update { id: String },
    Delete { id: String },
}

impl Action {
    /// Mutating actions require a valid credential.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Create | Self::Update { .. } | Self::Delete { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Read { id } => write!(f, "read:{id}"),
            Self::Create => write!(f, "create"),
            Self::Update { id } => write!(f, "update:{id}"),
            Self::Delete { id } => write!(f, "delete:{id}"),
        }
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns `Err(ApiError::Unauthorized)` when `credentials` may not
    /// perform `action`.
    async fn authorize(&self, credentials: &Credentials, action: &Action) -> Result<(), ApiError>;
}

/// Static shared secret compared byte-for-byte against the header value.
///
/// With no secret configured every mutation is refused.
pub struct SharedSecretAuth {
    secret: Option<String>,
}

impl SharedSecretAuth {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }
}

#[async_trait]
impl AuthProvider for SharedSecretAuth {
    async fn authorize(&self, credentials: &Credentials, action: &Action) -> Result<(), ApiError> {
        if !action.is_mutation() {
            return Ok(());
        }
        match (credentials, &self.secret) {
            (Credentials::ApiKey(provided), Some(secret))
                if provided.as_slice() == secret.as_bytes() =>
            {
                Ok(())
            }
            _ => {
                tracing::warn!(%action, "rejected request without a valid API key");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn update() -> Action {
        Action::Update { id: "1".into() }
    }

    #[test]
    fn credentials_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(Credentials::from_headers(&headers), Credentials::Anonymous);
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("s3cret"));
        assert_eq!(Credentials::from_headers(&headers), Credentials::api_key("s3cret"));
    }

    #[test]
    fn non_ascii_header_is_kept_as_bytes() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_bytes("cl\u{e9}".as_bytes()).unwrap());
        assert_eq!(Credentials::from_headers(&headers), Credentials::api_key("cl\u{e9}"));
    }

    #[tokio::test]
    async fn non_ascii_secret_matches_byte_for_byte() {
        let auth = SharedSecretAuth::new(Some("cl\u{e9}".into()));
        assert!(auth.authorize(&Credentials::api_key("cl\u{e9}"), &update()).await.is_ok());
        assert!(auth.authorize(&Credentials::api_key("cle"), &update()).await.is_err());
    }

    #[test]
    fn action_display() {
        assert_eq!(Action::Delete { id: "7".into() }.to_string(), "delete:7");
        assert_eq!(Action::Create.to_string(), "create");
        assert!(!Action::List.is_mutation());
        assert!(!Action::Read { id: "1".into() }.is_mutation());
    }

    #[tokio::test]
    async fn reads_need_no_credentials() {
        let auth = SharedSecretAuth::new(Some("k".into()));
        assert!(auth.authorize(&Credentials::Anonymous, &Action::List).await.is_ok());
    }

    #[tokio::test]
    async fn matching_key_allows_mutation() {
        let auth = SharedSecretAuth::new(Some("k".into()));
        assert!(auth.authorize(&Credentials::api_key("k"), &update()).await.is_ok());
    }

    #[tokio::test]
    async fn wrong_or_missing_key_rejected() {
        let auth = SharedSecretAuth::new(Some("k".into()));
        for creds in [Credentials::Anonymous, Credentials::api_key("K")] {
            assert!(matches!(
                auth.authorize(&creds, &Action::Create).await,
                Err(ApiError::Unauthorized)
            ));
        }
    }

    #[tokio::test]
    async fn no_secret_configured_rejects_everything() {
        let auth = SharedSecretAuth::new(None);
        assert!(matches!(
            auth.authorize(&Credentials::api_key(""), &update()).await,
            Err(ApiError::Unauthorized)
        ));
    }
}
