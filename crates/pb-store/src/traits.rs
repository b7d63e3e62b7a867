use std::fmt;

use async_trait::async_trait;
use pb_types::{NewPost, Post, PostId, PostPatch};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Which kind of backing store a [`PostStore`] talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Sqlite,
    Document,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Sqlite => write!(f, "sqlite"),
            Self::Document => write!(f, "document"),
        }
    }
}

/// Uniform access to the authoritative post store.
///
/// All implementations must satisfy these invariants:
/// - `create` assigns the identifier and the creation timestamp.
/// - `update` applies a merge-patch; it never changes identifier,
///   timestamp, or provenance.
/// - `delete` is permanent. Deleting twice yields `NotFound` the second time.
/// - Every post returned is tagged [`pb_types::Provenance::Local`].
#[async_trait]
pub trait PostStore: Send + Sync {
    /// The backend kind, for diagnostics.
    fn backend(&self) -> Backend;

    /// Parse a raw path segment into an identifier this backend understands.
    ///
    /// Returns [`StoreError::InvalidId`] for malformed input.
    fn parse_id(&self, raw: &str) -> StoreResult<PostId>;

    /// Read a post by identifier.
    async fn get(&self, id: &PostId) -> StoreResult<Post>;

    /// All posts, newest first when the backend records creation order,
    /// insertion order otherwise.
    async fn list(&self) -> StoreResult<Vec<Post>>;

    /// Persist a new post and return it with its assigned identifier.
    async fn create(&self, post: &NewPost) -> StoreResult<Post>;

    /// Apply a merge-patch and return the updated post.
    async fn update(&self, id: &PostId, patch: &PostPatch) -> StoreResult<Post>;

    /// Permanently remove a post.
    async fn delete(&self, id: &PostId) -> StoreResult<()>;
}

/// Parse an integer surrogate key.
pub fn parse_numeric_id(raw: &str) -> StoreResult<PostId> {
    raw.trim()
        .parse::<i64>()
        .map(PostId::Numeric)
        .map_err(|_| StoreError::InvalidId(raw.to_string()))
}
