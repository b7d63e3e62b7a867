use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use pb_types::{NewPost, Post, PostId, PostPatch};

use crate::error::{StoreError, StoreResult};
use crate::traits::{parse_numeric_id, Backend, PostStore};

/// In-memory, BTreeMap-based post store.
///
/// Intended for tests and demos. Keys are integer surrogates handed out in
/// increasing order and never reused, so listing in key order is listing in
/// insertion order.
pub struct InMemoryPostStore {
    inner: RwLock<MemoryState>,
}

struct MemoryState {
    posts: BTreeMap<i64, Post>,
    next_id: i64,
}

impl InMemoryPostStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryState {
                posts: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of posts currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").posts.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").posts.is_empty()
    }

    /// Remove all posts. Key assignment keeps counting from where it was.
    pub fn clear(&self) {
        self.inner.write().expect("lock poisoned").posts.clear();
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

fn numeric(id: &PostId) -> StoreResult<i64> {
    id.as_numeric().ok_or_else(|| StoreError::NotFound(id.clone()))
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    fn backend(&self) -> Backend {
        Backend::Memory
    }

    fn parse_id(&self, raw: &str) -> StoreResult<PostId> {
        parse_numeric_id(raw)
    }

    async fn get(&self, id: &PostId) -> StoreResult<Post> {
        let key = numeric(id)?;
        let state = self.inner.read().expect("lock poisoned");
        state
            .posts
            .get(&key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn list(&self) -> StoreResult<Vec<Post>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.posts.values().cloned().collect())
    }

    async fn create(&self, post: &NewPost) -> StoreResult<Post> {
        let mut state = self.inner.write().expect("lock poisoned");
        let key = state.next_id;
        state.next_id += 1;
        let stored = Post::local(key, post.title(), post.body(), Utc::now());
        state.posts.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &PostId, patch: &PostPatch) -> StoreResult<Post> {
        let key = numeric(id)?;
        let mut state = self.inner.write().expect("lock poisoned");
        let post = state
            .posts
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        post.apply(patch);
        Ok(post.clone())
    }

    async fn delete(&self, id: &PostId) -> StoreResult<()> {
        let key = numeric(id)?;
        let mut state = self.inner.write().expect("lock poisoned");
        match state.posts.remove(&key) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id.clone())),
        }
    }
}

impl std::fmt::Debug for InMemoryPostStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPostStore")
            .field("post_count", &self.len())
            .finish()
    }
}
