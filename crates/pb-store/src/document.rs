use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pb_types::{NewPost, Post, PostId, PostPatch, Provenance};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::{Backend, PostStore};

const DOCUMENT_EXT: &str = "json";

/// Document store: one JSON document per post inside a collection
/// directory, keyed by a store-generated UUID v7 string.
///
/// Mutations are serialized through an async mutex so read-modify-write
/// updates cannot interleave. Documents are written to a temporary file and
/// renamed into place.
pub struct DocumentPostStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostDocument {
    title: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl PostDocument {
    fn into_post(self, key: &str) -> Post {
        Post {
            id: PostId::Key(key.to_string()),
            title: self.title,
            body: self.body,
            created_at: Some(self.created_at),
            source: Provenance::Local,
        }
    }
}

/// Keys are restricted to the characters a UUID can contain, so a key can
/// never escape the collection directory.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl DocumentPostStore {
    /// Open the collection at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "opened document post store");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{DOCUMENT_EXT}"))
    }

    fn key_of<'a>(&self, id: &'a PostId) -> StoreResult<&'a str> {
        match id.as_key() {
            Some(key) if is_valid_key(key) => Ok(key),
            _ => Err(StoreError::NotFound(id.clone())),
        }
    }

    async fn read_document(&self, key: &str) -> StoreResult<Option<PostDocument>> {
        let bytes = match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| StoreError::CorruptDocument {
                key: key.to_string(),
                reason: err.to_string(),
            })
    }

    async fn write_document(&self, key: &str, doc: &PostDocument) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        let final_path = self.path_for(key);
        let tmp_path = self.root.join(format!(".{key}.tmp"));
        tokio::fs::write(&tmp_path, &bytes).await?;
        tokio::fs::rename(&tmp_path, &final_path).await?;
        Ok(())
    }
}

#[async_trait]
impl PostStore for DocumentPostStore {
    fn backend(&self) -> Backend {
        Backend::Document
    }

    fn parse_id(&self, raw: &str) -> StoreResult<PostId> {
        if is_valid_key(raw) {
            Ok(PostId::Key(raw.to_string()))
        } else {
            Err(StoreError::InvalidId(raw.to_string()))
        }
    }

    async fn get(&self, id: &PostId) -> StoreResult<Post> {
        let key = self.key_of(id)?;
        self.read_document(key)
            .await?
            .map(|doc| doc.into_post(key))
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn list(&self) -> StoreResult<Vec<Post>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut posts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXT) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if !is_valid_key(key) {
                warn!(path = %path.display(), "skipping document with unexpected name");
                continue;
            }
            // A concurrent delete between read_dir and read is not an error.
            if let Some(doc) = self.read_document(key).await? {
                posts.push(doc.into_post(key));
            }
        }
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn create(&self, post: &NewPost) -> StoreResult<Post> {
        let _guard = self.write_lock.lock().await;
        let key = uuid::Uuid::now_v7().to_string();
        let doc = PostDocument {
            title: post.title().to_string(),
            body: post.body().to_string(),
            created_at: Utc::now(),
        };
        self.write_document(&key, &doc).await?;
        debug!(key = %key, "created post document");
        Ok(doc.into_post(&key))
    }

    async fn update(&self, id: &PostId, patch: &PostPatch) -> StoreResult<Post> {
        let key = self.key_of(id)?;
        let _guard = self.write_lock.lock().await;
        let doc = self
            .read_document(key)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let mut post = doc.into_post(key);
        post.apply(patch);
        let created_at = post.created_at.unwrap_or_else(Utc::now);
        let updated = PostDocument {
            title: post.title.clone(),
            body: post.body.clone(),
            created_at,
        };
        self.write_document(key, &updated).await?;
        Ok(post)
    }

    async fn delete(&self, id: &PostId) -> StoreResult<()> {
        let key = self.key_of(id)?;
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id.clone())),
            Err(err) => Err(err.into()),
        }
    }
}

impl std::fmt::Debug for DocumentPostStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPostStore")
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_post(title: &str, body: &str) -> NewPost {
        NewPost::new(title, body).unwrap()
    }

    async fn store() -> (DocumentPostStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = DocumentPostStore::open(dir.path().join("posts")).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn create_assigns_string_key() {
        let (store, _dir) = store().await;
        let post = store.create(&new_post("T", "B")).await.unwrap();
        let key = post.id.as_key().expect("document keys are strings");
        assert!(is_valid_key(key));
        assert!(!post.id.is_remote());
        assert!(store.root().join(format!("{key}.json")).exists());
    }

    #[tokio::test]
    async fn get_round_trip() {
        let (store, _dir) = store().await;
        let created = store.create(&new_post("title", "body")).await.unwrap();
        assert_eq!(store.get(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn numeric_ids_never_resolve() {
        let (store, _dir) = store().await;
        assert!(matches!(
            store.get(&PostId::Numeric(1)).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_newest_first() {
        let (store, _dir) = store().await;
        for title in ["a", "b", "c"] {
            store.create(&new_post(title, "body")).await.unwrap();
        }
        let titles: Vec<String> = store.list().await.unwrap().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let (store, _dir) = store().await;
        let created = store.create(&new_post("old", "body stays")).await.unwrap();
        let updated = store
            .update(&created.id, &PostPatch::new(Some("new".into()), None))
            .await
            .unwrap();
        assert_eq!(updated.title, "new");
        assert_eq!(updated.body, "body stays");
        assert_eq!(store.get(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn delete_twice() {
        let (store, _dir) = store().await;
        let created = store.create(&new_post("a", "b")).await.unwrap();
        store.delete(&created.id).await.unwrap();
        assert!(matches!(store.delete(&created.id).await, Err(StoreError::NotFound(_))));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_document_is_reported() {
        let (store, _dir) = store().await;
        tokio::fs::write(store.root().join("broken.json"), b"{not json").await.unwrap();
        let err = store.get(&PostId::from("broken")).await.unwrap_err();
        assert!(matches!(err, StoreError::CorruptDocument { .. }));
    }

    #[test]
    fn parse_id_rejects_path_tricks() {
        let dir = TempDir::new().unwrap();
        let store = DocumentPostStore {
            root: dir.path().to_path_buf(),
            write_lock: Mutex::new(()),
        };
        assert!(store.parse_id("0190c2a4-7b1e-7000-8000-000000000000").is_ok());
        for raw in ["", "../etc/passwd", "a/b", "a.json"] {
            assert!(matches!(store.parse_id(raw), Err(StoreError::InvalidId(_))), "{raw}");
        }
    }
}
