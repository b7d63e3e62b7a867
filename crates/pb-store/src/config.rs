use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryPostStore;
use crate::traits::{Backend, PostStore};

/// Which backing store to open, and where.
///
/// Deserialized from a `[store]` table tagged by `backend`:
///
/// ```toml
/// [store]
/// backend = "sqlite"
/// database_url = "sqlite://posts.db"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    #[default]
    Memory,
    Sqlite { database_url: String },
    Document { root: PathBuf },
}

impl StoreConfig {
    pub fn backend(&self) -> Backend {
        match self {
            Self::Memory => Backend::Memory,
            Self::Sqlite { .. } => Backend::Sqlite,
            Self::Document { .. } => Backend::Document,
        }
    }
}

/// Open the one backend selected by `config`.
pub async fn open_store(config: &StoreConfig) -> StoreResult<Arc<dyn PostStore>> {
    let store: Arc<dyn PostStore> = match config {
        StoreConfig::Memory => Arc::new(InMemoryPostStore::new()),
        #[cfg(feature = "sqlite")]
        StoreConfig::Sqlite { database_url } => {
            Arc::new(crate::sqlite::SqlitePostStore::connect(database_url).await?)
        }
        #[cfg(feature = "document")]
        StoreConfig::Document { root } => {
            Arc::new(crate::document::DocumentPostStore::open(root.clone()).await?)
        }
        #[allow(unreachable_patterns)]
        other => return Err(StoreError::BackendDisabled(other.backend())),
    };
    info!(backend = %store.backend(), "post store opened");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        store: StoreConfig,
    }

    #[test]
    fn default_is_memory() {
        assert_eq!(StoreConfig::default(), StoreConfig::Memory);
        assert_eq!(StoreConfig::default().backend(), Backend::Memory);
    }

    #[test]
    fn parse_sqlite_table() {
        let parsed: Wrapper = toml::from_str(
            r#"
            [store]
            backend = "sqlite"
            database_url = "sqlite://posts.db"
            "#,
        )
        .unwrap();
        assert_eq!(
            parsed.store,
            StoreConfig::Sqlite { database_url: "sqlite://posts.db".into() }
        );
    }

    #[test]
    fn parse_document_table() {
        let parsed: Wrapper = toml::from_str(
            r#"
            [store]
            backend = "document"
            root = "/var/lib/postboard"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.store.backend(), Backend::Document);
    }

    #[tokio::test]
    async fn opens_memory_backend() {
        let store = open_store(&StoreConfig::Memory).await.unwrap();
        assert_eq!(store.backend(), Backend::Memory);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[cfg(not(feature = "document"))]
    #[tokio::test]
    async fn document_backend_not_compiled_in_by_default() {
        let config = StoreConfig::Document { root: PathBuf::from("posts") };
        assert!(matches!(
            open_store(&config).await,
            Err(StoreError::BackendDisabled(Backend::Document))
        ));
    }

    #[cfg(feature = "document")]
    #[tokio::test]
    async fn opens_document_backend() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StoreConfig::Document { root: dir.path().join("posts") };
        let store = open_store(&config).await.unwrap();
        assert_eq!(store.backend(), Backend::Document);
    }
}
