use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pb_types::{NewPost, Post, PostId, PostPatch};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::traits::{parse_numeric_id, Backend, PostStore};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at INTEGER NOT NULL
)
"#;

/// Relational post store backed by SQLite.
///
/// Timestamps are stored as Unix milliseconds. `AUTOINCREMENT` keeps deleted
/// keys from being handed out again.
#[derive(Clone)]
pub struct SqlitePostStore {
    pool: SqlitePool,
}

impl SqlitePostStore {
    /// Open (creating if missing) the database at `database_url` and make
    /// sure the `posts` table exists.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        info!(database_url, "connected to sqlite post store");
        Self::from_pool(pool).await
    }

    /// A private in-memory database. Limited to one connection, since every
    /// SQLite `:memory:` connection is its own database.
    pub async fn in_memory() -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn key_of(id: &PostId) -> StoreResult<i64> {
    id.as_numeric().ok_or_else(|| StoreError::NotFound(id.clone()))
}

fn from_millis(id: i64, millis: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| StoreError::Database(format!("post {id} has invalid timestamp {millis}")))
}

fn row_to_post(row: &SqliteRow) -> StoreResult<Post> {
    let id: i64 = row.try_get("id")?;
    let title: String = row.try_get("title")?;
    let body: String = row.try_get("body")?;
    let created_at: i64 = row.try_get("created_at")?;
    Ok(Post::local(id, title, body, from_millis(id, created_at)?))
}

#[async_trait]
impl PostStore for SqlitePostStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    fn parse_id(&self, raw: &str) -> StoreResult<PostId> {
        parse_numeric_id(raw)
    }

    async fn get(&self, id: &PostId) -> StoreResult<Post> {
        let key = key_of(id)?;
        let row = sqlx::query("SELECT id, title, body, created_at FROM posts WHERE id = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => row_to_post(&row),
            None => Err(StoreError::NotFound(id.clone())),
        }
    }

    async fn list(&self) -> StoreResult<Vec<Post>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, body, created_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_post).collect()
    }

    async fn create(&self, post: &NewPost) -> StoreResult<Post> {
        let created_ms = Utc::now().timestamp_millis();
        let result = sqlx::query(
            r#"
            INSERT INTO posts (title, body, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(post.title())
        .bind(post.body())
        .bind(created_ms)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "inserted post");
        Ok(Post::local(
            id,
            post.title(),
            post.body(),
            from_millis(id, created_ms)?,
        ))
    }

    async fn update(&self, id: &PostId, patch: &PostPatch) -> StoreResult<Post> {
        let key = key_of(id)?;
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = COALESCE(?1, title),
                body = COALESCE(?2, body)
            WHERE id = ?3
            "#,
        )
        .bind(patch.title.as_deref())
        .bind(patch.body.as_deref())
        .bind(key)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.clone()));
        }
        self.get(id).await
    }

    async fn delete(&self, id: &PostId) -> StoreResult<()> {
        let key = key_of(id)?;
        let result = sqlx::query("DELETE FROM posts WHERE id = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SqlitePostStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlitePostStore")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}
