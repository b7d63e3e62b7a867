use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::PostId;
use crate::request::PostPatch;

/// Which backing source produced a post.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// The authoritative, writable post store.
    #[default]
    Local,
    /// The read-only external feed.
    Remote,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// The core content entity.
///
/// `created_at` is only present for posts whose store assigns an ordering
/// timestamp; remote posts never carry one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Provenance,
}

impl Post {
    /// Build a locally stored post.
    pub fn local(
        id: impl Into<PostId>,
        title: impl Into<String>,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            created_at: Some(created_at),
            source: Provenance::Local,
        }
    }

    /// Build a remote feed post. The upstream id is namespaced.
    pub fn remote(upstream_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: PostId::remote(upstream_id),
            title: title.into(),
            body: body.into(),
            created_at: None,
            source: Provenance::Remote,
        }
    }

    /// Apply a merge-patch. Identifier, timestamp, and provenance never change.
    pub fn apply(&mut self, patch: &PostPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(body) = &patch.body {
            self.body.clone_from(body);
        }
    }

    pub fn is_local(&self) -> bool {
        self.source == Provenance::Local
    }
}
