use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A validated request to create a post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewPost {
    title: String,
    body: String,
}

impl NewPost {
    /// Both fields must be non-empty. The values are kept exactly as
    /// submitted, whitespace included.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Result<Self, TypeError> {
        let title = title.into();
        let body = body.into();
        if title.is_empty() {
            return Err(TypeError::MissingField("title"));
        }
        if body.is_empty() {
            return Err(TypeError::MissingField("body"));
        }
        Ok(Self { title, body })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Merge-patch over a post's editable fields.
///
/// Absent and empty fields are both treated as unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PostPatch {
    pub fn new(title: Option<String>, body: Option<String>) -> Self {
        Self {
            title: title.filter(|t| !t.is_empty()),
            body: body.filter(|b| !b.is_empty()),
        }
    }

    /// Like [`PostPatch::new`], but rejects a patch that would change nothing.
    pub fn non_empty(title: Option<String>, body: Option<String>) -> Result<Self, TypeError> {
        let patch = Self::new(title, body);
        if patch.is_empty() {
            return Err(TypeError::EmptyPatch);
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }
}
