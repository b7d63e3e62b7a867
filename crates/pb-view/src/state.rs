use std::fmt::Display;

use pb_types::{Post, PostId, PostPatch};
use tracing::warn;

use crate::page::{paginate, PageSize, PostView};

/// Shown when a listing refresh fails. Diagnostic detail goes to the log.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch posts";

/// Cached listing plus pagination cursor.
///
/// Every action consumes the state and returns the next one. A failed load
/// keeps the last good listing and only records the failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListState {
    posts: Vec<Post>,
    page: usize,
    page_size: PageSize,
    error: Option<String>,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl ListState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            posts: Vec::new(),
            page: 1,
            page_size,
            error: None,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> PostView {
        paginate(&self.posts, self.page_size, self.page)
    }

    /// Replace the cache with a freshly fetched listing.
    pub fn load<E: Display>(mut self, result: Result<Vec<Post>, E>) -> Self {
        match result {
            Ok(posts) => {
                self.posts = posts;
                self.error = None;
                self.page = self.page.min(self.view().total_pages);
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch posts");
                self.error = Some(FETCH_FAILED_MESSAGE.to_string());
            }
        }
        self
    }

    /// Move to `page`, clamped to the existing pages.
    pub fn go_to(mut self, page: usize) -> Self {
        let total = self.view().total_pages;
        self.page = page.clamp(1, total);
        self
    }

    /// Optimistically insert a post the server just created.
    pub fn apply_created(mut self, post: Post) -> Self {
        self.posts.insert(0, post);
        self.error = None;
        self
    }

    /// Patch the cached copy of an updated post in place.
    pub fn apply_updated(mut self, post: Post) -> Self {
        if let Some(slot) = self.posts.iter_mut().find(|p| p.id == post.id) {
            *slot = post;
        }
        self
    }

    /// Drop a deleted post from the cache.
    pub fn apply_deleted(mut self, id: &PostId) -> Self {
        self.posts.retain(|p| &p.id != id);
        self.page = self.page.min(self.view().total_pages);
        self
    }

    /// Record a failed action without touching the cached listing.
    pub fn fail(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

/// State of a single-post view with an optional edit in progress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailState {
    post: Option<Post>,
    editing: bool,
    edit_title: String,
    edit_body: String,
    word_count: u64,
    error: Option<String>,
}

impl DetailState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn edit_title(&self) -> &str {
        &self.edit_title
    }

    pub fn edit_body(&self) -> &str {
        &self.edit_body
    }

    pub fn word_count(&self) -> u64 {
        self.word_count
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn loaded<E: Display>(mut self, result: Result<Post, E>) -> Self {
        match result {
            Ok(post) => {
                self.edit_title = post.title.clone();
                self.edit_body = post.body.clone();
                self.post = Some(post);
                self.error = None;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self
    }

    pub fn begin_edit(mut self) -> Self {
        if let Some(post) = &self.post {
            self.edit_title = post.title.clone();
            self.edit_body = post.body.clone();
            self.editing = true;
        }
        self
    }

    pub fn set_title(mut self, title: impl Into<String>) -> Self {
        self.edit_title = title.into();
        self
    }

    pub fn set_body(mut self, body: impl Into<String>) -> Self {
        self.edit_body = body.into();
        self
    }

    pub fn cancel_edit(mut self) -> Self {
        self.editing = false;
        self
    }

    /// The edit buffers as a merge-patch.
    pub fn patch(&self) -> PostPatch {
        PostPatch::new(Some(self.edit_title.clone()), Some(self.edit_body.clone()))
    }

    /// Apply the outcome of a save. On failure the previous post and the
    /// edit buffers are kept.
    pub fn saved<E: Display>(mut self, result: Result<Post, E>) -> Self {
        match result {
            Ok(post) => {
                self.edit_title = post.title.clone();
                self.edit_body = post.body.clone();
                self.post = Some(post);
                self.editing = false;
                self.error = None;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self
    }

    /// Display a computed word count. The most recent completion wins.
    pub fn set_word_count(mut self, count: u64) -> Self {
        self.word_count = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn local(n: i64, title: &str) -> Post {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Post::local(n, title, "body", at)
    }

    fn many(n: i64) -> Vec<Post> {
        (1..=n).map(|i| local(i, &format!("p{i}"))).collect()
    }

    #[test]
    fn load_replaces_cache() {
        let state = ListState::default().load::<String>(Ok(many(3)));
        assert_eq!(state.posts().len(), 3);
        assert!(state.error().is_none());
    }

    #[test]
    fn failed_load_preserves_previous_listing() {
        let state = ListState::default()
            .load::<String>(Ok(many(3)))
            .load(Err("connection refused"));
        assert_eq!(state.posts().len(), 3);
        assert_eq!(state.error(), Some(FETCH_FAILED_MESSAGE));
    }

    #[test]
    fn created_post_goes_first() {
        let state = ListState::default()
            .load::<String>(Ok(many(2)))
            .apply_created(local(99, "fresh"));
        assert_eq!(state.posts()[0].title, "fresh");
        assert_eq!(state.posts().len(), 3);
    }

    #[test]
    fn updated_post_patched_in_place() {
        let state = ListState::default()
            .load::<String>(Ok(many(3)))
            .apply_updated(local(2, "renamed"));
        assert_eq!(state.posts()[1].title, "renamed");
    }

    #[test]
    fn deleted_post_removed_and_page_clamped() {
        let state = ListState::new(PageSize::new(2).unwrap())
            .load::<String>(Ok(many(3)))
            .go_to(2)
            .apply_deleted(&PostId::Numeric(3));
        assert_eq!(state.posts().len(), 2);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn go_to_clamps() {
        let state = ListState::new(PageSize::new(10).unwrap()).load::<String>(Ok(many(25)));
        assert_eq!(state.clone().go_to(0).page(), 1);
        assert_eq!(state.clone().go_to(3).page(), 3);
        assert_eq!(state.go_to(9).page(), 3);
    }

    #[test]
    fn view_uses_cursor() {
        let state = ListState::new(PageSize::new(10).unwrap())
            .load::<String>(Ok(many(25)))
            .go_to(3);
        let view = state.view();
        assert_eq!(view.items.len(), 5);
        assert_eq!(view.total_pages, 3);
    }

    #[test]
    fn detail_edit_cycle() {
        let state = DetailState::new()
            .loaded::<String>(Ok(local(1, "original")))
            .begin_edit()
            .set_title("edited");
        assert!(state.is_editing());
        assert_eq!(state.patch().title.as_deref(), Some("edited"));

        let saved = state.saved::<String>(Ok(local(1, "edited")));
        assert!(!saved.is_editing());
        assert_eq!(saved.post().unwrap().title, "edited");
    }

    #[test]
    fn failed_save_keeps_post_and_buffers() {
        let state = DetailState::new()
            .loaded::<String>(Ok(local(1, "original")))
            .begin_edit()
            .set_body("draft")
            .saved(Err("Unauthorized: Invalid API Key"));
        assert!(state.is_editing());
        assert_eq!(state.post().unwrap().title, "original");
        assert_eq!(state.edit_body(), "draft");
        assert_eq!(state.error(), Some("Unauthorized: Invalid API Key"));
    }

    #[test]
    fn word_count_last_write_wins() {
        let state = DetailState::new().set_word_count(3).set_word_count(7);
        assert_eq!(state.word_count(), 7);
    }
}
