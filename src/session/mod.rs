//! Admin editing session.
//!
//! Owns the working set of posts, the form being edited and which post (if
//! any) the form targets. The post store's cache is never touched: every
//! upsert builds a new vector that replaces the working set and is shadowed
//! into the draft cache.

mod form;
mod validate;

pub use form::*;
pub use validate::*;

use serde::Serialize;

use crate::draft::DraftCache;
use crate::errors::AppError;
use crate::models::{
    default_screenshot_path, derive_id, sorted_asc, sorted_desc, today_iso, Collection, Difficulty,
    DraftSummary, EditListItem, Post,
};
use crate::store::PostStore;

/// Which tab of the admin page is active.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    New,
    Edit,
}

/// A screenshot file chosen in the form but not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingScreenshot {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Snapshot of the session for the admin page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub mode: Mode,
    pub editing_id: Option<String>,
    pub form: PostForm,
    pub post_count: usize,
    pub data_load_ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    pub pending_screenshot: Option<String>,
    pub draft: Option<DraftSummary>,
}

/// Replace the post with the same id, or append; the result is ascending by day.
pub fn upsert_post(posts: &[Post], post: Post) -> Vec<Post> {
    let mut all = posts.to_vec();
    match all.iter().position(|p| p.id == post.id) {
        Some(index) => all[index] = post,
        None => all.push(post),
    }
    sorted_asc(&all)
}

/// In-memory state of one admin editing session.
#[derive(Debug)]
pub struct AdminSession {
    working: Vec<Post>,
    mode: Mode,
    editing_id: Option<String>,
    form: PostForm,
    pending_screenshot: Option<PendingScreenshot>,
    data_load_ok: bool,
    load_error: Option<String>,
}

impl Default for AdminSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminSession {
    /// An empty session in New mode. Call `reload` to pull in published posts.
    pub fn new() -> Self {
        let mut session = Self {
            working: Vec::new(),
            mode: Mode::New,
            editing_id: None,
            form: PostForm::default(),
            pending_screenshot: None,
            data_load_ok: false,
            load_error: None,
        };
        session.enter_new();
        session
    }

    /// Start a session from the published posts.
    ///
    /// Also reports the saved draft, if it holds any posts, so the caller
    /// can offer to restore it. A load failure is logged and leaves the
    /// session empty with generating blocked.
    pub async fn open(store: &PostStore, drafts: &DraftCache) -> (Self, Option<DraftSummary>) {
        let mut session = Self::new();
        if let Ok(count) = session.reload(store).await {
            tracing::info!("Admin session opened with {} posts", count);
        }

        (session, drafts.summary().await)
    }

    /// Replace the working set with the published posts and start a new post.
    ///
    /// On failure the working set is emptied and generating stays blocked
    /// until a reload succeeds or a draft is restored.
    pub async fn reload(&mut self, store: &PostStore) -> Result<usize, AppError> {
        let result = store.fetch_all().await;
        match &result {
            Ok(posts) => {
                self.working = sorted_asc(posts);
                self.data_load_ok = true;
                self.load_error = None;
            }
            Err(e) => {
                tracing::warn!("Could not load existing posts: {}", e);
                self.working = Vec::new();
                self.data_load_ok = false;
                self.load_error = Some(e.message());
            }
        }
        self.enter_new();
        result.map(|posts| posts.len())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn form(&self) -> &PostForm {
        &self.form
    }

    /// Working set, ascending by day.
    pub fn posts(&self) -> &[Post] {
        &self.working
    }

    pub fn data_load_ok(&self) -> bool {
        self.data_load_ok
    }

    pub fn pending_screenshot(&self) -> Option<&PendingScreenshot> {
        self.pending_screenshot.as_ref()
    }

    /// Day number a new post gets: one past the highest, or 1.
    pub fn next_day(&self) -> i64 {
        self.working.iter().map(|p| p.day).max().unwrap_or(0) + 1
    }

    /// Switch to New mode with a freshly pre-filled form.
    pub fn enter_new(&mut self) {
        let day = self.next_day();
        self.mode = Mode::New;
        self.editing_id = None;
        self.pending_screenshot = None;
        self.form = PostForm {
            id: derive_id(day),
            day: day.to_string(),
            date: today_iso(),
            screenshot: default_screenshot_path(day),
            difficulty: Some(Difficulty::default().as_str().to_string()),
            ..PostForm::default()
        };
    }

    /// Switch to Edit mode. The form is left as it is.
    pub fn enter_edit(&mut self) -> Vec<EditListItem> {
        self.mode = Mode::Edit;
        self.edit_list()
    }

    /// Posts for the edit list, newest first.
    pub fn edit_list(&self) -> Vec<EditListItem> {
        sorted_desc(&self.working)
            .iter()
            .map(EditListItem::from)
            .collect()
    }

    /// Load the post with `id` into the form and make it the editing target.
    pub fn select_for_edit(&mut self, id: &str) -> Result<(), AppError> {
        let post = self
            .working
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;

        self.form = PostForm::from_post(post);
        self.mode = Mode::Edit;
        self.editing_id = Some(id.to_string());
        self.pending_screenshot = None;
        Ok(())
    }

    /// Replace the form's field values.
    ///
    /// A changed, positive day re-derives the id. In New mode it also
    /// re-derives the screenshot path while that is empty or still a default.
    pub fn update_form(&mut self, mut form: PostForm) {
        if form.day.trim() != self.form.day.trim() {
            if let Some(day) = form.day_number() {
                form.id = derive_id(day);
                let screenshot = form.screenshot.trim();
                if self.mode == Mode::New
                    && (screenshot.is_empty() || screenshot.starts_with("screenshots/day-"))
                {
                    form.screenshot = default_screenshot_path(day);
                }
            }
        }
        self.form = form;
    }

    /// Attach a screenshot file; its repository path becomes `screenshots/<name>`.
    pub fn attach_screenshot(&mut self, file_name: &str, bytes: Vec<u8>) {
        self.form.screenshot = format!("screenshots/{}", file_name);
        self.pending_screenshot = Some(PendingScreenshot {
            file_name: file_name.to_string(),
            bytes,
        });
    }

    pub fn clear_pending_screenshot(&mut self) {
        self.pending_screenshot = None;
    }

    /// The form's values as a candidate post.
    pub fn collect(&self) -> Post {
        self.form.collect()
    }

    /// Validate `post` and merge it into the working set.
    ///
    /// On success the new collection replaces the working set, is saved as
    /// the draft and is returned. On failure nothing changes.
    pub async fn upsert(&mut self, post: Post, drafts: &DraftCache) -> Result<Collection, AppError> {
        let errors = validate_post(&post);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        if self.editing_id.as_deref() != Some(post.id.as_str()) {
            if let Some(owner) = self.working.iter().find(|p| p.id == post.id) {
                return Err(AppError::Validation(vec![format!(
                    "Post ID {} already belongs to Day {}.",
                    post.id, owner.day
                )]));
            }
        }

        let id = post.id.clone();
        self.working = upsert_post(&self.working, post);
        self.editing_id = Some(id);

        let collection = Collection::new(self.working.clone());
        drafts.save(&collection).await;
        Ok(collection)
    }

    /// Collect, validate and upsert the form: the shared first half of
    /// generate and publish.
    pub async fn build_output(&mut self, drafts: &DraftCache) -> Result<Collection, AppError> {
        if !self.data_load_ok() {
            return Err(AppError::Load(
                "Existing posts could not be loaded. Generating now would overwrite every other post; reload or restore a draft first.".to_string(),
            ));
        }

        let post = self.collect();
        self.upsert(post, drafts).await
    }

    /// Replace the working set wholesale with a saved draft. The form and
    /// the editing target stay as they are.
    pub fn restore_draft(&mut self, draft: Collection) -> usize {
        self.working = sorted_asc(&draft.posts);
        self.data_load_ok = true;
        self.load_error = None;
        tracing::info!("Draft restored with {} posts", self.working.len());
        self.working.len()
    }

    /// Snapshot for the API, with the draft summary supplied by the caller.
    pub fn view(&self, draft: Option<DraftSummary>) -> SessionView {
        SessionView {
            mode: self.mode(),
            editing_id: self.editing_id().map(str::to_string),
            form: self.form().clone(),
            post_count: self.posts().len(),
            data_load_ok: self.data_load_ok(),
            load_error: self.load_error.clone(),
            pending_screenshot: self
                .pending_screenshot
                .as_ref()
                .map(|s| s.file_name.clone()),
            draft,
        }
    }
}
