//! Public read endpoints backed by the post store.

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{JournalStats, Post, PostDetail, TagCount};
use crate::AppState;

/// Query parameters for the post listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    /// Comma-separated tags; a post matches if it carries any of them.
    pub tags: Option<String>,
}

impl ListPostsQuery {
    fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// GET /api/posts - List posts, newest first.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<Vec<Post>> {
    let posts = state.store.filter_by_tags(&query.tag_list()).await?;
    success(posts)
}

/// GET /api/posts/:id - A post with its neighbours.
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PostDetail> {
    match state.store.get_detail(&id).await? {
        Some(detail) => success(detail),
        None => Err(AppError::NotFound(format!("Post {} not found", id))),
    }
}

/// GET /api/tags - Every tag with its post count.
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Vec<TagCount>> {
    success(state.store.tag_counts().await?)
}

/// GET /api/tags/names - Every distinct tag, without counts.
pub async fn list_tag_names(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    success(state.store.get_all_tags().await?)
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<JournalStats> {
    success(state.store.stats().await?)
}
