//! GitHub settings endpoints. The token is never echoed back.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::models::{GithubConfig, GithubConfigView};
use crate::AppState;

/// GET /api/admin/github
pub async fn get_github_config(State(state): State<AppState>) -> ApiResult<GithubConfigView> {
    success(state.github.load().await.view())
}

/// PUT /api/admin/github
pub async fn save_github_config(
    State(state): State<AppState>,
    Json(config): Json<GithubConfig>,
) -> ApiResult<GithubConfigView> {
    let saved = state.github.save(&config).await?;
    success(saved.view())
}
