//! Admin session endpoints: the form, the edit list and screenshot attachment.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::EditListItem;
use crate::session::{PostForm, SessionView};
use crate::AppState;

/// Largest screenshot accepted by the attach endpoint.
pub const MAX_SCREENSHOT_BYTES: usize = 10 * 1024 * 1024;

async fn session_view(state: &AppState) -> SessionView {
    let draft = state.drafts.summary().await;
    state.session.lock().await.view(draft)
}

/// GET /api/admin/session
pub async fn get_session(State(state): State<AppState>) -> ApiResult<SessionView> {
    success(session_view(&state).await)
}

/// POST /api/admin/session/reload - Re-read the published posts.
pub async fn reload_session(State(state): State<AppState>) -> ApiResult<SessionView> {
    state.store.clear_cache().await;
    {
        let mut session = state.session.lock().await;
        session.reload(&state.store).await?;
    }
    success(session_view(&state).await)
}

/// POST /api/admin/session/new - Start a new post.
pub async fn new_post(State(state): State<AppState>) -> ApiResult<SessionView> {
    state.session.lock().await.enter_new();
    success(session_view(&state).await)
}

/// GET /api/admin/session/edit - Switch to Edit mode.
pub async fn edit_list(State(state): State<AppState>) -> ApiResult<Vec<EditListItem>> {
    success(state.session.lock().await.enter_edit())
}

/// POST /api/admin/session/edit/:id - Load a post into the form.
pub async fn select_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionView> {
    state.session.lock().await.select_for_edit(&id)?;
    success(session_view(&state).await)
}

/// PUT /api/admin/session/form - Replace the form's field values.
pub async fn update_form(
    State(state): State<AppState>,
    Json(form): Json<PostForm>,
) -> ApiResult<PostForm> {
    let mut session = state.session.lock().await;
    session.update_form(form);
    success(session.form().clone())
}

/// PUT /api/admin/session/screenshot/:file_name - Attach screenshot bytes.
pub async fn attach_screenshot(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
    body: Bytes,
) -> ApiResult<PostForm> {
    let file_name = file_name.trim();
    if file_name.is_empty() || file_name.contains('/') || file_name.contains("..") {
        return Err(AppError::BadRequest(format!(
            "Invalid screenshot file name: {}",
            file_name
        )));
    }
    if body.is_empty() {
        return Err(AppError::BadRequest("Screenshot file is empty".to_string()));
    }

    tracing::debug!("Attached screenshot {} ({} bytes)", file_name, body.len());

    let mut session = state.session.lock().await;
    session.attach_screenshot(file_name, body.to_vec());
    success(session.form().clone())
}
