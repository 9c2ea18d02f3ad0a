//! Draft endpoints: inspect, restore and discard the saved working set.

use axum::extract::State;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::DraftSummary;
use crate::session::SessionView;
use crate::AppState;

/// GET /api/admin/draft - Summary of the saved draft, or null.
pub async fn get_draft(State(state): State<AppState>) -> ApiResult<Option<DraftSummary>> {
    success(state.drafts.summary().await)
}

/// POST /api/admin/draft/restore - Replace the working set with the draft.
///
/// The form and the editing target are left as they are.
pub async fn restore_draft(State(state): State<AppState>) -> ApiResult<SessionView> {
    let Some(draft) = state.drafts.load().await else {
        return Err(AppError::NotFound("No saved draft".to_string()));
    };
    let summary = DraftSummary::from(&draft);

    let mut session = state.session.lock().await;
    session.restore_draft(draft);
    success(session.view(Some(summary)))
}

/// DELETE /api/admin/draft - Discard the saved draft.
pub async fn discard_draft(State(state): State<AppState>) -> ApiResult<()> {
    state.drafts.clear().await;
    tracing::info!("Draft discarded");
    success(())
}
