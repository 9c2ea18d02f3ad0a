//! Generate, download and publish.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{GeneratedOutput, PublishReceipt};
use crate::publish::CONFIG_INCOMPLETE;
use crate::AppState;

/// POST /api/admin/generate - Validate the form, merge it and preview the document.
pub async fn generate(State(state): State<AppState>) -> ApiResult<GeneratedOutput> {
    let collection = state.session.lock().await.build_output(&state.drafts).await?;
    let preview = collection
        .to_pretty_json()
        .map_err(|e| AppError::Internal(format!("Failed to serialize posts: {}", e)))?;
    success(GeneratedOutput {
        collection,
        preview,
    })
}

/// POST /api/admin/download - Same as generate, returned as a `posts.json` file.
pub async fn download(State(state): State<AppState>) -> Result<Response, AppError> {
    let collection = state.session.lock().await.build_output(&state.drafts).await?;
    let json = collection
        .to_pretty_json()
        .map_err(|e| AppError::Internal(format!("Failed to serialize posts: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"posts.json\"",
            ),
        ],
        json,
    )
        .into_response())
}

/// POST /api/admin/publish - Commit the screenshot and the document to GitHub.
///
/// The session stays locked for the whole publish, so a second publish waits
/// for the first to finish.
pub async fn publish(State(state): State<AppState>) -> ApiResult<PublishReceipt> {
    let config = state.github.load().await;
    if !config.is_complete() {
        return Err(AppError::Config(CONFIG_INCOMPLETE.to_string()));
    }

    let mut session = state.session.lock().await;
    let collection = session.build_output(&state.drafts).await?;
    let screenshot_path = session.form().screenshot.clone();

    let receipt = state
        .publisher
        .publish(
            &config,
            &collection,
            session.pending_screenshot().map(|s| s.bytes.as_slice()),
            &screenshot_path,
        )
        .await
        .inspect_err(|e| tracing::error!("Publish failed: {}", e))?;

    state.drafts.clear().await;
    state.store.clear_cache().await;
    session.clear_pending_screenshot();

    success(receipt)
}
