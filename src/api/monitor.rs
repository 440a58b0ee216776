//! Public monitor endpoints

use axum::{extract::State, http::StatusCode};

use crate::error::{AppError, AppResult};

/// Audio unlock gesture from the monitor page.
/// Queued announcements start playing after this is called once.
#[utoipa::path(
    post,
    path = "/monitor/unlock",
    tag = "monitor",
    responses(
        (status = 204, description = "Audio unlocked"),
        (status = 400, description = "Monitor is disabled")
    )
)]
pub async fn unlock_audio(State(state): State<crate::AppState>) -> AppResult<StatusCode> {
    let Some(announcer) = &state.announcer else {
        return Err(AppError::Validation("Monitor is disabled".to_string()));
    };
    announcer.unlock();
    Ok(StatusCode::NO_CONTENT)
}
