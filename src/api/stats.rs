//! Queue statistics endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::enums::QueueStatus};

use super::AuthenticatedStaff;

/// Record counts per lifecycle status
#[derive(Serialize, ToSchema, Default)]
pub struct StatsResponse {
    pub booked: i64,
    pub at_gate: i64,
    pub checked_in: i64,
    pub called: i64,
    pub loading: i64,
    pub completed: i64,
    pub rejected: i64,
}

/// Current queue statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Record counts per status", body = StatsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
) -> AppResult<Json<StatsResponse>> {
    let counts = state.services.lifecycle.counts_by_status().await?;

    let mut stats = StatsResponse::default();
    for (status, count) in counts {
        match status {
            QueueStatus::Booked => stats.booked = count,
            QueueStatus::AtGate => stats.at_gate = count,
            QueueStatus::CheckedIn => stats.checked_in = count,
            QueueStatus::Called => stats.called = count,
            QueueStatus::Loading => stats.loading = count,
            QueueStatus::Completed => stats.completed = count,
            QueueStatus::Rejected => stats.rejected = count,
        }
    }
    Ok(Json(stats))
}
