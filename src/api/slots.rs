//! Slot availability endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{error::AppResult, models::slot::SlotInfo};

#[derive(Deserialize, IntoParams)]
pub struct SlotsQuery {
    /// Date to check, ISO 8601 (YYYY-MM-DD)
    pub date: NaiveDate,
}

/// Slot grid with remaining capacity for a date.
/// Sundays return an empty list; the warehouse is closed.
#[utoipa::path(
    get,
    path = "/slots",
    tag = "slots",
    params(SlotsQuery),
    responses(
        (status = 200, description = "Slot availability for the date", body = Vec<SlotInfo>),
        (status = 400, description = "Malformed date")
    )
)]
pub async fn available_slots(
    State(state): State<crate::AppState>,
    Query(query): Query<SlotsQuery>,
) -> AppResult<Json<Vec<SlotInfo>>> {
    let slots = state.services.slots.available_slots(query.date).await?;
    Ok(Json(slots))
}
