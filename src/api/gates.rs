//! Loading dock configuration endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::gate::{GateConfig, SaveGateConfig},
};

use super::AuthenticatedStaff;

/// List configured docks
#[utoipa::path(
    get,
    path = "/gates",
    tag = "gates",
    responses(
        (status = 200, description = "Configured docks", body = Vec<GateConfig>)
    )
)]
pub async fn list_gates(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<GateConfig>>> {
    let gates = state.services.list_gates().await?;
    Ok(Json(gates))
}

/// Get one dock configuration
#[utoipa::path(
    get,
    path = "/gates/{gate_id}",
    tag = "gates",
    params(("gate_id" = String, Path, description = "Stable gate identifier, e.g. GATE_2")),
    responses(
        (status = 200, description = "Dock configuration", body = GateConfig),
        (status = 404, description = "No such gate")
    )
)]
pub async fn get_gate(
    State(state): State<crate::AppState>,
    Path(gate_id): Path<String>,
) -> AppResult<Json<GateConfig>> {
    let gate = state.services.get_gate(&gate_id).await?;
    Ok(Json(gate))
}

/// Create or update a dock, keyed by its gate id
#[utoipa::path(
    put,
    path = "/gates/{gate_id}",
    tag = "gates",
    security(("bearer_auth" = [])),
    params(("gate_id" = String, Path, description = "Stable gate identifier, e.g. GATE_2")),
    request_body = SaveGateConfig,
    responses(
        (status = 200, description = "Dock saved", body = GateConfig),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Operations role required")
    )
)]
pub async fn save_gate(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(gate_id): Path<String>,
    Json(payload): Json<SaveGateConfig>,
) -> AppResult<Json<GateConfig>> {
    claims.require_operations()?;
    let gate = state.services.save_gate(&gate_id, payload).await?;
    Ok(Json(gate))
}

/// Remove a dock
#[utoipa::path(
    delete,
    path = "/gates/{gate_id}",
    tag = "gates",
    security(("bearer_auth" = [])),
    params(("gate_id" = String, Path, description = "Stable gate identifier, e.g. GATE_2")),
    responses(
        (status = 204, description = "Dock removed"),
        (status = 403, description = "Operations role required"),
        (status = 404, description = "No such gate")
    )
)]
pub async fn delete_gate(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(gate_id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_operations()?;
    state.services.delete_gate(&gate_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
