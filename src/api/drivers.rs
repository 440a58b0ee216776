//! Driver lifecycle endpoints
//!
//! Booking creation, arrival confirmation and the booking lookups are
//! unauthenticated (driver kiosk). Everything from verification onward
//! requires a staff token; dock calls and checkout need an operations
//! role.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::driver::{
        CallDriver, CompleteVisit, ConfirmArrival, CreateArrival, CreateBooking, DriverRecord,
        RecallDriver, RejectDriver, VerifyDriver,
    },
    services::{geo::LocationCheck, views::View},
};

use super::AuthenticatedStaff;

#[derive(Deserialize, IntoParams)]
pub struct ListQuery {
    /// Named worklist: waiting, called, loading, history or security-inbound
    pub view: Option<String>,
    /// Case-insensitive plate or company filter
    pub search: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Plate or phone fragment
    pub q: String,
}

/// Arrival confirmation result including the GPS distance check
#[derive(Serialize, ToSchema)]
pub struct ConfirmArrivalResponse {
    pub driver: DriverRecord,
    pub location_check: Option<LocationCheck>,
}

/// List driver records, optionally filtered to a worklist
#[utoipa::path(
    get,
    path = "/drivers",
    tag = "drivers",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Driver records", body = Vec<DriverRecord>),
        (status = 400, description = "Unknown view name")
    )
)]
pub async fn list_drivers(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DriverRecord>>> {
    let view = query
        .view
        .as_deref()
        .map(View::from_str)
        .transpose()
        .map_err(AppError::Validation)?;

    let drivers = state
        .services
        .lifecycle
        .list_drivers(view, query.search.as_deref())
        .await?;
    Ok(Json(drivers))
}

/// Get one driver record
#[utoipa::path(
    get,
    path = "/drivers/{id}",
    tag = "drivers",
    params(("id" = Uuid, Path, description = "Driver record id")),
    responses(
        (status = 200, description = "Driver record", body = DriverRecord),
        (status = 404, description = "No such driver")
    )
)]
pub async fn get_driver(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DriverRecord>> {
    let driver = state.services.lifecycle.get_driver(id).await?;
    Ok(Json(driver))
}

/// Create a pre-arrival booking
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "drivers",
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created", body = DriverRecord),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Booking code collision, retry"),
        (status = 422, description = "Slot fully booked")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    Json(booking): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<DriverRecord>)> {
    let driver = state.services.lifecycle.create_booking(booking).await?;
    Ok((StatusCode::CREATED, Json(driver)))
}

/// Look up a booking by its code
#[utoipa::path(
    get,
    path = "/bookings/{code}",
    tag = "drivers",
    params(("code" = String, Path, description = "Booking code")),
    responses(
        (status = 200, description = "Booking found", body = DriverRecord),
        (status = 404, description = "No booking with that code")
    )
)]
pub async fn find_booking(
    State(state): State<crate::AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<DriverRecord>> {
    let driver = state.services.lifecycle.find_booking_by_code(&code).await?;
    Ok(Json(driver))
}

/// Find an open booking by plate or phone fragment
#[utoipa::path(
    get,
    path = "/bookings/search",
    tag = "drivers",
    params(SearchQuery),
    responses(
        (status = 200, description = "Open booking found", body = DriverRecord),
        (status = 404, description = "No open booking matches")
    )
)]
pub async fn search_booking(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<DriverRecord>> {
    let driver = state.services.lifecycle.find_active_booking(&query.q).await?;
    Ok(Json(driver))
}

/// Register a walk-in vehicle at the gate
#[utoipa::path(
    post,
    path = "/arrivals",
    tag = "drivers",
    request_body = CreateArrival,
    responses(
        (status = 201, description = "Walk-in registered", body = DriverRecord),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_arrival(
    State(state): State<crate::AppState>,
    Json(arrival): Json<CreateArrival>,
) -> AppResult<(StatusCode, Json<DriverRecord>)> {
    let driver = state.services.lifecycle.create_arrival(arrival).await?;
    Ok((StatusCode::CREATED, Json(driver)))
}

/// Booked driver confirms arrival at the gate
#[utoipa::path(
    post,
    path = "/drivers/{id}/confirm-arrival",
    tag = "drivers",
    params(("id" = Uuid, Path, description = "Driver record id")),
    request_body = ConfirmArrival,
    responses(
        (status = 200, description = "Arrival confirmed", body = ConfirmArrivalResponse),
        (status = 404, description = "No such driver"),
        (status = 422, description = "Record is not awaiting arrival")
    )
)]
pub async fn confirm_arrival(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmArrival>,
) -> AppResult<Json<ConfirmArrivalResponse>> {
    let (driver, location_check) = state.services.lifecycle.confirm_arrival(id, payload).await?;
    Ok(Json(ConfirmArrivalResponse {
        driver,
        location_check,
    }))
}

/// Security verifies the driver and assigns a queue number
#[utoipa::path(
    post,
    path = "/drivers/{id}/verify",
    tag = "drivers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Driver record id")),
    request_body = VerifyDriver,
    responses(
        (status = 200, description = "Driver admitted", body = DriverRecord),
        (status = 404, description = "No such driver"),
        (status = 422, description = "Record cannot be verified from its state")
    )
)]
pub async fn verify_driver(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<VerifyDriver>,
) -> AppResult<Json<DriverRecord>> {
    claims.require_staff()?;
    let driver = state.services.lifecycle.verify(id, payload).await?;
    Ok(Json(driver))
}

/// Security turns a vehicle away
#[utoipa::path(
    post,
    path = "/drivers/{id}/reject",
    tag = "drivers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Driver record id")),
    request_body = RejectDriver,
    responses(
        (status = 200, description = "Driver rejected", body = DriverRecord),
        (status = 404, description = "No such driver"),
        (status = 422, description = "Record cannot be rejected from its state")
    )
)]
pub async fn reject_driver(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectDriver>,
) -> AppResult<Json<DriverRecord>> {
    claims.require_staff()?;
    let driver = state.services.lifecycle.reject(id, payload).await?;
    Ok(Json(driver))
}

/// Call a waiting vehicle to a dock
#[utoipa::path(
    post,
    path = "/drivers/{id}/call",
    tag = "drivers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Driver record id")),
    request_body = CallDriver,
    responses(
        (status = 200, description = "Driver called", body = DriverRecord),
        (status = 403, description = "Operations role required"),
        (status = 404, description = "No such driver"),
        (status = 422, description = "Record is not waiting to be called")
    )
)]
pub async fn call_driver(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<CallDriver>,
) -> AppResult<Json<DriverRecord>> {
    claims.require_operations()?;
    let driver = state.services.lifecycle.call(id, payload).await?;
    Ok(Json(driver))
}

/// Repeat the dock call for a driver who has not shown up
#[utoipa::path(
    post,
    path = "/drivers/{id}/recall",
    tag = "drivers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Driver record id")),
    request_body = RecallDriver,
    responses(
        (status = 200, description = "Dock call repeated", body = DriverRecord),
        (status = 403, description = "Operations role required"),
        (status = 404, description = "No such driver"),
        (status = 422, description = "Record is not currently called")
    )
)]
pub async fn recall_driver(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecallDriver>,
) -> AppResult<Json<DriverRecord>> {
    claims.require_operations()?;
    let driver = state.services.lifecycle.recall(id, payload).await?;
    Ok(Json(driver))
}

/// Vehicle has docked, loading begins
#[utoipa::path(
    post,
    path = "/drivers/{id}/start-loading",
    tag = "drivers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Driver record id")),
    responses(
        (status = 200, description = "Loading started", body = DriverRecord),
        (status = 403, description = "Operations role required"),
        (status = 404, description = "No such driver"),
        (status = 422, description = "Record has not been called")
    )
)]
pub async fn start_loading(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DriverRecord>> {
    claims.require_operations()?;
    let driver = state.services.lifecycle.start_loading(id).await?;
    Ok(Json(driver))
}

/// Final checkout with exit evidence
#[utoipa::path(
    post,
    path = "/drivers/{id}/complete",
    tag = "drivers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Driver record id")),
    request_body = CompleteVisit,
    responses(
        (status = 200, description = "Visit completed", body = DriverRecord),
        (status = 403, description = "Operations role required"),
        (status = 404, description = "No such driver"),
        (status = 422, description = "Record is not loading")
    )
)]
pub async fn complete_visit(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteVisit>,
) -> AppResult<Json<DriverRecord>> {
    claims.require_operations()?;
    let driver = state.services.lifecycle.complete(id, payload).await?;
    Ok(Json(driver))
}
