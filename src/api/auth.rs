//! Staff authentication endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, models::staff::StaffProfile};

use super::AuthenticatedStaff;

/// Login request with staff id and PIN
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Staff identifier, e.g. "SEC01"
    pub id: String,
    /// Numeric PIN
    pub pin: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub profile: StaffProfile,
}

/// Exchange staff credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, profile) = state.services.auth.login(&request.id, &request.pin)?;
    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        profile,
    }))
}

/// Profile of the authenticated staff member
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current staff profile", body = StaffProfile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(AuthenticatedStaff(claims): AuthenticatedStaff) -> Json<StaffProfile> {
    Json(StaffProfile {
        id: claims.sub,
        name: claims.name,
        role: claims.role,
    })
}
