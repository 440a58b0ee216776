//! Loading dock configuration

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::{GateStatus, GateType};

/// One configured loading dock
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GateConfig {
    pub id: Uuid,
    /// Stable identifier used on tickets and announcements, e.g. "GATE_2"
    pub gate_id: String,
    pub name: String,
    pub capacity: i32,
    pub status: GateStatus,
    pub gate_type: GateType,
}

/// Upsert payload for a dock, keyed by `gate_id`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveGateConfig {
    #[validate(length(min = 1, message = "Gate name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,
    pub status: GateStatus,
    pub gate_type: GateType,
}
