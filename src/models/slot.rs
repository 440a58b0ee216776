//! Time-slot availability, derived from the booking table

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Availability of one booking window on a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SlotInfo {
    /// Fixed hourly label, e.g. "09:00 - 10:00"
    pub time_label: String,
    pub capacity: i64,
    pub booked: i64,
    pub is_available: bool,
}
