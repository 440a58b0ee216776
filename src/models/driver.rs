//! Driver visit record and lifecycle request payloads

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::{EntryType, Purpose, QueueStatus};

/// Indonesian plate shape: area code, digits, optional series letters
static PLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{1,2} [0-9]{1,4}( [A-Z]{1,3})?$").unwrap());

/// One row per vehicle visit. Mutated only through the lifecycle
/// transitions; each timestamp is written exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DriverRecord {
    pub id: Uuid,
    /// Assigned at booking creation, absent for walk-ins
    pub booking_code: Option<String>,
    pub name: String,
    pub phone: String,
    pub license_plate: String,
    pub company: String,
    pub purpose: Purpose,
    pub do_number: Option<String>,
    pub remarks: Option<String>,
    pub document_file: Option<String>,
    pub entry_type: EntryType,

    pub status: QueueStatus,
    pub gate: Option<String>,
    pub slot_date: Option<NaiveDate>,
    pub slot_time: Option<String>,
    /// Same-day display number, assigned at verification
    pub queue_number: Option<String>,

    pub check_in_time: Option<DateTime<Utc>>,
    pub arrived_at_gate_time: Option<DateTime<Utc>>,
    pub verified_time: Option<DateTime<Utc>>,
    pub called_time: Option<DateTime<Utc>>,
    pub exit_time: Option<DateTime<Utc>>,

    pub verified_by: Option<String>,
    pub called_by: Option<String>,
    pub exit_verified_by: Option<String>,
    pub rejection_reason: Option<String>,

    pub photo_before_urls: Vec<String>,
    pub photo_after_urls: Vec<String>,

    pub created_at: DateTime<Utc>,
}

/// Create a booking (driver kiosk, pre-arrival)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBooking {
    #[validate(length(min = 1, message = "Driver name is required"))]
    pub name: String,
    #[validate(length(min = 8, message = "Phone number is required"))]
    pub phone: String,
    #[validate(regex(path = *PLATE_RE, message = "Malformed license plate"))]
    pub license_plate: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    pub purpose: Purpose,
    #[validate(length(min = 1, message = "Delivery order number is required"))]
    pub do_number: String,
    pub slot_date: NaiveDate,
    #[validate(length(min = 1, message = "Slot time is required"))]
    pub slot_time: String,
    pub document_file: Option<String>,
    pub remarks: Option<String>,
}

/// Register a walk-in vehicle directly at the gate
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateArrival {
    #[validate(length(min = 1, message = "Driver name is required"))]
    pub name: String,
    #[validate(length(min = 8, message = "Phone number is required"))]
    pub phone: String,
    #[validate(regex(path = *PLATE_RE, message = "Malformed license plate"))]
    pub license_plate: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    pub purpose: Purpose,
    pub do_number: Option<String>,
    pub remarks: Option<String>,
}

/// Driver-reported position at arrival confirmation
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Confirm a booked driver has arrived at the gate.
/// Field edits let security correct details against the physical documents.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ConfirmArrival {
    pub remarks: Option<String>,
    pub position: Option<Position>,
    pub name: Option<String>,
    pub license_plate: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub document_file: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyDriver {
    #[validate(length(min = 1, message = "Verifier is required"))]
    pub verifier: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectDriver {
    #[validate(length(min = 1, message = "Verifier is required"))]
    pub verifier: String,
    #[validate(length(min = 1, message = "Rejection reason is required"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CallDriver {
    #[validate(length(min = 1, message = "Caller is required"))]
    pub caller: String,
    #[validate(length(min = 1, message = "Gate is required"))]
    pub gate: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecallDriver {
    #[validate(length(min = 1, message = "Caller is required"))]
    pub caller: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CompleteVisit {
    #[validate(length(min = 1, message = "Verifier is required"))]
    pub verifier: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_regex() {
        assert!(PLATE_RE.is_match("B 1234 XYZ"));
        assert!(PLATE_RE.is_match("AB 1 C"));
        assert!(PLATE_RE.is_match("D 99"));
        assert!(!PLATE_RE.is_match("b 1234 xyz"));
        assert!(!PLATE_RE.is_match("B1234XYZ"));
        assert!(!PLATE_RE.is_match(""));
    }
}
