//! Shared domain enums
//!
//! Statuses are stored as TEXT and decoded into closed enums; an
//! unexpected value in the database is a decode error, never a silent
//! fallthrough.

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArgumentBuffer, PgHasArrayType, PgTypeInfo, PgValueRef};
use std::str::FromStr;
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// QueueStatus
// ---------------------------------------------------------------------------

/// Driver lifecycle states.
///
/// BOOKED and AT_GATE are entry states (booking flow vs walk-in flow);
/// COMPLETED and REJECTED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    Booked,
    AtGate,
    CheckedIn,
    Called,
    Loading,
    Completed,
    Rejected,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Booked => "BOOKED",
            QueueStatus::AtGate => "AT_GATE",
            QueueStatus::CheckedIn => "CHECKED_IN",
            QueueStatus::Called => "CALLED",
            QueueStatus::Loading => "LOADING",
            QueueStatus::Completed => "COMPLETED",
            QueueStatus::Rejected => "REJECTED",
        }
    }
}

impl FromStr for QueueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOOKED" => Ok(QueueStatus::Booked),
            "AT_GATE" => Ok(QueueStatus::AtGate),
            "CHECKED_IN" => Ok(QueueStatus::CheckedIn),
            "CALLED" => Ok(QueueStatus::Called),
            "LOADING" => Ok(QueueStatus::Loading),
            "COMPLETED" => Ok(QueueStatus::Completed),
            "REJECTED" => Ok(QueueStatus::Rejected),
            other => Err(format!("unknown queue status: {}", other)),
        }
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl sqlx::Type<sqlx::Postgres> for QueueStatus {
    fn type_info() -> PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl PgHasArrayType for QueueStatus {
    fn array_type_info() -> PgTypeInfo {
        <&str as PgHasArrayType>::array_type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for QueueStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for QueueStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Lifecycle transitions and their permitted predecessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ConfirmArrival,
    Verify,
    Reject,
    Call,
    Recall,
    StartLoading,
    Complete,
}

impl Transition {
    /// Statuses a record must be in before this transition may apply.
    ///
    /// Verify tolerates BOOKED so security can wave a driver straight
    /// through when the gate confirmation step was skipped.
    pub fn allowed_from(&self) -> &'static [QueueStatus] {
        match self {
            Transition::ConfirmArrival => &[QueueStatus::Booked],
            Transition::Verify => &[QueueStatus::AtGate, QueueStatus::Booked],
            Transition::Reject => &[QueueStatus::AtGate, QueueStatus::Booked],
            Transition::Call => &[QueueStatus::CheckedIn],
            Transition::Recall => &[QueueStatus::Called],
            Transition::StartLoading => &[QueueStatus::Called],
            Transition::Complete => &[QueueStatus::Loading],
        }
    }

    /// The status this transition moves a record into.
    pub fn target(&self) -> QueueStatus {
        match self {
            Transition::ConfirmArrival => QueueStatus::AtGate,
            Transition::Verify => QueueStatus::CheckedIn,
            Transition::Reject => QueueStatus::Rejected,
            Transition::Call => QueueStatus::Called,
            Transition::Recall => QueueStatus::Called,
            Transition::StartLoading => QueueStatus::Loading,
            Transition::Complete => QueueStatus::Completed,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transition::ConfirmArrival => "confirm-arrival",
            Transition::Verify => "verify",
            Transition::Reject => "reject",
            Transition::Call => "call",
            Transition::Recall => "recall",
            Transition::StartLoading => "start-loading",
            Transition::Complete => "complete",
        }
    }
}

// ---------------------------------------------------------------------------
// Purpose
// ---------------------------------------------------------------------------

/// Reason the vehicle visits the warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Purpose {
    Loading,
    Unloading,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Loading => "LOADING",
            Purpose::Unloading => "UNLOADING",
        }
    }
}

impl FromStr for Purpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOADING" => Ok(Purpose::Loading),
            "UNLOADING" => Ok(Purpose::Unloading),
            other => Err(format!("unknown purpose: {}", other)),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for Purpose {
    fn type_info() -> PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for Purpose {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Purpose {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// EntryType
// ---------------------------------------------------------------------------

/// How the record entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    Booking,
    WalkIn,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Booking => "BOOKING",
            EntryType::WalkIn => "WALK_IN",
        }
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOOKING" => Ok(EntryType::Booking),
            "WALK_IN" => Ok(EntryType::WalkIn),
            other => Err(format!("unknown entry type: {}", other)),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for EntryType {
    fn type_info() -> PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for EntryType {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for EntryType {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// GateStatus / GateType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateStatus {
    Active,
    Inactive,
    Maintenance,
}

impl GateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateStatus::Active => "ACTIVE",
            GateStatus::Inactive => "INACTIVE",
            GateStatus::Maintenance => "MAINTENANCE",
        }
    }
}

impl FromStr for GateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(GateStatus::Active),
            "INACTIVE" => Ok(GateStatus::Inactive),
            "MAINTENANCE" => Ok(GateStatus::Maintenance),
            other => Err(format!("unknown gate status: {}", other)),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for GateStatus {
    fn type_info() -> PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for GateStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for GateStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateType {
    Loading,
    Unloading,
    Mixed,
}

impl GateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateType::Loading => "LOADING",
            GateType::Unloading => "UNLOADING",
            GateType::Mixed => "MIXED",
        }
    }
}

impl FromStr for GateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOADING" => Ok(GateType::Loading),
            "UNLOADING" => Ok(GateType::Unloading),
            "MIXED" => Ok(GateType::Mixed),
            other => Err(format!("unknown gate type: {}", other)),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for GateType {
    fn type_info() -> PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for GateType {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for GateType {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Staff roles from the injected credential table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Security,
    Admin,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Security => "SECURITY",
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
        }
    }

    /// Operations roles may call drivers to docks and close out visits
    pub fn is_operations(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SECURITY" => Ok(Role::Security),
            "ADMIN" => Ok(Role::Admin),
            "MANAGER" => Ok(Role::Manager),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in [
            QueueStatus::Booked,
            QueueStatus::AtGate,
            QueueStatus::CheckedIn,
            QueueStatus::Called,
            QueueStatus::Loading,
            QueueStatus::Completed,
            QueueStatus::Rejected,
        ] {
            assert_eq!(s.as_str().parse::<QueueStatus>().unwrap(), s);
        }
        assert!("VERIFIED_MAYBE".parse::<QueueStatus>().is_err());
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(Transition::ConfirmArrival.allowed_from(), &[QueueStatus::Booked]);
        assert!(Transition::Verify.allowed_from().contains(&QueueStatus::AtGate));
        assert!(Transition::Verify.allowed_from().contains(&QueueStatus::Booked));
        assert_eq!(Transition::Call.allowed_from(), &[QueueStatus::CheckedIn]);
        assert_eq!(Transition::Recall.allowed_from(), &[QueueStatus::Called]);
        assert_eq!(Transition::StartLoading.allowed_from(), &[QueueStatus::Called]);
        assert_eq!(Transition::Complete.allowed_from(), &[QueueStatus::Loading]);
    }

    #[test]
    fn test_terminal_states_have_no_outgoing_edges() {
        for t in [
            Transition::ConfirmArrival,
            Transition::Verify,
            Transition::Reject,
            Transition::Call,
            Transition::Recall,
            Transition::StartLoading,
            Transition::Complete,
        ] {
            assert!(!t.allowed_from().contains(&QueueStatus::Completed));
            assert!(!t.allowed_from().contains(&QueueStatus::Rejected));
        }
    }

    #[test]
    fn test_recall_keeps_called() {
        assert_eq!(Transition::Recall.target(), QueueStatus::Called);
    }
}
