//! Role-specific worklist views
//!
//! Pure derivations over the polled record set; the dashboards re-fetch
//! on an interval and filter locally, so these never touch storage.

use std::str::FromStr;

use crate::models::{driver::DriverRecord, enums::QueueStatus};

/// Named worklists backing each role's display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Verified drivers waiting to be called, FIFO by verification time
    Waiting,
    /// Active dock announcements
    Called,
    /// Vehicles at a dock
    Loading,
    /// Completed visits
    History,
    /// Security inbound queue: booked, checked-in or at the gate
    SecurityInbound,
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(View::Waiting),
            "called" => Ok(View::Called),
            "loading" => Ok(View::Loading),
            "history" => Ok(View::History),
            "security-inbound" => Ok(View::SecurityInbound),
            other => Err(format!("unknown view: {}", other)),
        }
    }
}

impl View {
    fn includes(&self, status: QueueStatus) -> bool {
        match self {
            View::Waiting => status == QueueStatus::CheckedIn,
            View::Called => status == QueueStatus::Called,
            View::Loading => status == QueueStatus::Loading,
            View::History => status == QueueStatus::Completed,
            View::SecurityInbound => matches!(
                status,
                QueueStatus::Booked | QueueStatus::CheckedIn | QueueStatus::AtGate
            ),
        }
    }
}

/// Case-insensitive substring match on plate or company
pub fn matches_search(record: &DriverRecord, query: &str) -> bool {
    let q = query.to_lowercase();
    record.license_plate.to_lowercase().contains(&q)
        || record.company.to_lowercase().contains(&q)
}

/// Apply an optional view and an optional search filter to the record set.
/// The waiting view is re-ordered oldest verification first.
pub fn apply(
    records: Vec<DriverRecord>,
    view: Option<View>,
    search: Option<&str>,
) -> Vec<DriverRecord> {
    let mut filtered: Vec<DriverRecord> = records
        .into_iter()
        .filter(|r| view.map_or(true, |v| v.includes(r.status)))
        .filter(|r| search.map_or(true, |q| matches_search(r, q)))
        .collect();

    if view == Some(View::Waiting) {
        filtered.sort_by_key(|r| r.verified_time);
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::models::enums::{EntryType, Purpose};

    fn record(plate: &str, company: &str, status: QueueStatus) -> DriverRecord {
        DriverRecord {
            id: Uuid::new_v4(),
            booking_code: None,
            name: "Driver".to_string(),
            phone: "+628111".to_string(),
            license_plate: plate.to_string(),
            company: company.to_string(),
            purpose: Purpose::Unloading,
            do_number: None,
            remarks: None,
            document_file: None,
            entry_type: EntryType::Booking,
            status,
            gate: None,
            slot_date: None,
            slot_time: None,
            queue_number: None,
            check_in_time: None,
            arrived_at_gate_time: None,
            verified_time: None,
            called_time: None,
            exit_time: None,
            verified_by: None,
            called_by: None,
            exit_verified_by: None,
            rejection_reason: None,
            photo_before_urls: Vec::new(),
            photo_after_urls: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_waiting_view_is_fifo_by_verification() {
        let now = Utc::now();
        let mut newer = record("B 1 A", "Acme", QueueStatus::CheckedIn);
        newer.verified_time = Some(now);
        let mut older = record("B 2 B", "Acme", QueueStatus::CheckedIn);
        older.verified_time = Some(now - Duration::minutes(10));
        let other = record("B 3 C", "Acme", QueueStatus::Called);

        let result = apply(vec![newer.clone(), other, older.clone()], Some(View::Waiting), None);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, older.id);
        assert_eq!(result[1].id, newer.id);
    }

    #[test]
    fn test_security_inbound_statuses() {
        let records = vec![
            record("B 1 A", "Acme", QueueStatus::Booked),
            record("B 2 B", "Acme", QueueStatus::AtGate),
            record("B 3 C", "Acme", QueueStatus::CheckedIn),
            record("B 4 D", "Acme", QueueStatus::Called),
            record("B 5 E", "Acme", QueueStatus::Completed),
        ];
        let result = apply(records, Some(View::SecurityInbound), None);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|r| r.status != QueueStatus::Called));
    }

    #[test]
    fn test_search_composes_with_view() {
        let records = vec![
            record("B 1234 XYZ", "Acme Logistics", QueueStatus::Completed),
            record("D 5678 QQ", "Other Corp", QueueStatus::Completed),
            record("B 1234 XYZ", "Acme Logistics", QueueStatus::Booked),
        ];
        let result = apply(records, Some(View::History), Some("acme"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].company, "Acme Logistics");
        assert_eq!(result[0].status, QueueStatus::Completed);
    }

    #[test]
    fn test_search_matches_plate_case_insensitive() {
        let records = vec![
            record("B 1234 XYZ", "Acme", QueueStatus::Booked),
            record("D 1 A", "Beta", QueueStatus::Booked),
        ];
        let result = apply(records, None, Some("1234 xyz"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].license_plate, "B 1234 XYZ");
    }
}
