//! Dock call watcher feeding the announcement queue
//!
//! Polls the driver table and enqueues an announcement for every record
//! that is currently called and has not been announced yet. A recall
//! re-stamps the call time, which makes the record newer than the last
//! announcement and triggers a repeat.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::time::{interval, Duration};
use uuid::Uuid;

use crate::{
    models::{driver::DriverRecord, enums::QueueStatus},
    repository::Repository,
    services::announcer::{Announcement, Announcer},
};

/// Pick the records that need announcing and update the announced set.
///
/// `announced` maps driver id to the call time last spoken for it; a
/// record with a newer call time is announced again.
pub fn collect_new_announcements(
    records: &[DriverRecord],
    announced: &mut HashMap<Uuid, DateTime<Utc>>,
) -> Vec<Announcement> {
    let mut out = Vec::new();
    for record in records {
        if record.status != QueueStatus::Called {
            continue;
        }
        let (Some(called_time), Some(gate)) = (record.called_time, record.gate.as_deref()) else {
            continue;
        };
        let is_new = announced
            .get(&record.id)
            .map_or(true, |last| *last < called_time);
        if is_new {
            announced.insert(record.id, called_time);
            out.push(Announcement {
                driver_id: record.id,
                license_plate: record.license_plate.clone(),
                gate: gate.to_string(),
            });
        }
    }
    out
}

/// Spawn the polling task behind the public monitor
pub fn spawn_monitor(repository: Repository, announcer: Announcer, poll_interval_secs: u64) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(poll_interval_secs.max(1)));
        let mut announced: HashMap<Uuid, DateTime<Utc>> = HashMap::new();

        loop {
            ticker.tick().await;
            let records = match repository.drivers.list_all().await {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("Monitor poll failed: {}", e);
                    continue;
                }
            };

            for announcement in collect_new_announcements(&records, &mut announced) {
                announcer.enqueue(announcement);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    use crate::models::enums::{EntryType, Purpose};

    fn called_record(plate: &str, called_time: DateTime<Utc>) -> DriverRecord {
        DriverRecord {
            id: Uuid::new_v4(),
            booking_code: None,
            name: "Driver".to_string(),
            phone: "+628111".to_string(),
            license_plate: plate.to_string(),
            company: "Acme".to_string(),
            purpose: Purpose::Loading,
            do_number: None,
            remarks: None,
            document_file: None,
            entry_type: EntryType::WalkIn,
            status: QueueStatus::Called,
            gate: Some("GATE_1".to_string()),
            slot_date: None,
            slot_time: None,
            queue_number: Some("SOC-001".to_string()),
            check_in_time: None,
            arrived_at_gate_time: None,
            verified_time: Some(called_time - ChronoDuration::minutes(5)),
            called_time: Some(called_time),
            exit_time: None,
            verified_by: None,
            called_by: Some("admin".to_string()),
            exit_verified_by: None,
            rejection_reason: None,
            photo_before_urls: Vec::new(),
            photo_after_urls: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_called_record_announced_once() {
        let record = called_record("B 1 A", Utc::now());
        let mut announced = HashMap::new();

        let first = collect_new_announcements(&[record.clone()], &mut announced);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].driver_id, record.id);

        let second = collect_new_announcements(&[record], &mut announced);
        assert!(second.is_empty());
    }

    #[test]
    fn test_recall_with_newer_call_time_reannounces() {
        let mut record = called_record("B 1 A", Utc::now());
        let mut announced = HashMap::new();

        assert_eq!(collect_new_announcements(&[record.clone()], &mut announced).len(), 1);

        record.called_time = Some(Utc::now() + ChronoDuration::seconds(30));
        let again = collect_new_announcements(&[record], &mut announced);
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn test_non_called_statuses_are_skipped() {
        let mut loading = called_record("B 1 A", Utc::now());
        loading.status = QueueStatus::Loading;
        let mut announced = HashMap::new();
        assert!(collect_new_announcements(&[loading], &mut announced).is_empty());
    }

    #[test]
    fn test_missing_gate_is_skipped() {
        let mut record = called_record("B 1 A", Utc::now());
        record.gate = None;
        let mut announced = HashMap::new();
        assert!(collect_new_announcements(&[record], &mut announced).is_empty());
        assert!(announced.is_empty());
    }
}
