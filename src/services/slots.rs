//! Daily slot grid and capacity counting
//!
//! The grid is fixed: nine business-hour buckets, the midday bucket is
//! never offered, Friday additionally loses the late-morning bucket
//! (prayer time), Sunday is closed.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::{error::AppResult, models::slot::SlotInfo, repository::Repository};

pub const BASE_SLOTS: [&str; 9] = [
    "08:00 - 09:00",
    "09:00 - 10:00",
    "10:00 - 11:00",
    "11:00 - 12:00",
    "12:00 - 13:00",
    "13:00 - 14:00",
    "14:00 - 15:00",
    "15:00 - 16:00",
    "16:00 - 17:00",
];

const MIDDAY_SLOT: &str = "12:00 - 13:00";
const FRIDAY_EXTRA_EXCLUSION: &str = "11:00 - 12:00";

/// Slot labels offered on a given weekday
pub fn active_slot_labels(weekday: Weekday) -> Vec<&'static str> {
    match weekday {
        Weekday::Sun => Vec::new(),
        Weekday::Fri => BASE_SLOTS
            .iter()
            .copied()
            .filter(|l| *l != MIDDAY_SLOT && *l != FRIDAY_EXTRA_EXCLUSION)
            .collect(),
        _ => BASE_SLOTS
            .iter()
            .copied()
            .filter(|l| *l != MIDDAY_SLOT)
            .collect(),
    }
}

/// Assemble slot availability from per-label booking counts
pub fn build_slots(
    labels: &[&'static str],
    booked: &HashMap<String, i64>,
    capacity: i64,
) -> Vec<SlotInfo> {
    labels
        .iter()
        .map(|label| {
            let count = booked.get(*label).copied().unwrap_or(0);
            SlotInfo {
                time_label: (*label).to_string(),
                capacity,
                booked: count,
                is_available: count < capacity,
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct SlotsService {
    repository: Repository,
    capacity: i64,
}

impl SlotsService {
    pub fn new(repository: Repository, capacity: i64) -> Self {
        Self { repository, capacity }
    }

    /// Slot grid with remaining capacity for one date.
    /// Purely derived from the booking table; no side effects.
    pub async fn available_slots(&self, date: NaiveDate) -> AppResult<Vec<SlotInfo>> {
        let labels = active_slot_labels(date.weekday());
        if labels.is_empty() {
            return Ok(Vec::new());
        }

        let counts: HashMap<String, i64> = self
            .repository
            .drivers
            .slot_counts(date)
            .await?
            .into_iter()
            .collect();

        Ok(build_slots(&labels, &counts, self.capacity))
    }
}
