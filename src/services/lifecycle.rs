//! Driver lifecycle orchestration
//!
//! Transition legality lives in [`Transition::allowed_from`] and is
//! enforced by the conditional repository updates; this service layers
//! validation, code generation, GPS checks and notifications on top.
//! Notifications are sent after the write commits and never roll it back.

use chrono::{DateTime, Datelike, Local, LocalResult, NaiveTime, TimeZone, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::WarehouseConfig,
    error::{AppError, AppResult},
    models::{
        driver::{
            CallDriver, CompleteVisit, ConfirmArrival, CreateArrival, CreateBooking, DriverRecord,
            Position, RecallDriver, RejectDriver, VerifyDriver,
        },
        enums::{QueueStatus, Transition},
    },
    repository::Repository,
    services::{
        codes,
        geo::{self, LocationCheck},
        notify::{self, NotifyService},
        slots,
        views::{self, View},
    },
};

#[derive(Clone)]
pub struct LifecycleService {
    repository: Repository,
    notify: NotifyService,
    warehouse: WarehouseConfig,
}

impl LifecycleService {
    pub fn new(repository: Repository, notify: NotifyService, warehouse: WarehouseConfig) -> Self {
        Self {
            repository,
            notify,
            warehouse,
        }
    }

    /// Register a pre-arrival booking: slot must be offered on that
    /// weekday and still have capacity, then a booking code is minted.
    pub async fn create_booking(&self, booking: CreateBooking) -> AppResult<DriverRecord> {
        booking
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let labels = slots::active_slot_labels(booking.slot_date.weekday());
        if !labels.contains(&booking.slot_time.as_str()) {
            return Err(AppError::Validation(format!(
                "Slot {} is not offered on {}",
                booking.slot_time, booking.slot_date
            )));
        }

        let taken = self
            .repository
            .drivers
            .count_for_slot(booking.slot_date, &booking.slot_time)
            .await?;
        if taken >= self.warehouse.slot_capacity {
            return Err(AppError::SlotUnavailable(format!(
                "Slot {} on {} is fully booked",
                booking.slot_time, booking.slot_date
            )));
        }

        let now = Utc::now();
        let prefix = codes::period_prefix(&self.warehouse.code_prefix, Local::now().date_naive());
        let last = self.repository.drivers.last_booking_code(&prefix).await?;
        let code = codes::next_booking_code(&prefix, last.as_deref());

        // A concurrent booking racing to the same code trips the unique
        // index and surfaces as a retryable conflict.
        let record = self
            .repository
            .drivers
            .insert_booking(&booking, &code, now)
            .await?;

        tracing::info!(booking_code = %code, plate = %record.license_plate, "Booking created");
        self.notify
            .notify_driver(
                &record.phone,
                &notify::booking_confirmation(
                    &record.name,
                    &code,
                    &record.license_plate,
                    record.slot_date,
                    record.slot_time.as_deref(),
                ),
            )
            .await;

        Ok(record)
    }

    /// Register a walk-in vehicle already standing at the gate
    pub async fn create_arrival(&self, arrival: CreateArrival) -> AppResult<DriverRecord> {
        arrival
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let record = self
            .repository
            .drivers
            .insert_arrival(&arrival, Utc::now())
            .await?;
        tracing::info!(plate = %record.license_plate, "Walk-in arrival registered");
        Ok(record)
    }

    /// Booked driver reports arrival at the gate. When a position is
    /// supplied the distance check result is recorded in the remarks and
    /// returned to the caller; an out-of-range position does not block
    /// the transition, security decides.
    pub async fn confirm_arrival(
        &self,
        id: Uuid,
        payload: ConfirmArrival,
    ) -> AppResult<(DriverRecord, Option<LocationCheck>)> {
        let check = payload.position.map(|reported| {
            geo::check_position(
                reported,
                Position {
                    latitude: self.warehouse.latitude,
                    longitude: self.warehouse.longitude,
                },
                self.warehouse.max_distance_meters,
            )
        });

        let remarks = match (&payload.remarks, &check) {
            (Some(remarks), Some(check)) => Some(format!("{} | {}", remarks, gps_note(check))),
            (None, Some(check)) => Some(gps_note(check)),
            (remarks, None) => remarks.clone(),
        };

        let record = self
            .repository
            .drivers
            .apply_confirm_arrival(
                id,
                remarks.as_deref(),
                payload.name.as_deref(),
                payload.license_plate.as_deref(),
                payload.phone.as_deref(),
                payload.company.as_deref(),
                payload.document_file.as_deref(),
                Utc::now(),
            )
            .await?;

        match record {
            Some(record) => Ok((record, check)),
            None => Err(self.invalid_transition(id, Transition::ConfirmArrival).await),
        }
    }

    /// Security verifies documents and admits the vehicle; assigns the
    /// same-day queue number and notifies driver plus operations group.
    pub async fn verify(&self, id: Uuid, payload: VerifyDriver) -> AppResult<DriverRecord> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let verified_today = self
            .repository
            .drivers
            .count_verified_since(local_midnight_utc())
            .await?;
        let queue_number = codes::queue_number(&self.warehouse.code_prefix, verified_today);

        let record = self
            .repository
            .drivers
            .apply_verify(
                id,
                &queue_number,
                &payload.verifier,
                payload.notes.as_deref(),
                &payload.photos,
                Utc::now(),
            )
            .await?;

        let Some(record) = record else {
            return Err(self.invalid_transition(id, Transition::Verify).await);
        };

        tracing::info!(queue_number = %queue_number, plate = %record.license_plate, "Driver verified");
        self.notify
            .notify_driver(&record.phone, &notify::queue_ticket(&queue_number))
            .await;
        self.notify
            .notify_ops(&notify::ops_entry_approved(&record.company, &queue_number))
            .await;

        Ok(record)
    }

    /// Turn a vehicle away at the gate
    pub async fn reject(&self, id: Uuid, payload: RejectDriver) -> AppResult<DriverRecord> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let record = self
            .repository
            .drivers
            .apply_reject(id, &payload.reason, &payload.verifier)
            .await?;

        let Some(record) = record else {
            return Err(self.invalid_transition(id, Transition::Reject).await);
        };

        tracing::info!(plate = %record.license_plate, reason = %payload.reason, "Driver rejected");
        self.notify
            .notify_driver(&record.phone, &notify::booking_rejected(&payload.reason))
            .await;

        Ok(record)
    }

    /// Call a waiting vehicle to a dock
    pub async fn call(&self, id: Uuid, payload: CallDriver) -> AppResult<DriverRecord> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let record = self
            .repository
            .drivers
            .apply_call(id, &payload.gate, &payload.caller, Utc::now())
            .await?;

        let Some(record) = record else {
            return Err(self.invalid_transition(id, Transition::Call).await);
        };

        tracing::info!(plate = %record.license_plate, gate = %payload.gate, "Driver called to dock");
        self.notify
            .notify_driver(&record.phone, &notify::gate_call(&record.name, &payload.gate))
            .await;

        Ok(record)
    }

    /// Repeat the dock call for a driver who has not shown up. The call
    /// time is re-stamped so the monitor announces again.
    pub async fn recall(&self, id: Uuid, payload: RecallDriver) -> AppResult<DriverRecord> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let record = self
            .repository
            .drivers
            .apply_recall(id, &payload.caller, Utc::now())
            .await?;

        let Some(record) = record else {
            return Err(self.invalid_transition(id, Transition::Recall).await);
        };

        tracing::info!(plate = %record.license_plate, "Dock call repeated");
        if let Some(gate) = record.gate.as_deref() {
            self.notify
                .notify_driver(&record.phone, &notify::gate_call(&record.name, gate))
                .await;
        }

        Ok(record)
    }

    /// Vehicle has docked, loading or unloading begins
    pub async fn start_loading(&self, id: Uuid) -> AppResult<DriverRecord> {
        match self.repository.drivers.apply_start_loading(id).await? {
            Some(record) => Ok(record),
            None => Err(self.invalid_transition(id, Transition::StartLoading).await),
        }
    }

    /// Final checkout with exit evidence
    pub async fn complete(&self, id: Uuid, payload: CompleteVisit) -> AppResult<DriverRecord> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let record = self
            .repository
            .drivers
            .apply_complete(
                id,
                &payload.verifier,
                payload.notes.as_deref(),
                &payload.photos,
                Utc::now(),
            )
            .await?;

        let Some(record) = record else {
            return Err(self.invalid_transition(id, Transition::Complete).await);
        };

        tracing::info!(plate = %record.license_plate, "Visit completed");
        if let Some(exit_time) = record.exit_time {
            self.notify
                .notify_driver(
                    &record.phone,
                    &notify::checkout_confirmation(&record.name, exit_time),
                )
                .await;
        }

        Ok(record)
    }

    pub async fn get_driver(&self, id: Uuid) -> AppResult<DriverRecord> {
        self.repository.drivers.get_by_id(id).await
    }

    /// Dashboard listing with optional view and search filters
    pub async fn list_drivers(
        &self,
        view: Option<View>,
        search: Option<&str>,
    ) -> AppResult<Vec<DriverRecord>> {
        let records = self.repository.drivers.list_all().await?;
        Ok(views::apply(records, view, search))
    }

    pub async fn find_booking_by_code(&self, code: &str) -> AppResult<DriverRecord> {
        self.repository.drivers.find_by_booking_code(code).await
    }

    pub async fn find_active_booking(&self, query: &str) -> AppResult<DriverRecord> {
        self.repository
            .drivers
            .find_active_by_plate_or_phone(query)
            .await
    }

    pub async fn counts_by_status(&self) -> AppResult<Vec<(QueueStatus, i64)>> {
        self.repository.drivers.counts_by_status().await
    }

    /// A conditional update matched no row: either the record is missing
    /// (404 from the lookup) or it exists in a state the transition does
    /// not accept.
    async fn invalid_transition(&self, id: Uuid, transition: Transition) -> AppError {
        match self.repository.drivers.get_by_id(id).await {
            Ok(record) => AppError::InvalidTransition(format!(
                "Cannot {} a {} record",
                transition.name(),
                record.status
            )),
            Err(e) => e,
        }
    }
}

fn gps_note(check: &LocationCheck) -> String {
    if check.valid {
        format!("GPS OK ({}m from warehouse)", check.distance_meters)
    } else {
        format!("GPS OUT OF RANGE ({}m from warehouse)", check.distance_meters)
    }
}

/// Midnight of the current local calendar day, in UTC. Queue numbers
/// reset on the warehouse's wall-clock day, not the UTC day.
fn local_midnight_utc() -> DateTime<Utc> {
    let midnight = Local::now().date_naive().and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
        LocalResult::None => Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_midnight_is_in_the_past_day() {
        let midnight = local_midnight_utc();
        let now = Utc::now();
        assert!(midnight <= now);
        assert!(now - midnight <= chrono::Duration::hours(24));
    }

    #[test]
    fn test_gps_note_wording() {
        let ok = gps_note(&LocationCheck {
            latitude: 0.0,
            longitude: 0.0,
            distance_meters: 120.0,
            valid: true,
        });
        assert!(ok.contains("GPS OK"));

        let bad = gps_note(&LocationCheck {
            latitude: 0.0,
            longitude: 0.0,
            distance_meters: 5200.0,
            valid: false,
        });
        assert!(bad.contains("OUT OF RANGE"));
    }
}
