//! Drivers repository for database operations
//!
//! Every lifecycle write is a single conditional UPDATE guarded by the
//! permitted predecessor statuses, so a transition either applies fully
//! or not at all even with concurrent operators.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        driver::{CreateArrival, CreateBooking, DriverRecord},
        enums::{QueueStatus, Transition},
    },
};

#[derive(Clone)]
pub struct DriversRepository {
    pool: Pool<Postgres>,
}

impl DriversRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get driver record by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<DriverRecord> {
        sqlx::query_as::<_, DriverRecord>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Driver with id {} not found", id)))
    }

    /// Full record set, newest first (the dashboards poll this)
    pub async fn list_all(&self) -> AppResult<Vec<DriverRecord>> {
        let records = sqlx::query_as::<_, DriverRecord>(
            "SELECT * FROM drivers ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Look up a booking by its code, case-insensitive
    pub async fn find_by_booking_code(&self, code: &str) -> AppResult<DriverRecord> {
        sqlx::query_as::<_, DriverRecord>("SELECT * FROM drivers WHERE booking_code ILIKE $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No booking with code {}", code)))
    }

    /// Find an open booking by plate or phone substring
    pub async fn find_active_by_plate_or_phone(&self, query: &str) -> AppResult<DriverRecord> {
        sqlx::query_as::<_, DriverRecord>(
            r#"
            SELECT * FROM drivers
            WHERE (license_plate ILIKE '%' || $1 || '%' OR phone ILIKE '%' || $1 || '%')
              AND status = 'BOOKED'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(query)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No open booking matching {}", query)))
    }

    /// Highest existing booking code for a period prefix.
    /// Zero-padded sequences sort correctly as strings.
    pub async fn last_booking_code(&self, prefix: &str) -> AppResult<Option<String>> {
        let code = sqlx::query_scalar::<_, String>(
            r#"
            SELECT booking_code FROM drivers
            WHERE booking_code LIKE $1 || '%'
            ORDER BY booking_code DESC
            LIMIT 1
            "#,
        )
        .bind(prefix)
        .fetch_optional(&self.pool)
        .await?;
        Ok(code)
    }

    /// Verifications recorded since the given instant (queue numbering)
    pub async fn count_verified_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM drivers WHERE status = 'CHECKED_IN' AND verified_time >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Bookings per slot label for one date
    pub async fn slot_counts(&self, date: NaiveDate) -> AppResult<Vec<(String, i64)>> {
        let counts = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT slot_time, COUNT(*) FROM drivers
            WHERE slot_date = $1 AND slot_time IS NOT NULL
            GROUP BY slot_time
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    /// Bookings already holding one specific slot
    pub async fn count_for_slot(&self, date: NaiveDate, label: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM drivers WHERE slot_date = $1 AND slot_time = $2",
        )
        .bind(date)
        .bind(label)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Record counts grouped by lifecycle status
    pub async fn counts_by_status(&self) -> AppResult<Vec<(QueueStatus, i64)>> {
        let counts = sqlx::query_as::<_, (QueueStatus, i64)>(
            "SELECT status, COUNT(*) FROM drivers GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    /// Insert a new booking (entry state BOOKED)
    pub async fn insert_booking(
        &self,
        booking: &CreateBooking,
        booking_code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<DriverRecord> {
        let record = sqlx::query_as::<_, DriverRecord>(
            r#"
            INSERT INTO drivers (
                booking_code, name, phone, license_plate, company, purpose,
                do_number, remarks, document_file, entry_type,
                status, slot_date, slot_time, check_in_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'BOOKING', 'BOOKED', $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(booking_code)
        .bind(&booking.name)
        .bind(&booking.phone)
        .bind(&booking.license_plate)
        .bind(&booking.company)
        .bind(booking.purpose)
        .bind(&booking.do_number)
        .bind(&booking.remarks)
        .bind(&booking.document_file)
        .bind(booking.slot_date)
        .bind(&booking.slot_time)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    /// Insert a walk-in arrival (entry state AT_GATE, no booking code)
    pub async fn insert_arrival(
        &self,
        arrival: &CreateArrival,
        now: DateTime<Utc>,
    ) -> AppResult<DriverRecord> {
        let record = sqlx::query_as::<_, DriverRecord>(
            r#"
            INSERT INTO drivers (
                name, phone, license_plate, company, purpose,
                do_number, remarks, entry_type, status, arrived_at_gate_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'WALK_IN', 'AT_GATE', $8)
            RETURNING *
            "#,
        )
        .bind(&arrival.name)
        .bind(&arrival.phone)
        .bind(&arrival.license_plate)
        .bind(&arrival.company)
        .bind(arrival.purpose)
        .bind(&arrival.do_number)
        .bind(&arrival.remarks)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    /// BOOKED -> AT_GATE with optional field corrections
    #[allow(clippy::too_many_arguments)]
    pub async fn apply_confirm_arrival(
        &self,
        id: Uuid,
        remarks: Option<&str>,
        name: Option<&str>,
        license_plate: Option<&str>,
        phone: Option<&str>,
        company: Option<&str>,
        document_file: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<DriverRecord>> {
        let record = sqlx::query_as::<_, DriverRecord>(
            r#"
            UPDATE drivers SET
                status = 'AT_GATE',
                arrived_at_gate_time = $3,
                remarks = COALESCE($4, remarks),
                name = COALESCE($5, name),
                license_plate = COALESCE($6, license_plate),
                phone = COALESCE($7, phone),
                company = COALESCE($8, company),
                document_file = COALESCE($9, document_file)
            WHERE id = $1 AND status = ANY($2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Transition::ConfirmArrival.allowed_from())
        .bind(now)
        .bind(remarks)
        .bind(name)
        .bind(license_plate)
        .bind(phone)
        .bind(company)
        .bind(document_file)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// AT_GATE/BOOKED -> CHECKED_IN with queue number and arrival photos
    pub async fn apply_verify(
        &self,
        id: Uuid,
        queue_number: &str,
        verifier: &str,
        notes: Option<&str>,
        photos: &[String],
        now: DateTime<Utc>,
    ) -> AppResult<Option<DriverRecord>> {
        let record = sqlx::query_as::<_, DriverRecord>(
            r#"
            UPDATE drivers SET
                status = 'CHECKED_IN',
                queue_number = $3,
                verified_by = $4,
                verified_time = $5,
                remarks = COALESCE($6, remarks),
                photo_before_urls = $7
            WHERE id = $1 AND status = ANY($2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Transition::Verify.allowed_from())
        .bind(queue_number)
        .bind(verifier)
        .bind(now)
        .bind(notes)
        .bind(photos)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// AT_GATE/BOOKED -> REJECTED
    pub async fn apply_reject(
        &self,
        id: Uuid,
        reason: &str,
        verifier: &str,
    ) -> AppResult<Option<DriverRecord>> {
        let record = sqlx::query_as::<_, DriverRecord>(
            r#"
            UPDATE drivers SET
                status = 'REJECTED',
                rejection_reason = $3,
                verified_by = $4
            WHERE id = $1 AND status = ANY($2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Transition::Reject.allowed_from())
        .bind(reason)
        .bind(verifier)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// CHECKED_IN -> CALLED with dock assignment
    pub async fn apply_call(
        &self,
        id: Uuid,
        gate: &str,
        caller: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<DriverRecord>> {
        let record = sqlx::query_as::<_, DriverRecord>(
            r#"
            UPDATE drivers SET
                status = 'CALLED',
                gate = $3,
                called_by = $4,
                called_time = $5
            WHERE id = $1 AND status = ANY($2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Transition::Call.allowed_from())
        .bind(gate)
        .bind(caller)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// CALLED -> CALLED: re-stamp the call so the monitor re-announces
    pub async fn apply_recall(
        &self,
        id: Uuid,
        caller: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<DriverRecord>> {
        let record = sqlx::query_as::<_, DriverRecord>(
            r#"
            UPDATE drivers SET
                called_by = $3,
                called_time = $4
            WHERE id = $1 AND status = ANY($2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Transition::Recall.allowed_from())
        .bind(caller)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// CALLED -> LOADING, status change only
    pub async fn apply_start_loading(&self, id: Uuid) -> AppResult<Option<DriverRecord>> {
        let record = sqlx::query_as::<_, DriverRecord>(
            r#"
            UPDATE drivers SET status = 'LOADING'
            WHERE id = $1 AND status = ANY($2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Transition::StartLoading.allowed_from())
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// LOADING -> COMPLETED with exit evidence
    pub async fn apply_complete(
        &self,
        id: Uuid,
        verifier: &str,
        notes: Option<&str>,
        photos: &[String],
        now: DateTime<Utc>,
    ) -> AppResult<Option<DriverRecord>> {
        let record = sqlx::query_as::<_, DriverRecord>(
            r#"
            UPDATE drivers SET
                status = 'COMPLETED',
                exit_time = $3,
                exit_verified_by = $4,
                remarks = COALESCE($5, remarks),
                photo_after_urls = $6
            WHERE id = $1 AND status = ANY($2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Transition::Complete.allowed_from())
        .bind(now)
        .bind(verifier)
        .bind(notes)
        .bind(photos)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }
}
