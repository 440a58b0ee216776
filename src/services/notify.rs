//! Outbound driver and operations-group notifications
//!
//! Messages go through an external messaging relay. Delivery is strictly
//! best-effort: a relay failure is logged and swallowed, it never fails
//! the lifecycle transition that triggered it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::{
    config::NotificationConfig,
    error::{AppError, AppResult},
};

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").unwrap());
static LEADING_ZEROS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0+").unwrap());

/// Message-sending collaborator: a phone-number-like identifier or a
/// group identifier, plus plain text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, target: &str, message: &str) -> AppResult<()>;
}

/// Sender backed by an HTTP messaging relay
pub struct RelaySender {
    client: reqwest::Client,
    config: NotificationConfig,
}

impl RelaySender {
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl NotificationSender for RelaySender {
    async fn send(&self, target: &str, message: &str) -> AppResult<()> {
        let mut request = self
            .client
            .post(&self.config.relay_url)
            .json(&json!({ "target": target, "message": message }));

        if let Some(token) = &self.config.relay_token {
            request = request.header("Authorization", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Relay request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Relay returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Sender used when notifications are disabled; logs instead of sending
pub struct NoopSender;

#[async_trait]
impl NotificationSender for NoopSender {
    async fn send(&self, target: &str, message: &str) -> AppResult<()> {
        tracing::debug!(target = %target, "Notifications disabled, dropping message: {}", message);
        Ok(())
    }
}

/// Normalise a notification target for the relay.
///
/// Group identifiers pass through untouched; phone numbers are reduced
/// to digits, stripped of leading zeros and given the 62 country code.
pub fn normalize_target(target: &str) -> String {
    let trimmed = target.trim();
    if trimmed.contains("@g.us") || trimmed.contains("@c.us") {
        return trimmed.to_string();
    }

    let digits = NON_DIGIT.replace_all(trimmed, "");
    let without_zeros = LEADING_ZEROS.replace(&digits, "");
    if without_zeros.starts_with("62") {
        without_zeros.to_string()
    } else {
        format!("62{}", without_zeros)
    }
}

/// Dispatch facade owned by the lifecycle service
#[derive(Clone)]
pub struct NotifyService {
    sender: Arc<dyn NotificationSender>,
    ops_group: String,
}

impl NotifyService {
    pub fn new(sender: Arc<dyn NotificationSender>, ops_group: String) -> Self {
        Self { sender, ops_group }
    }

    /// Build from configuration: relay-backed when enabled, no-op otherwise
    pub fn from_config(config: &NotificationConfig) -> Self {
        let sender: Arc<dyn NotificationSender> = if config.enabled {
            Arc::new(RelaySender::new(config.clone()))
        } else {
            Arc::new(NoopSender)
        };
        Self::new(sender, config.ops_group.clone())
    }

    /// Message an individual driver, best-effort
    pub async fn notify_driver(&self, phone: &str, message: &str) {
        if phone.trim().is_empty() {
            return;
        }
        let target = normalize_target(phone);
        if let Err(e) = self.sender.send(&target, message).await {
            tracing::warn!(target = %target, "Driver notification failed: {}", e);
        }
    }

    /// Broadcast to the warehouse operations group, best-effort
    pub async fn notify_ops(&self, message: &str) {
        if self.ops_group.is_empty() {
            return;
        }
        let target = normalize_target(&self.ops_group);
        if let Err(e) = self.sender.send(&target, message).await {
            tracing::warn!("Operations group notification failed: {}", e);
        }
    }
}

// ---------------------------------------------------------------------------
// Message templates
// ---------------------------------------------------------------------------

fn format_slot(slot_date: Option<NaiveDate>, slot_time: Option<&str>) -> String {
    format!(
        "{} ({})",
        slot_date.map_or_else(|| "-".to_string(), |d| d.to_string()),
        slot_time.unwrap_or("-")
    )
}

fn format_local(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%d %b %Y %H:%M").to_string()
}

/// "GATE_2" is displayed and announced as "GATE 2"
pub fn gate_display_label(gate: &str) -> String {
    gate.replace('_', " ")
}

pub fn booking_confirmation(
    name: &str,
    code: &str,
    plate: &str,
    slot_date: Option<NaiveDate>,
    slot_time: Option<&str>,
) -> String {
    format!(
        "BOOKING CONFIRMED ✅\n\nHello {},\nYour booking is registered:\n📋 Code: *{}*\n🚛 Plate: {}\n📅 Schedule: {}",
        name,
        code,
        plate,
        format_slot(slot_date, slot_time)
    )
}

pub fn queue_ticket(queue_number: &str) -> String {
    format!(
        "YOUR QUEUE TICKET 🎫\n\n🔢 Queue: *#{}*\n📍 Position: Parking area",
        queue_number
    )
}

pub fn ops_entry_approved(company: &str, queue_number: &str) -> String {
    format!(
        "OPERATIONS NOTICE 📦\nSTATUS: *ENTRY APPROVED* ✅\n🚛 Vendor: {}\n🔢 Queue: *#{}*",
        company, queue_number
    )
}

pub fn gate_call(name: &str, gate: &str) -> String {
    format!(
        "DOCK CALL 📢\n\nHello {},\nPlease proceed to {} NOW.\nThe loading team is waiting.",
        name,
        gate_display_label(gate)
    )
}

pub fn checkout_confirmation(name: &str, exit_time: DateTime<Utc>) -> String {
    format!(
        "CHECKOUT COMPLETE ✅\nThank you {}!\n\nExit time: {}",
        name,
        format_local(exit_time)
    )
}

pub fn booking_rejected(reason: &str) -> String {
    format!("BOOKING REJECTED ❌\n\n🛑 Reason: \"{}\"", reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_targets_pass_through() {
        assert_eq!(
            normalize_target("120363423657558569@g.us"),
            "120363423657558569@g.us"
        );
        assert_eq!(normalize_target("  999@c.us "), "999@c.us");
    }

    #[test]
    fn test_phone_numbers_get_country_code() {
        assert_eq!(normalize_target("+62 812-3456-789"), "628123456789");
        assert_eq!(normalize_target("08123456789"), "628123456789");
        assert_eq!(normalize_target("8123456789"), "628123456789");
    }

    #[test]
    fn test_gate_display_label() {
        assert_eq!(gate_display_label("GATE_2"), "GATE 2");
        assert_eq!(gate_display_label("DOCK_A_1"), "DOCK A 1");
    }

    #[tokio::test]
    async fn test_driver_notification_failure_is_swallowed() {
        let mut sender = MockNotificationSender::new();
        sender
            .expect_send()
            .returning(|_, _| Err(AppError::Internal("relay down".to_string())));

        let service = NotifyService::new(Arc::new(sender), String::new());
        // Must not panic or propagate
        service.notify_driver("0812345678", "hello").await;
    }

    #[tokio::test]
    async fn test_empty_phone_sends_nothing() {
        let mut sender = MockNotificationSender::new();
        sender.expect_send().times(0);

        let service = NotifyService::new(Arc::new(sender), String::new());
        service.notify_driver("  ", "hello").await;
    }
}
