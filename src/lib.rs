//! Yardgate Warehouse Check-in System
//!
//! A REST JSON API for managing truck arrivals at a warehouse: slot
//! bookings, gate check-in, dock calls and the public announcement
//! monitor.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use services::announcer::Announcer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    /// Present only when the public monitor is enabled
    pub announcer: Option<Announcer>,
}
