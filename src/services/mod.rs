//! Business logic services

pub mod announcer;
pub mod auth;
pub mod codes;
pub mod geo;
pub mod lifecycle;
pub mod monitor;
pub mod notify;
pub mod slots;
pub mod views;

use validator::Validate;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::gate::{GateConfig, SaveGateConfig},
    repository::Repository,
};

/// Services container holding all business logic services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub lifecycle: lifecycle::LifecycleService,
    pub slots: slots::SlotsService,
    repository: Repository,
}

impl Services {
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let notify = notify::NotifyService::from_config(&config.notifications);
        Self {
            auth: auth::AuthService::new(config.auth.clone()),
            lifecycle: lifecycle::LifecycleService::new(
                repository.clone(),
                notify,
                config.warehouse.clone(),
            ),
            slots: slots::SlotsService::new(repository.clone(), config.warehouse.slot_capacity),
            repository,
        }
    }

    pub async fn list_gates(&self) -> AppResult<Vec<GateConfig>> {
        self.repository.gates.list().await
    }

    pub async fn get_gate(&self, gate_id: &str) -> AppResult<GateConfig> {
        self.repository.gates.get_by_gate_id(gate_id).await
    }

    pub async fn save_gate(&self, gate_id: &str, data: SaveGateConfig) -> AppResult<GateConfig> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.gates.upsert(gate_id, &data).await
    }

    pub async fn delete_gate(&self, gate_id: &str) -> AppResult<()> {
        self.repository.gates.delete(gate_id).await
    }
}
