//! Gate configuration repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::gate::{GateConfig, SaveGateConfig},
};

#[derive(Clone)]
pub struct GatesRepository {
    pool: Pool<Postgres>,
}

impl GatesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<GateConfig>> {
        let gates = sqlx::query_as::<_, GateConfig>(
            "SELECT * FROM gate_configs ORDER BY gate_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(gates)
    }

    pub async fn get_by_gate_id(&self, gate_id: &str) -> AppResult<GateConfig> {
        sqlx::query_as::<_, GateConfig>("SELECT * FROM gate_configs WHERE gate_id = $1")
            .bind(gate_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Gate {} not found", gate_id)))
    }

    /// Insert or update a dock, keyed by its stable gate_id
    pub async fn upsert(&self, gate_id: &str, data: &SaveGateConfig) -> AppResult<GateConfig> {
        let gate = sqlx::query_as::<_, GateConfig>(
            r#"
            INSERT INTO gate_configs (gate_id, name, capacity, status, gate_type)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (gate_id) DO UPDATE SET
                name = EXCLUDED.name,
                capacity = EXCLUDED.capacity,
                status = EXCLUDED.status,
                gate_type = EXCLUDED.gate_type
            RETURNING *
            "#,
        )
        .bind(gate_id)
        .bind(&data.name)
        .bind(data.capacity)
        .bind(data.status)
        .bind(data.gate_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(gate)
    }

    pub async fn delete(&self, gate_id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM gate_configs WHERE gate_id = $1")
            .bind(gate_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Gate {} not found", gate_id)));
        }
        Ok(())
    }
}
