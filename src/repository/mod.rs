//! Repository layer for database operations

pub mod drivers;
pub mod gates;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub drivers: drivers::DriversRepository,
    pub gates: gates::GatesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            drivers: drivers::DriversRepository::new(pool.clone()),
            gates: gates::GatesRepository::new(pool.clone()),
            pool,
        }
    }
}
