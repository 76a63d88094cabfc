//! Postgres persistence for leads.
//!
//! Pool setup and migrations live here; table operations are in [`leads`].

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

pub mod leads;

pub use leads::{
    apply_enrichment, count_leads, get_lead, list_leads, list_unprocessed_leads, update_lead,
    upsert_lead, LeadRow,
};

// Relative to this crate's Cargo.toml.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Connection pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl PoolConfig {
    pub const DEFAULT: Self = Self {
        max_connections: 10,
        min_connections: 1,
        acquire_timeout_secs: 10,
    };

    #[must_use]
    pub fn from_app_config(config: &flowgent_core::AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("lead not found")]
    NotFound,
    #[error("invalid lead row {id}: {reason}")]
    InvalidRow { id: uuid::Uuid, reason: String },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Lead totals reported by [`health_check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeadCounts {
    pub total: i64,
    pub unprocessed: i64,
}

/// Open a pool against `database_url`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if no connection can be established within the
/// acquire timeout.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Apply pending migrations and return how many ran.
///
/// # Errors
///
/// Returns [`DbError::Migration`] if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DbError> {
    let before = applied_migration_count(pool).await;
    MIGRATOR.run(pool).await?;
    let after = applied_migration_count(pool).await;

    let ran = after.saturating_sub(before);
    if ran > 0 {
        tracing::info!(ran, "db: migrations applied");
    }
    Ok(ran)
}

// Zero when the bookkeeping table does not exist yet.
async fn applied_migration_count(pool: &PgPool) -> usize {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await
        .ok()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

/// Round-trip a trivial query.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Ping the database and confirm the `leads` table is readable.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails, which includes a missing
/// `leads` table on an unmigrated database.
pub async fn health_check(pool: &PgPool) -> Result<LeadCounts, DbError> {
    ping(pool).await?;
    count_leads(pool).await
}
