//! Storage seam for the enrichment agent.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use flowgent_core::{Lead, LeadEnrichment};
use flowgent_db::DbError;
use sqlx::PgPool;
use uuid::Uuid;

/// The two persistence operations an enrichment cycle needs.
pub trait LeadStore: Send + Sync {
    /// Up to `limit` unprocessed leads, oldest first.
    fn fetch_unprocessed(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<Lead>, DbError>> + Send;

    /// Persist `enrichment` and mark the lead processed in one write.
    ///
    /// Returns the recorded processing timestamp. A failed write must leave
    /// the lead unprocessed.
    fn write_enrichment(
        &self,
        id: Uuid,
        enrichment: &LeadEnrichment,
    ) -> impl Future<Output = Result<DateTime<Utc>, DbError>> + Send;
}

impl<T: LeadStore> LeadStore for Arc<T> {
    fn fetch_unprocessed(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<Lead>, DbError>> + Send {
        (**self).fetch_unprocessed(limit)
    }

    fn write_enrichment(
        &self,
        id: Uuid,
        enrichment: &LeadEnrichment,
    ) -> impl Future<Output = Result<DateTime<Utc>, DbError>> + Send {
        (**self).write_enrichment(id, enrichment)
    }
}

/// Postgres-backed [`LeadStore`].
#[derive(Debug, Clone)]
pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl LeadStore for PgLeadStore {
    async fn fetch_unprocessed(&self, limit: i64) -> Result<Vec<Lead>, DbError> {
        flowgent_db::list_unprocessed_leads(&self.pool, limit).await
    }

    async fn write_enrichment(
        &self,
        id: Uuid,
        enrichment: &LeadEnrichment,
    ) -> Result<DateTime<Utc>, DbError> {
        flowgent_db::apply_enrichment(&self.pool, id, enrichment).await
    }
}
