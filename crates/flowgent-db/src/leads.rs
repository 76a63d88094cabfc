//! Database operations for the `leads` table.
//!
//! Columns are snake_case; the in-memory [`Lead`] serializes in camelCase.
//! [`LeadRow`] is the mapping layer between the two.

use chrono::{DateTime, Utc};
use flowgent_core::{Lead, LeadEnrichment, LeadSource};
use flowgent_scoring::Temperature;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const LEAD_COLUMNS: &str = "id, lead_key, business_name, website_url, category, city, phone, \
     email, source, score, temperature, pitch_type, service_tier, estimated_value, \
     is_hot_opportunity, lead_status, readiness_score, processed, processed_at, \
     created_at, updated_at";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `leads` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub lead_key: String,
    pub business_name: String,
    pub website_url: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub source: String,
    pub score: i16,
    pub temperature: String,
    pub pitch_type: String,
    pub service_tier: String,
    pub estimated_value: i64,
    pub is_hot_opportunity: bool,
    pub lead_status: String,
    pub readiness_score: Option<i16>,
    pub processed: bool,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeadRow {
    /// Build the row representation of an in-memory lead.
    #[must_use]
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            id: lead.id,
            lead_key: lead.lead_key.clone(),
            business_name: lead.business_name.clone(),
            website_url: lead.website_url.clone(),
            category: lead.category.clone(),
            city: lead.city.clone(),
            phone: lead.phone.clone(),
            email: lead.email.clone(),
            source: lead.source.as_str().to_owned(),
            score: i16::from(lead.score),
            temperature: lead.temperature.as_str().to_owned(),
            pitch_type: lead.pitch_type.as_str().to_owned(),
            service_tier: lead.service_tier.as_str().to_owned(),
            estimated_value: lead.estimated_value,
            is_hot_opportunity: lead.is_hot_opportunity,
            lead_status: lead.lead_status.as_str().to_owned(),
            readiness_score: lead.readiness_score.map(i16::from),
            processed: lead.processed,
            processed_at: lead.processed_at,
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        }
    }

    /// Convert into the in-memory [`Lead`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRow`] if a label column holds an unknown
    /// value or a score is outside `0..=255`.
    pub fn into_lead(self) -> Result<Lead, DbError> {
        let id = self.id;
        let invalid = |reason: String| DbError::InvalidRow { id, reason };

        Ok(Lead {
            id: self.id,
            lead_key: self.lead_key,
            business_name: self.business_name,
            website_url: self.website_url,
            category: self.category,
            city: self.city,
            phone: self.phone,
            email: self.email,
            source: self
                .source
                .parse::<LeadSource>()
                .map_err(|e| invalid(e.to_string()))?,
            score: u8::try_from(self.score)
                .map_err(|_| invalid(format!("score {} out of range", self.score)))?,
            temperature: self
                .temperature
                .parse()
                .map_err(|e: flowgent_scoring::ParseLabelError| invalid(e.to_string()))?,
            pitch_type: self
                .pitch_type
                .parse()
                .map_err(|e: flowgent_scoring::ParseLabelError| invalid(e.to_string()))?,
            service_tier: self
                .service_tier
                .parse()
                .map_err(|e: flowgent_scoring::ParseLabelError| invalid(e.to_string()))?,
            estimated_value: self.estimated_value,
            is_hot_opportunity: self.is_hot_opportunity,
            lead_status: self
                .lead_status
                .parse()
                .map_err(|e: flowgent_scoring::ParseLabelError| invalid(e.to_string()))?,
            readiness_score: self
                .readiness_score
                .map(|s| {
                    u8::try_from(s).map_err(|_| invalid(format!("readiness score {s} out of range")))
                })
                .transpose()?,
            processed: self.processed,
            processed_at: self.processed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn into_leads(rows: Vec<LeadRow>) -> Result<Vec<Lead>, DbError> {
    rows.into_iter().map(LeadRow::into_lead).collect()
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Classification columns an enrichment may overwrite.
const CLASSIFICATION_COLUMNS: [&str; 7] = [
    "score",
    "temperature",
    "pitch_type",
    "service_tier",
    "estimated_value",
    "is_hot_opportunity",
    "lead_status",
];

/// `SET` assignments that keep the stored enrichment while `keep` holds and
/// otherwise take the incoming classification.
///
/// `incoming(i, column)` renders the new value for the `i`-th classification
/// column. Readiness and `processed_at` are cleared when `keep` fails, since
/// they describe attributes the lead no longer has.
fn enrichment_aware_assignments(keep: &str, incoming: impl Fn(usize, &str) -> String) -> String {
    let mut assignments: Vec<String> = CLASSIFICATION_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| {
            format!(
                "{column} = CASE WHEN {keep} THEN leads.{column} ELSE {} END",
                incoming(i, column)
            )
        })
        .collect();
    assignments.push(format!(
        "readiness_score = CASE WHEN {keep} THEN leads.readiness_score END"
    ));
    assignments.push(format!(
        "processed_at = CASE WHEN {keep} THEN leads.processed_at END"
    ));
    assignments.push(format!("processed = {keep}"));
    assignments.join(", ")
}

/// Insert a lead, or update the existing row with the same `lead_key`.
///
/// On conflict the existing `id` and `created_at` are kept, and a missing
/// phone or email does not erase a stored one. An enriched lead whose
/// website, category and city are unchanged keeps its enrichment; otherwise
/// the rule-engine classification is written and the lead is queued for
/// enrichment again.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if the returned row cannot be mapped.
pub async fn upsert_lead(pool: &PgPool, lead: &Lead) -> Result<Lead, DbError> {
    let row = LeadRow::from_lead(lead);
    let keep = "leads.processed \
         AND leads.website_url IS NOT DISTINCT FROM EXCLUDED.website_url \
         AND leads.category IS NOT DISTINCT FROM EXCLUDED.category \
         AND leads.city IS NOT DISTINCT FROM EXCLUDED.city";
    let classification = enrichment_aware_assignments(keep, |_, column| format!("EXCLUDED.{column}"));
    let sql = format!(
        "INSERT INTO leads \
           (id, lead_key, business_name, website_url, category, city, phone, email, source, \
            score, temperature, pitch_type, service_tier, estimated_value, is_hot_opportunity, \
            lead_status, readiness_score, processed, processed_at, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
                 $18, $19, $20, $21) \
         ON CONFLICT (lead_key) DO UPDATE SET \
           business_name = EXCLUDED.business_name, \
           website_url = EXCLUDED.website_url, \
           category = EXCLUDED.category, \
           city = EXCLUDED.city, \
           phone = COALESCE(EXCLUDED.phone, leads.phone), \
           email = COALESCE(EXCLUDED.email, leads.email), \
           {classification}, \
           updated_at = NOW() \
         RETURNING {LEAD_COLUMNS}"
    );

    let saved = sqlx::query_as::<_, LeadRow>(&sql)
        .bind(row.id)
        .bind(&row.lead_key)
        .bind(&row.business_name)
        .bind(&row.website_url)
        .bind(&row.category)
        .bind(&row.city)
        .bind(&row.phone)
        .bind(&row.email)
        .bind(&row.source)
        .bind(row.score)
        .bind(&row.temperature)
        .bind(&row.pitch_type)
        .bind(&row.service_tier)
        .bind(row.estimated_value)
        .bind(row.is_hot_opportunity)
        .bind(&row.lead_status)
        .bind(row.readiness_score)
        .bind(row.processed)
        .bind(row.processed_at)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(pool)
        .await?;

    saved.into_lead()
}

/// Save new scoring attributes for an existing lead, matched by `id`.
///
/// Writes the lead's current `lead_key`, which changes with the city. The
/// same enrichment rule as [`upsert_lead`] applies: unchanged attributes keep
/// an existing enrichment, changed ones re-queue the lead.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no lead has this id, [`DbError::Sqlx`] if
/// the query fails (including a `lead_key` already taken by another lead),
/// or [`DbError::InvalidRow`] if the returned row cannot be mapped.
pub async fn update_lead(pool: &PgPool, lead: &Lead) -> Result<Lead, DbError> {
    let row = LeadRow::from_lead(lead);
    let keep = "leads.processed \
         AND leads.website_url IS NOT DISTINCT FROM $3 \
         AND leads.category IS NOT DISTINCT FROM $4 \
         AND leads.city IS NOT DISTINCT FROM $5";
    // Classification parameters start at $6.
    let classification = enrichment_aware_assignments(keep, |i, _| format!("${}", i + 6));
    let sql = format!(
        "UPDATE leads SET \
           lead_key = $2, \
           website_url = $3, \
           category = $4, \
           city = $5, \
           {classification}, \
           updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {LEAD_COLUMNS}"
    );

    let saved = sqlx::query_as::<_, LeadRow>(&sql)
        .bind(row.id)
        .bind(&row.lead_key)
        .bind(&row.website_url)
        .bind(&row.category)
        .bind(&row.city)
        .bind(row.score)
        .bind(&row.temperature)
        .bind(&row.pitch_type)
        .bind(&row.service_tier)
        .bind(row.estimated_value)
        .bind(row.is_hot_opportunity)
        .bind(&row.lead_status)
        .fetch_optional(pool)
        .await?;

    saved.ok_or(DbError::NotFound)?.into_lead()
}

/// Returns a single lead by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if the row cannot be mapped.
pub async fn get_lead(pool: &PgPool, id: Uuid) -> Result<Option<Lead>, DbError> {
    let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1");
    let row = sqlx::query_as::<_, LeadRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(LeadRow::into_lead).transpose()
}

/// Returns leads ordered by score (highest first), optionally filtered by temperature.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if a row cannot be mapped.
pub async fn list_leads(
    pool: &PgPool,
    temperature: Option<Temperature>,
    limit: i64,
) -> Result<Vec<Lead>, DbError> {
    let sql = format!(
        "SELECT {LEAD_COLUMNS} FROM leads \
         WHERE ($1::TEXT IS NULL OR temperature = $1) \
         ORDER BY score DESC, created_at DESC \
         LIMIT $2"
    );
    let rows = sqlx::query_as::<_, LeadRow>(&sql)
        .bind(temperature.map(Temperature::as_str))
        .bind(limit)
        .fetch_all(pool)
        .await?;

    into_leads(rows)
}

/// Returns up to `limit` leads that have not been enriched yet, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if a row cannot be mapped.
pub async fn list_unprocessed_leads(pool: &PgPool, limit: i64) -> Result<Vec<Lead>, DbError> {
    let sql = format!(
        "SELECT {LEAD_COLUMNS} FROM leads \
         WHERE processed = false \
         ORDER BY created_at, id \
         LIMIT $1"
    );
    let rows = sqlx::query_as::<_, LeadRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    into_leads(rows)
}

/// Write an enrichment result and mark the lead processed.
///
/// Fields and the `processed` flag are written in a single statement: if it
/// fails, the lead stays unprocessed and is picked up again on the next poll.
/// Returns the `processed_at` timestamp set by the database.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no lead has this id, or [`DbError::Sqlx`]
/// if the query fails.
pub async fn apply_enrichment(
    pool: &PgPool,
    id: Uuid,
    enrichment: &LeadEnrichment,
) -> Result<DateTime<Utc>, DbError> {
    let processed_at = sqlx::query_scalar::<_, DateTime<Utc>>(
        "UPDATE leads SET \
           readiness_score = $2, \
           score = $3, \
           temperature = $4, \
           pitch_type = $5, \
           service_tier = $6, \
           estimated_value = $7, \
           is_hot_opportunity = $8, \
           lead_status = $9, \
           processed = true, \
           processed_at = NOW(), \
           updated_at = NOW() \
         WHERE id = $1 \
         RETURNING processed_at",
    )
    .bind(id)
    .bind(i16::from(enrichment.readiness_score))
    .bind(i16::from(enrichment.score))
    .bind(enrichment.temperature.as_str())
    .bind(enrichment.pitch_type.as_str())
    .bind(enrichment.service_tier.as_str())
    .bind(enrichment.estimated_value)
    .bind(enrichment.is_hot_opportunity)
    .bind(enrichment.lead_status.as_str())
    .fetch_optional(pool)
    .await?;

    processed_at.ok_or(DbError::NotFound)
}

/// Count all leads and those still waiting for enrichment.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_leads(pool: &PgPool) -> Result<crate::LeadCounts, DbError> {
    let (total, unprocessed) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE NOT processed) FROM leads",
    )
    .fetch_one(pool)
    .await?;

    Ok(crate::LeadCounts { total, unprocessed })
}
