//! The `Lead` entity and its classification lifecycle.
//!
//! Classification fields are stored as plain attributes. They are computed
//! once when the lead is created and recomputed in full whenever a scoring
//! attribute (website, category, city) changes; they are never patched
//! individually.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use flowgent_scoring::{
    classify, ClassificationResult, LeadInput, LeadStatus, ParseLabelError, PitchType,
    ServiceTier, Temperature,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ingest::NewLead;

/// Where a lead entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadSource {
    Manual,
    Scraper,
    Import,
    External,
}

impl LeadSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LeadSource::Manual => "manual",
            LeadSource::Scraper => "scraper",
            LeadSource::Import => "import",
            LeadSource::External => "external",
        }
    }
}

impl std::fmt::Display for LeadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadSource {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "manual" => Ok(LeadSource::Manual),
            "scraper" => Ok(LeadSource::Scraper),
            "import" => Ok(LeadSource::Import),
            "external" => Ok(LeadSource::External),
            other => Err(ParseLabelError {
                kind: "lead source",
                value: other.to_owned(),
            }),
        }
    }
}

/// A prospective business contact together with its stored classification.
///
/// Serializes in camelCase for the dashboard and webhook; the database layer
/// maps these fields onto snake_case columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub lead_key: String,
    pub business_name: String,
    pub website_url: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub source: LeadSource,
    pub score: u8,
    pub temperature: Temperature,
    pub pitch_type: PitchType,
    pub service_tier: ServiceTier,
    pub estimated_value: i64,
    pub is_hot_opportunity: bool,
    pub lead_status: LeadStatus,
    /// AI-derived readiness score, set by the enrichment agent.
    pub readiness_score: Option<u8>,
    pub processed: bool,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Build a new, unprocessed lead and classify it.
    #[must_use]
    pub fn from_new(new: NewLead, source: LeadSource) -> Self {
        let now = Utc::now();
        let lead_key = make_lead_key(&new.business_name, new.city.as_deref());
        let input = LeadInput {
            website_url: new.website_url.clone(),
            category: new.category.clone(),
            city: new.city.clone(),
        };
        let classification = classify(&input);

        Self {
            id: Uuid::new_v4(),
            lead_key,
            business_name: new.business_name.trim().to_owned(),
            website_url: new.website_url,
            category: new.category,
            city: new.city,
            phone: new.phone,
            email: new.email,
            source,
            score: classification.score,
            temperature: classification.temperature,
            pitch_type: classification.pitch_type,
            service_tier: classification.service_tier,
            estimated_value: classification.estimated_value,
            is_hot_opportunity: classification.is_hot_opportunity,
            lead_status: classification.lead_status,
            readiness_score: None,
            processed: false,
            processed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The scoring-relevant subset of this lead.
    #[must_use]
    pub fn scoring_input(&self) -> LeadInput {
        LeadInput {
            website_url: self.website_url.clone(),
            category: self.category.clone(),
            city: self.city.clone(),
        }
    }

    /// The classification currently stored on this lead.
    #[must_use]
    pub fn classification(&self) -> ClassificationResult {
        ClassificationResult {
            score: self.score,
            temperature: self.temperature,
            pitch_type: self.pitch_type,
            service_tier: self.service_tier,
            estimated_value: self.estimated_value,
            is_hot_opportunity: self.is_hot_opportunity,
            lead_status: self.lead_status,
        }
    }

    /// Overwrite every stored classification field with `result`.
    pub fn apply_classification(&mut self, result: &ClassificationResult) {
        self.score = result.score;
        self.temperature = result.temperature;
        self.pitch_type = result.pitch_type;
        self.service_tier = result.service_tier;
        self.estimated_value = result.estimated_value;
        self.is_hot_opportunity = result.is_hot_opportunity;
        self.lead_status = result.lead_status;
    }

    /// Recompute the full classification from the current attributes.
    pub fn rescore(&mut self) {
        let result = classify(&self.scoring_input());
        self.apply_classification(&result);
        self.updated_at = Utc::now();
    }

    /// Record an enrichment result and mark the lead processed.
    pub fn apply_enrichment(&mut self, enrichment: &LeadEnrichment, processed_at: DateTime<Utc>) {
        self.readiness_score = Some(enrichment.readiness_score);
        self.score = enrichment.score;
        self.temperature = enrichment.temperature;
        self.pitch_type = enrichment.pitch_type;
        self.service_tier = enrichment.service_tier;
        self.estimated_value = enrichment.estimated_value;
        self.is_hot_opportunity = enrichment.is_hot_opportunity;
        self.lead_status = enrichment.lead_status;
        self.processed = true;
        self.processed_at = Some(processed_at);
        self.updated_at = processed_at;
    }

    /// Replace the scoring attributes and recompute the classification.
    ///
    /// Changing the city also changes the dedup key.
    pub fn update_scoring_attributes(
        &mut self,
        website_url: Option<String>,
        category: Option<String>,
        city: Option<String>,
    ) {
        self.website_url = website_url;
        self.category = category;
        self.city = city;
        self.lead_key = make_lead_key(&self.business_name, self.city.as_deref());
        self.rescore();
    }
}

/// Fields written back to a lead by the enrichment agent.
///
/// Always fully populated: policies that leave a field alone copy the lead's
/// current value, so persistence can write the whole set in one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadEnrichment {
    pub readiness_score: u8,
    pub score: u8,
    pub temperature: Temperature,
    pub pitch_type: PitchType,
    pub service_tier: ServiceTier,
    pub estimated_value: i64,
    pub is_hot_opportunity: bool,
    pub lead_status: LeadStatus,
}

impl LeadEnrichment {
    /// An enrichment that keeps `lead`'s stored classification and only sets
    /// the readiness score.
    #[must_use]
    pub fn preserving(lead: &Lead, readiness_score: u8) -> Self {
        Self {
            readiness_score,
            score: lead.score,
            temperature: lead.temperature,
            pitch_type: lead.pitch_type,
            service_tier: lead.service_tier,
            estimated_value: lead.estimated_value,
            is_hot_opportunity: lead.is_hot_opportunity,
            lead_status: lead.lead_status,
        }
    }
}

/// Stable dedup fingerprint for a business: SHA-256 of the normalized name and city.
///
/// Re-ingesting the same business from another source yields the same key, so
/// persistence can upsert rather than duplicate.
#[must_use]
pub fn make_lead_key(business_name: &str, city: Option<&str>) -> String {
    use sha2::{Digest, Sha256};
    let input = format!(
        "{}\x00{}",
        business_name.trim().to_lowercase(),
        city.unwrap_or("").trim().to_lowercase(),
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
