//! Outbound notification of enrichment results.

use std::time::Duration;

use chrono::{DateTime, Utc};
use flowgent_core::{Lead, LeadEnrichment};
use flowgent_scoring::{LeadStatus, PitchType, ServiceTier, Temperature};
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use crate::error::EnrichmentError;

const WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// JSON body posted to `WEBHOOK_URL` after a lead is enriched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub lead_id: Uuid,
    pub business_name: String,
    pub policy: String,
    pub readiness_score: u8,
    pub score: u8,
    pub temperature: Temperature,
    pub pitch_type: PitchType,
    pub service_tier: ServiceTier,
    pub estimated_value: i64,
    pub is_hot_opportunity: bool,
    pub lead_status: LeadStatus,
    pub processed_at: DateTime<Utc>,
}

impl WebhookPayload {
    #[must_use]
    pub fn new(
        lead: &Lead,
        policy: &str,
        enrichment: &LeadEnrichment,
        processed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            lead_id: lead.id,
            business_name: lead.business_name.clone(),
            policy: policy.to_owned(),
            readiness_score: enrichment.readiness_score,
            score: enrichment.score,
            temperature: enrichment.temperature,
            pitch_type: enrichment.pitch_type,
            service_tier: enrichment.service_tier,
            estimated_value: enrichment.estimated_value,
            is_hot_opportunity: enrichment.is_hot_opportunity,
            lead_status: enrichment.lead_status,
            processed_at,
        }
    }
}

/// Posts [`WebhookPayload`]s to a configured URL.
///
/// With no URL configured every dispatch is a no-op.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    url: Option<String>,
}

impl WebhookClient {
    /// # Errors
    ///
    /// Returns [`EnrichmentError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(url: Option<&str>) -> Result<Self, EnrichmentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("flowgent/0.1 (webhook)")
            .build()?;
        Ok(Self {
            client,
            url: url.map(str::trim).filter(|u| !u.is_empty()).map(str::to_owned),
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Sends `payload` once. Failures are logged and swallowed.
    pub async fn dispatch(&self, payload: &WebhookPayload) {
        let Some(url) = self.url.as_deref() else {
            tracing::debug!(lead_id = %payload.lead_id, "webhook: no URL configured, skipping");
            return;
        };

        match self.client.post(url).json(payload).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(
                    lead_id = %payload.lead_id,
                    status = response.status().as_u16(),
                    "webhook: delivered"
                );
            }
            Ok(response) => {
                tracing::warn!(
                    lead_id = %payload.lead_id,
                    status = response.status().as_u16(),
                    "webhook: endpoint rejected payload"
                );
            }
            Err(e) => {
                tracing::warn!(
                    lead_id = %payload.lead_id,
                    error = %e,
                    "webhook: delivery failed"
                );
            }
        }
    }
}
