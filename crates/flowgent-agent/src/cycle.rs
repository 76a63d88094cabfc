//! One enrichment pass over the unprocessed backlog.

use flowgent_core::{AppConfig, Lead};
use flowgent_db::DbError;
use flowgent_enrich::{
    policy_for, EnrichmentError, EnrichmentPolicy, GenAiClient, ReadinessScorer, WebhookClient,
    WebhookPayload,
};
use flowgent_scoring::DEFAULT_READINESS_SCORE;
use tokio::sync::Mutex;

use crate::store::LeadStore;

/// Outcome counts for a single cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub fetched: usize,
    pub enriched: usize,
    pub failed: usize,
    /// `true` when the cycle did not run because a previous one was still active.
    pub skipped: bool,
}

/// Enriches unprocessed leads: readiness score, policy, write-back, webhook.
pub struct EnrichmentAgent<S> {
    store: S,
    scorer: Option<ReadinessScorer>,
    policy: Box<dyn EnrichmentPolicy>,
    webhook: WebhookClient,
    batch_size: u32,
    running: Mutex<()>,
}

impl<S: LeadStore> EnrichmentAgent<S> {
    /// `scorer = None` runs every lead with [`DEFAULT_READINESS_SCORE`].
    pub fn new(
        store: S,
        scorer: Option<ReadinessScorer>,
        policy: Box<dyn EnrichmentPolicy>,
        webhook: WebhookClient,
        batch_size: u32,
    ) -> Self {
        Self {
            store,
            scorer,
            policy,
            webhook,
            batch_size,
            running: Mutex::new(()),
        }
    }

    /// Wire an agent from application config.
    ///
    /// A missing `GENAI_API_KEY` is not fatal: the agent logs a warning and
    /// scores every lead with the default readiness.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichmentError`] if an HTTP client cannot be built or the
    /// configured base URL is invalid.
    pub fn from_app_config(store: S, config: &AppConfig) -> Result<Self, EnrichmentError> {
        let scorer = match GenAiClient::from_app_config(config) {
            Ok(client) => Some(ReadinessScorer::new(client)),
            Err(EnrichmentError::MissingApiKey) => {
                tracing::warn!(
                    fallback = DEFAULT_READINESS_SCORE,
                    "agent: GENAI_API_KEY not set, readiness scoring disabled"
                );
                None
            }
            Err(e) => return Err(e),
        };
        let webhook = WebhookClient::new(config.webhook_url.as_deref())?;

        Ok(Self::new(
            store,
            scorer,
            policy_for(config.agent_policy),
            webhook,
            config.agent_batch_size,
        ))
    }

    #[must_use]
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Process one batch of unprocessed leads.
    ///
    /// Leads are handled one at a time. A failure on one lead is logged and
    /// the rest of the batch continues; the failed lead stays unprocessed and
    /// is picked up again next cycle. If another cycle is still running this
    /// returns immediately with `skipped = true`.
    pub async fn run_cycle(&self) -> CycleSummary {
        let Ok(_guard) = self.running.try_lock() else {
            tracing::info!("agent: previous cycle still running, skipping tick");
            return CycleSummary {
                skipped: true,
                ..CycleSummary::default()
            };
        };

        let leads = match self
            .store
            .fetch_unprocessed(i64::from(self.batch_size))
            .await
        {
            Ok(leads) => leads,
            Err(e) => {
                tracing::error!(error = %e, "agent: failed to load unprocessed leads");
                return CycleSummary::default();
            }
        };

        let mut summary = CycleSummary {
            fetched: leads.len(),
            ..CycleSummary::default()
        };
        if leads.is_empty() {
            tracing::debug!("agent: no unprocessed leads");
            return summary;
        }

        tracing::info!(
            count = leads.len(),
            policy = self.policy.name(),
            "agent: enriching batch"
        );

        for lead in &leads {
            match self.process_lead(lead).await {
                Ok(()) => summary.enriched += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        lead_id = %lead.id,
                        error = %e,
                        "agent: enrichment write failed, lead left unprocessed"
                    );
                }
            }
        }

        tracing::info!(
            enriched = summary.enriched,
            failed = summary.failed,
            "agent: batch complete"
        );
        summary
    }

    async fn process_lead(&self, lead: &Lead) -> Result<(), DbError> {
        let readiness = match &self.scorer {
            Some(scorer) => scorer.score_or_default(lead).await,
            None => DEFAULT_READINESS_SCORE,
        };
        let enrichment = self.policy.enrich(lead, readiness);

        let processed_at = self.store.write_enrichment(lead.id, &enrichment).await?;
        tracing::info!(
            lead_id = %lead.id,
            readiness = enrichment.readiness_score,
            score = enrichment.score,
            temperature = %enrichment.temperature,
            "agent: lead enriched"
        );

        let payload = WebhookPayload::new(lead, self.policy.name(), &enrichment, processed_at);
        self.webhook.dispatch(&payload).await;
        Ok(())
    }
}
