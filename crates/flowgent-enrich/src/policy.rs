//! Enrichment policies: how a readiness score turns into stored fields.

use flowgent_core::{AgentPolicyKind, Lead, LeadEnrichment};
use flowgent_scoring::{classify, ReadinessClassification};

/// Decides what the agent writes back for a lead given its readiness score.
///
/// Implementations are pure; all I/O happens in the caller.
pub trait EnrichmentPolicy: Send + Sync {
    /// Label recorded in logs and webhook payloads.
    fn name(&self) -> &'static str;

    fn enrich(&self, lead: &Lead, readiness_score: u8) -> LeadEnrichment;
}

/// Buckets the lead by readiness alone.
///
/// Sets `temperature` and `estimated_value` from the readiness bucket; the
/// rule-engine score, pitch, tier, hot-opportunity flag and status stay as
/// stored.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadinessPolicy;

impl EnrichmentPolicy for ReadinessPolicy {
    fn name(&self) -> &'static str {
        "readiness"
    }

    fn enrich(&self, lead: &Lead, readiness_score: u8) -> LeadEnrichment {
        let bucket = ReadinessClassification::from_score(readiness_score);
        LeadEnrichment {
            readiness_score: bucket.readiness_score,
            temperature: bucket.temperature,
            estimated_value: bucket.estimated_value,
            ..LeadEnrichment::preserving(lead, bucket.readiness_score)
        }
    }
}

/// Re-runs the rule engine and stores readiness only as a side attribute.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleMirrorPolicy;

impl EnrichmentPolicy for RuleMirrorPolicy {
    fn name(&self) -> &'static str {
        "rule_mirror"
    }

    fn enrich(&self, lead: &Lead, readiness_score: u8) -> LeadEnrichment {
        let result = classify(&lead.scoring_input());
        LeadEnrichment {
            readiness_score: readiness_score.min(100),
            score: result.score,
            temperature: result.temperature,
            pitch_type: result.pitch_type,
            service_tier: result.service_tier,
            estimated_value: result.estimated_value,
            is_hot_opportunity: result.is_hot_opportunity,
            lead_status: result.lead_status,
        }
    }
}

#[must_use]
pub fn policy_for(kind: AgentPolicyKind) -> Box<dyn EnrichmentPolicy> {
    match kind {
        AgentPolicyKind::Readiness => Box::new(ReadinessPolicy),
        AgentPolicyKind::RuleMirror => Box::new(RuleMirrorPolicy),
    }
}
