//! AI enrichment for Flowgent leads.
//!
//! Wraps the generative-language API used to derive a readiness score, the
//! two enrichment policies the background agent can apply, and the webhook
//! that receives enrichment results. Failures from the AI call are surfaced
//! as [`EnrichmentError`] and collapsed to the default readiness score only at
//! the [`ReadinessScorer::score_or_default`] boundary.

pub mod error;
pub mod genai;
pub mod policy;
pub mod readiness;
pub mod webhook;

mod retry;

pub use error::EnrichmentError;
pub use genai::GenAiClient;
pub use policy::{policy_for, EnrichmentPolicy, ReadinessPolicy, RuleMirrorPolicy};
pub use readiness::{parse_readiness_score, readiness_prompt, ReadinessScorer};
pub use webhook::{WebhookClient, WebhookPayload};
