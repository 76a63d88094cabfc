//! Lead scoring for Flowgent.
//!
//! Two classifiers live here and are deliberately kept apart:
//!
//! - [`classify`] is the primary rule engine. It is total, pure, and
//!   deterministic: the same [`LeadInput`] always yields the same
//!   [`ClassificationResult`].
//! - [`ReadinessClassification`] buckets the AI-derived readiness score
//!   produced by the background agent. It uses its own thresholds and value
//!   constants and must not be mixed with the primary score.

pub mod engine;
pub mod readiness;
pub mod types;

pub use engine::{classify, score_breakdown, ScoreBreakdown};
pub use readiness::{ReadinessClassification, DEFAULT_READINESS_SCORE};
pub use types::{
    ClassificationResult, LeadInput, LeadStatus, ParseLabelError, PitchType, ServiceTier,
    Temperature,
};
