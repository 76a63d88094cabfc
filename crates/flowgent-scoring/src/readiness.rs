//! Bucketing for the AI-derived readiness score.
//!
//! This is a separate classifier from [`crate::classify`]: its thresholds
//! (80/50) and value constants (10000/5000/2000) differ from the primary
//! engine's and the two results are never combined.

use serde::{Deserialize, Serialize};

use crate::types::Temperature;

/// Readiness score substituted when the AI call fails or its answer cannot be parsed.
pub const DEFAULT_READINESS_SCORE: u8 = 50;

const MAX_READINESS_SCORE: u8 = 100;

const HOT_THRESHOLD: u8 = 80;
const WARM_THRESHOLD: u8 = 50;

const HOT_VALUE: i64 = 10_000;
const WARM_VALUE: i64 = 5_000;
const COLD_VALUE: i64 = 2_000;

/// Temperature and estimated value derived from a readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessClassification {
    /// Readiness score in `[0, 100]`.
    pub readiness_score: u8,
    pub temperature: Temperature,
    pub estimated_value: i64,
}

impl ReadinessClassification {
    /// Bucket a readiness score. Values above 100 are clamped to 100.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        let readiness_score = score.min(MAX_READINESS_SCORE);
        let (temperature, estimated_value) = if readiness_score >= HOT_THRESHOLD {
            (Temperature::Hot, HOT_VALUE)
        } else if readiness_score >= WARM_THRESHOLD {
            (Temperature::Warm, WARM_VALUE)
        } else {
            (Temperature::Cold, COLD_VALUE)
        };

        Self {
            readiness_score,
            temperature,
            estimated_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hot_at_and_above_80() {
        let c = ReadinessClassification::from_score(80);
        assert_eq!(c.temperature, Temperature::Hot);
        assert_eq!(c.estimated_value, 10_000);
        assert_eq!(
            ReadinessClassification::from_score(100).temperature,
            Temperature::Hot
        );
    }

    #[test]
    fn warm_between_50_and_79() {
        for score in [50, 65, 79] {
            let c = ReadinessClassification::from_score(score);
            assert_eq!(c.temperature, Temperature::Warm, "score {score}");
            assert_eq!(c.estimated_value, 5_000);
        }
    }

    #[test]
    fn cold_below_50() {
        for score in [0, 1, 49] {
            let c = ReadinessClassification::from_score(score);
            assert_eq!(c.temperature, Temperature::Cold, "score {score}");
            assert_eq!(c.estimated_value, 2_000);
        }
    }

    #[test]
    fn default_score_is_warm() {
        let c = ReadinessClassification::from_score(DEFAULT_READINESS_SCORE);
        assert_eq!(c.temperature, Temperature::Warm);
    }

    #[test]
    fn scores_above_100_are_clamped() {
        let c = ReadinessClassification::from_score(250);
        assert_eq!(c.readiness_score, 100);
        assert_eq!(c.temperature, Temperature::Hot);
    }

    #[test]
    fn disagrees_with_primary_thresholds_at_75() {
        // 75 is hot for the rule engine but only warm for readiness.
        assert_eq!(
            ReadinessClassification::from_score(75).temperature,
            Temperature::Warm
        );
    }
}
