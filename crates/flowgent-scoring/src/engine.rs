//! Rule-based lead scoring engine.
//!
//! A lead's score is the sum of three independent, capped sub-scores
//! (website presence, category, city). Temperature, pitch, tier, value,
//! hot-opportunity flag and status are all derived from that score and the
//! predicates computed alongside it, once per call.

use crate::types::{
    ClassificationResult, LeadInput, LeadStatus, PitchType, ServiceTier, Temperature,
};

/// Sectors that earn the full category sub-score. Matched as lowercase substrings.
pub(crate) const HIGH_VALUE_CATEGORIES: &[&str] = &[
    "manufacturing",
    "real estate",
    "healthcare",
    "export",
    "automotive",
];

/// Cities that earn the full city sub-score. Matched as lowercase substrings.
pub(crate) const TIER1_CITIES: &[&str] = &["bangalore", "mumbai", "delhi", "pune", "gurgaon"];

/// URL fragments that mark a website as present but not working.
const BROKEN_SITE_MARKERS: &[&str] = &["broken", "error"];

const WEBSITE_MISSING: u8 = 40;
const WEBSITE_BROKEN: u8 = 30;
const WEBSITE_PRESENT: u8 = 10;

const CATEGORY_HIGH_VALUE: u8 = 30;
const CATEGORY_OTHER: u8 = 15;

const CITY_TIER1: u8 = 20;
const CITY_OTHER: u8 = 10;

const HOT_THRESHOLD: u8 = 75;
const WARM_THRESHOLD: u8 = 40;

/// Scores at or above this are always flagged as hot opportunities.
const HOT_OPPORTUNITY_THRESHOLD: u8 = 80;

/// The sub-scores and predicates behind a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub website: u8,
    pub category: u8,
    pub city: u8,
    pub has_no_website: bool,
    pub is_high_value_category: bool,
    pub is_tier1_city: bool,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn total(&self) -> u8 {
        self.website + self.category + self.city
    }
}

/// Compute the three sub-scores for a lead without deriving the rest of the
/// classification.
#[must_use]
pub fn score_breakdown(lead: &LeadInput) -> ScoreBreakdown {
    let has_no_website = lead.has_no_website();
    let is_high_value_category = matches_any(lead.category.as_deref(), HIGH_VALUE_CATEGORIES);
    let is_tier1_city = matches_any(lead.city.as_deref(), TIER1_CITIES);

    let website = if has_no_website {
        WEBSITE_MISSING
    } else if matches_any(lead.website_url.as_deref(), BROKEN_SITE_MARKERS) {
        WEBSITE_BROKEN
    } else {
        WEBSITE_PRESENT
    };

    let category = if is_high_value_category {
        CATEGORY_HIGH_VALUE
    } else {
        CATEGORY_OTHER
    };

    let city = if is_tier1_city { CITY_TIER1 } else { CITY_OTHER };

    ScoreBreakdown {
        website,
        category,
        city,
        has_no_website,
        is_high_value_category,
        is_tier1_city,
    }
}

/// Classify a lead.
///
/// Total over its input: an empty [`LeadInput`] yields a valid result. The
/// pitch rules are priority-ordered and the missing-website rule is checked
/// first, so a lead without a website always gets the website pitch even when
/// its score would otherwise qualify for an automation upsell.
#[must_use]
pub fn classify(lead: &LeadInput) -> ClassificationResult {
    let breakdown = score_breakdown(lead);
    let score = breakdown.total();

    let (pitch_type, service_tier, estimated_value) = pitch_for(score, breakdown.has_no_website);

    ClassificationResult {
        score,
        temperature: temperature_for(score),
        pitch_type,
        service_tier,
        estimated_value,
        is_hot_opportunity: score >= HOT_OPPORTUNITY_THRESHOLD
            || (breakdown.has_no_website && breakdown.is_high_value_category),
        lead_status: if breakdown.has_no_website {
            LeadStatus::NoWebsite
        } else {
            LeadStatus::HasWebsite
        },
    }
}

fn temperature_for(score: u8) -> Temperature {
    if score >= HOT_THRESHOLD {
        Temperature::Hot
    } else if score >= WARM_THRESHOLD {
        Temperature::Warm
    } else {
        Temperature::Cold
    }
}

// Comparisons are strict: a score of exactly 80 lands in the seo_audit
// branch and exactly 60 in the default branch.
fn pitch_for(score: u8, has_no_website: bool) -> (PitchType, ServiceTier, i64) {
    if has_no_website {
        (
            PitchType::WebsiteDevelopment,
            ServiceTier::DigitalPresence,
            45_000,
        )
    } else if score > 80 {
        (
            PitchType::CrmSetup,
            ServiceTier::BusinessAutomation,
            150_000,
        )
    } else if score > 60 {
        (PitchType::SeoAudit, ServiceTier::GrowthSystem, 85_000)
    } else {
        (PitchType::LeadGen, ServiceTier::DigitalPresence, 25_000)
    }
}

fn matches_any(value: Option<&str>, keywords: &[&str]) -> bool {
    let Some(value) = value else {
        return false;
    };
    let lower = value.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
