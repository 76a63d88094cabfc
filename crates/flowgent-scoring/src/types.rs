use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Partial lead description consumed by the scoring engine.
///
/// Every field is optional. A missing `website_url` and an empty (or
/// whitespace-only) one are treated identically as "no website".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInput {
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl LeadInput {
    #[must_use]
    pub fn new(website_url: Option<&str>, category: Option<&str>, city: Option<&str>) -> Self {
        Self {
            website_url: website_url.map(str::to_owned),
            category: category.map(str::to_owned),
            city: city.map(str::to_owned),
        }
    }

    /// Returns `true` when the lead has no usable website URL.
    #[must_use]
    pub fn has_no_website(&self) -> bool {
        self.website_url
            .as_deref()
            .is_none_or(|url| url.trim().is_empty())
    }
}

/// Error returned when a stored label does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} label: '{value}'")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseLabelError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Coarse urgency bucket derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Hot,
    Warm,
    Cold,
}

impl Temperature {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Temperature::Hot => "hot",
            Temperature::Warm => "warm",
            Temperature::Cold => "cold",
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Temperature {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Ok(Temperature::Hot),
            "warm" => Ok(Temperature::Warm),
            "cold" => Ok(Temperature::Cold),
            _ => Err(ParseLabelError::new("temperature", s)),
        }
    }
}

/// Recommended sales approach for a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchType {
    WebsiteDevelopment,
    CrmSetup,
    SeoAudit,
    LeadGen,
}

impl PitchType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PitchType::WebsiteDevelopment => "website_development",
            PitchType::CrmSetup => "crm_setup",
            PitchType::SeoAudit => "seo_audit",
            PitchType::LeadGen => "lead_gen",
        }
    }
}

impl fmt::Display for PitchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PitchType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "website_development" => Ok(PitchType::WebsiteDevelopment),
            "crm_setup" => Ok(PitchType::CrmSetup),
            "seo_audit" => Ok(PitchType::SeoAudit),
            "lead_gen" => Ok(PitchType::LeadGen),
            _ => Err(ParseLabelError::new("pitch type", s)),
        }
    }
}

/// Packaged offering level tied to the pitch type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceTier {
    #[serde(rename = "Tier 1 - Digital Presence")]
    DigitalPresence,
    #[serde(rename = "Tier 2 - Growth System")]
    GrowthSystem,
    #[serde(rename = "Tier 3 - Business Automation")]
    BusinessAutomation,
}

impl ServiceTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceTier::DigitalPresence => "Tier 1 - Digital Presence",
            ServiceTier::GrowthSystem => "Tier 2 - Growth System",
            ServiceTier::BusinessAutomation => "Tier 3 - Business Automation",
        }
    }
}

impl fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceTier {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Tier 1 - Digital Presence" => Ok(ServiceTier::DigitalPresence),
            "Tier 2 - Growth System" => Ok(ServiceTier::GrowthSystem),
            "Tier 3 - Business Automation" => Ok(ServiceTier::BusinessAutomation),
            _ => Err(ParseLabelError::new("service tier", s)),
        }
    }
}

/// Website presence status of a lead, independent of its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    NoWebsite,
    HasWebsite,
}

impl LeadStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::NoWebsite => "no_website",
            LeadStatus::HasWebsite => "has_website",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "no_website" => Ok(LeadStatus::NoWebsite),
            "has_website" => Ok(LeadStatus::HasWebsite),
            _ => Err(ParseLabelError::new("lead status", s)),
        }
    }
}

/// Complete output of [`crate::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Sum of the three sub-scores, always in `[35, 90]`.
    pub score: u8,
    pub temperature: Temperature,
    pub pitch_type: PitchType,
    pub service_tier: ServiceTier,
    /// Estimated contract value in whole currency units.
    pub estimated_value: i64,
    pub is_hot_opportunity: bool,
    pub lead_status: LeadStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_urls_count_as_no_website() {
        assert!(LeadInput::default().has_no_website());
        assert!(LeadInput::new(Some(""), None, None).has_no_website());
        assert!(LeadInput::new(Some("   "), None, None).has_no_website());
        assert!(!LeadInput::new(Some("https://acme.com"), None, None).has_no_website());
    }

    #[test]
    fn labels_round_trip_through_from_str() {
        for t in [Temperature::Hot, Temperature::Warm, Temperature::Cold] {
            assert_eq!(t.as_str().parse::<Temperature>(), Ok(t));
        }
        for p in [
            PitchType::WebsiteDevelopment,
            PitchType::CrmSetup,
            PitchType::SeoAudit,
            PitchType::LeadGen,
        ] {
            assert_eq!(p.as_str().parse::<PitchType>(), Ok(p));
        }
        for s in [
            ServiceTier::DigitalPresence,
            ServiceTier::GrowthSystem,
            ServiceTier::BusinessAutomation,
        ] {
            assert_eq!(s.as_str().parse::<ServiceTier>(), Ok(s));
        }
        for s in [LeadStatus::NoWebsite, LeadStatus::HasWebsite] {
            assert_eq!(s.as_str().parse::<LeadStatus>(), Ok(s));
        }
    }

    #[test]
    fn unknown_label_reports_kind_and_value() {
        let err = "lukewarm".parse::<Temperature>().unwrap_err();
        assert_eq!(err.kind, "temperature");
        assert_eq!(err.to_string(), "unknown temperature label: 'lukewarm'");
    }

    #[test]
    fn serde_uses_wire_labels() {
        assert_eq!(
            serde_json::to_string(&ServiceTier::GrowthSystem).unwrap(),
            "\"Tier 2 - Growth System\""
        );
        assert_eq!(
            serde_json::to_string(&PitchType::WebsiteDevelopment).unwrap(),
            "\"website_development\""
        );
        assert_eq!(serde_json::to_string(&Temperature::Hot).unwrap(), "\"hot\"");
    }

    #[test]
    fn lead_input_deserializes_camel_case_with_missing_fields() {
        let input: LeadInput = serde_json::from_str(r#"{"websiteUrl": "https://x.com"}"#).unwrap();
        assert_eq!(input.website_url.as_deref(), Some("https://x.com"));
        assert!(input.category.is_none());
        assert!(input.city.is_none());
    }
}
