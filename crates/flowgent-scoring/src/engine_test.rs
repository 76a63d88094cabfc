use super::*;

fn lead(website: &str, category: &str, city: &str) -> LeadInput {
    LeadInput::new(Some(website), Some(category), Some(city))
}

/// Websites, categories and cities covering every sub-score branch.
fn sample_grid() -> Vec<LeadInput> {
    let websites = [
        None,
        Some(""),
        Some("https://acme.com"),
        Some("https://acme.com/broken"),
        Some("https://ERROR.example.org"),
    ];
    let categories = [None, Some("Retail"), Some("Real Estate Agency"), Some("EXPORT house")];
    let cities = [None, Some("Chennai"), Some("New Delhi"), Some("pune")];

    let mut inputs = Vec::new();
    for w in websites {
        for c in categories {
            for city in cities {
                inputs.push(LeadInput::new(w, c, city));
            }
        }
    }
    inputs
}

// ---------------------------------------------------------------------------
// Concrete scenarios
// ---------------------------------------------------------------------------

#[test]
fn no_website_high_value_tier1_city_is_website_pitch_at_max_score() {
    let result = classify(&lead("", "Manufacturing", "Mumbai"));

    assert_eq!(result.score, 90);
    assert_eq!(result.temperature, Temperature::Hot);
    assert_eq!(result.pitch_type, PitchType::WebsiteDevelopment);
    assert_eq!(result.service_tier, ServiceTier::DigitalPresence);
    assert_eq!(result.estimated_value, 45_000);
    assert!(result.is_hot_opportunity);
    assert_eq!(result.lead_status, LeadStatus::NoWebsite);
}

#[test]
fn working_website_ordinary_category_and_city_is_cold_lead_gen() {
    let result = classify(&lead("https://acme.com", "Retail", "Chennai"));

    assert_eq!(result.score, 35);
    assert_eq!(result.temperature, Temperature::Cold);
    assert_eq!(result.pitch_type, PitchType::LeadGen);
    assert_eq!(result.service_tier, ServiceTier::DigitalPresence);
    assert_eq!(result.estimated_value, 25_000);
    assert!(!result.is_hot_opportunity);
    assert_eq!(result.lead_status, LeadStatus::HasWebsite);
}

#[test]
fn score_of_exactly_60_takes_default_pitch() {
    for (category, city) in [("Real Estate", "Pune"), ("Healthcare", "Bangalore")] {
        let result = classify(&lead("https://x.com", category, city));

        assert_eq!(result.score, 60, "{category}/{city}");
        assert_eq!(result.temperature, Temperature::Warm);
        assert_eq!(result.pitch_type, PitchType::LeadGen);
        assert_eq!(result.service_tier, ServiceTier::DigitalPresence);
        assert_eq!(result.estimated_value, 25_000);
        assert!(!result.is_hot_opportunity);
    }
}

#[test]
fn score_of_exactly_80_is_seo_audit_but_hot_opportunity() {
    let result = classify(&lead("https://x.com/broken", "Automotive", "Gurgaon"));

    assert_eq!(result.score, 80);
    assert_eq!(result.temperature, Temperature::Hot);
    assert_eq!(result.pitch_type, PitchType::SeoAudit);
    assert_eq!(result.service_tier, ServiceTier::GrowthSystem);
    assert_eq!(result.estimated_value, 85_000);
    assert!(result.is_hot_opportunity);
    assert_eq!(result.lead_status, LeadStatus::HasWebsite);
}

// ---------------------------------------------------------------------------
// Sub-scores
// ---------------------------------------------------------------------------

#[test]
fn website_sub_score_branches() {
    assert_eq!(score_breakdown(&LeadInput::default()).website, 40);
    assert_eq!(score_breakdown(&lead("", "", "")).website, 40);
    assert_eq!(score_breakdown(&lead("https://a.com/broken", "", "")).website, 30);
    assert_eq!(score_breakdown(&lead("https://a.com/Error-page", "", "")).website, 30);
    assert_eq!(score_breakdown(&lead("https://a.com", "", "")).website, 10);
}

#[test]
fn category_and_city_match_case_insensitive_substrings() {
    let b = score_breakdown(&lead("https://a.com", "Commercial REAL ESTATE", "navi mumbai"));
    assert!(b.is_high_value_category);
    assert!(b.is_tier1_city);
    assert_eq!(b.category, 30);
    assert_eq!(b.city, 20);

    let b = score_breakdown(&lead("https://a.com", "Bakery", "Kochi"));
    assert!(!b.is_high_value_category);
    assert!(!b.is_tier1_city);
    assert_eq!(b.category, 15);
    assert_eq!(b.city, 10);
}

#[test]
fn empty_input_is_valid_classification() {
    let result = classify(&LeadInput::default());

    // 40 (no website) + 15 + 10
    assert_eq!(result.score, 65);
    assert_eq!(result.temperature, Temperature::Warm);
    assert_eq!(result.pitch_type, PitchType::WebsiteDevelopment);
    assert!(!result.is_hot_opportunity);
    assert_eq!(result.lead_status, LeadStatus::NoWebsite);
}

// ---------------------------------------------------------------------------
// Properties over the sample grid
// ---------------------------------------------------------------------------

#[test]
fn classify_is_deterministic() {
    for input in sample_grid() {
        assert_eq!(classify(&input), classify(&input), "{input:?}");
    }
}

#[test]
fn score_stays_within_bounds() {
    for input in sample_grid() {
        let score = classify(&input).score;
        assert!((35..=90).contains(&score), "score {score} for {input:?}");
    }
}

#[test]
fn temperature_is_monotonic_in_score() {
    for input in sample_grid() {
        let result = classify(&input);
        let expected = match result.score {
            75.. => Temperature::Hot,
            40..=74 => Temperature::Warm,
            _ => Temperature::Cold,
        };
        assert_eq!(result.temperature, expected, "{input:?}");
    }
}

#[test]
fn missing_website_always_gets_website_pitch() {
    for input in sample_grid().into_iter().filter(LeadInput::has_no_website) {
        let result = classify(&input);
        assert_eq!(result.pitch_type, PitchType::WebsiteDevelopment, "{input:?}");
        assert_eq!(result.service_tier, ServiceTier::DigitalPresence);
        assert_eq!(result.estimated_value, 45_000);
    }
}

#[test]
fn status_tracks_website_presence_only() {
    for input in sample_grid() {
        let expected = if input.has_no_website() {
            LeadStatus::NoWebsite
        } else {
            LeadStatus::HasWebsite
        };
        assert_eq!(classify(&input).lead_status, expected, "{input:?}");
    }
}

#[test]
fn hot_opportunity_is_score_or_missing_site_in_high_value_sector() {
    for input in sample_grid() {
        let result = classify(&input);
        let b = score_breakdown(&input);
        let expected = result.score >= 80 || (b.has_no_website && b.is_high_value_category);
        assert_eq!(result.is_hot_opportunity, expected, "{input:?}");
    }
}

#[test]
fn hot_temperature_without_hot_opportunity() {
    // 40 + 15 + 20: hot by temperature, but below 80 and not a high-value sector.
    let result = classify(&LeadInput::new(None, Some("Bakery"), Some("Delhi")));

    assert_eq!(result.score, 75);
    assert_eq!(result.temperature, Temperature::Hot);
    assert!(!result.is_hot_opportunity);
}

#[test]
fn missing_site_in_high_value_sector_is_hot_opportunity_outside_tier1_city() {
    let result = classify(&LeadInput::new(None, Some("Healthcare"), Some("Kochi")));

    assert_eq!(result.score, 80);
    assert!(result.is_hot_opportunity);
    assert_eq!(result.pitch_type, PitchType::WebsiteDevelopment);
}

#[test]
fn crm_setup_branch_requires_website_and_score_above_80() {
    assert_eq!(
        pitch_for(81, false),
        (PitchType::CrmSetup, ServiceTier::BusinessAutomation, 150_000)
    );
    assert_eq!(
        pitch_for(81, true),
        (PitchType::WebsiteDevelopment, ServiceTier::DigitalPresence, 45_000)
    );
    assert_eq!(pitch_for(61, false).0, PitchType::SeoAudit);
    assert_eq!(pitch_for(60, false).0, PitchType::LeadGen);
}

#[test]
fn temperature_thresholds() {
    assert_eq!(temperature_for(75), Temperature::Hot);
    assert_eq!(temperature_for(74), Temperature::Warm);
    assert_eq!(temperature_for(40), Temperature::Warm);
    assert_eq!(temperature_for(39), Temperature::Cold);
}
