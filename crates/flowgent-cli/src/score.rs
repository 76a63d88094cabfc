//! `score` command: classify one lead from the command line.

use flowgent_scoring::{classify, score_breakdown, ClassificationResult, LeadInput, ScoreBreakdown};

/// Classify a lead described by flags and print the result.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub(crate) fn run_score(
    website: Option<String>,
    category: Option<String>,
    city: Option<String>,
    explain: bool,
    json: bool,
) -> anyhow::Result<()> {
    let input = LeadInput {
        website_url: website,
        category,
        city,
    };
    let result = classify(&input);
    let breakdown = explain.then(|| score_breakdown(&input));

    if json {
        println!("{}", to_json(&result, breakdown.as_ref())?);
    } else {
        print!("{}", format_result(&result));
        if let Some(breakdown) = &breakdown {
            print!("{}", format_breakdown(breakdown));
        }
    }
    Ok(())
}

fn to_json(
    result: &ClassificationResult,
    breakdown: Option<&ScoreBreakdown>,
) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(result)?;
    if let (Some(b), Some(obj)) = (breakdown, value.as_object_mut()) {
        obj.insert(
            "breakdown".to_owned(),
            serde_json::json!({
                "website": b.website,
                "category": b.category,
                "city": b.city,
                "has_no_website": b.has_no_website,
                "is_high_value_category": b.is_high_value_category,
                "is_tier1_city": b.is_tier1_city,
            }),
        );
    }
    serde_json::to_string_pretty(&value)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn format_result(result: &ClassificationResult) -> String {
    let fields = [
        ("score", result.score.to_string()),
        ("temperature", result.temperature.to_string()),
        ("pitch", result.pitch_type.to_string()),
        ("service tier", result.service_tier.to_string()),
        ("estimated value", result.estimated_value.to_string()),
        ("hot opportunity", yes_no(result.is_hot_opportunity).to_owned()),
        ("status", result.lead_status.to_string()),
    ];
    fields
        .iter()
        .map(|(label, value)| format!("{label:<18}{value}\n"))
        .collect()
}

fn format_breakdown(b: &ScoreBreakdown) -> String {
    let website_reason = if b.has_no_website {
        "no website"
    } else if b.website == 30 {
        "broken website"
    } else {
        "working website"
    };
    let category_reason = if b.is_high_value_category {
        "high-value category"
    } else {
        "other category"
    };
    let city_reason = if b.is_tier1_city {
        "tier-1 city"
    } else {
        "other city"
    };

    let parts = [
        ("website", b.website, Some(website_reason)),
        ("category", b.category, Some(category_reason)),
        ("city", b.city, Some(city_reason)),
        ("total", b.total(), None),
    ];
    let rows: String = parts
        .iter()
        .map(|(label, points, reason)| match reason {
            Some(reason) => format!("  {label:<16}{points:>3}  ({reason})\n"),
            None => format!("  {label:<16}{points:>3}\n"),
        })
        .collect();
    format!("\nbreakdown\n{rows}")
}
