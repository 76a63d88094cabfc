//! AI readiness scoring.
//!
//! Asks the generative model for a single 0-100 number describing how ready
//! a business is to buy digital services, and parses the answer.

use std::num::IntErrorKind;
use std::sync::LazyLock;

use flowgent_core::Lead;
use flowgent_scoring::DEFAULT_READINESS_SCORE;
use regex::Regex;

use crate::error::EnrichmentError;
use crate::genai::GenAiClient;

// ASCII only: `\d` would also match digits from other scripts.
static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Build the readiness prompt for `lead`.
///
/// Absent attributes are rendered as `unknown` so the model never sees an
/// empty field.
#[must_use]
pub fn readiness_prompt(lead: &Lead) -> String {
    let field = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("unknown")
            .to_owned()
    };
    format!(
        "Analyze this business lead and rate its readiness to buy digital services \
         (website, marketing, automation) on a scale of 0 to 100.\n\
         Business name: {name}\n\
         Website: {website}\n\
         Category: {category}\n\
         City: {city}\n\
         Reply with only the number.",
        name = lead.business_name.trim(),
        website = field(&lead.website_url),
        category = field(&lead.category),
        city = field(&lead.city),
    )
}

/// Extract the first ASCII integer in `text`, clamped to 100.
///
/// # Errors
///
/// Returns [`EnrichmentError::UnparseableScore`] when `text` contains no
/// ASCII digits.
pub fn parse_readiness_score(text: &str) -> Result<u8, EnrichmentError> {
    let digits = FIRST_INTEGER
        .find(text)
        .map(|m| m.as_str())
        .ok_or_else(|| EnrichmentError::UnparseableScore(text.trim().to_owned()))?;

    let value = match digits.parse::<u32>() {
        Ok(n) => n.min(100),
        // The match is all ASCII digits, so overflow is the only failure.
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => 100,
        Err(_) => return Err(EnrichmentError::UnparseableScore(text.trim().to_owned())),
    };
    Ok(u8::try_from(value).unwrap_or(100))
}

/// Obtains readiness scores from the generative model.
#[derive(Debug, Clone)]
pub struct ReadinessScorer {
    client: GenAiClient,
}

impl ReadinessScorer {
    #[must_use]
    pub fn new(client: GenAiClient) -> Self {
        Self { client }
    }

    /// Ask the model for `lead`'s readiness score.
    ///
    /// # Errors
    ///
    /// Any [`EnrichmentError`] from the HTTP call or from parsing the answer.
    pub async fn score(&self, lead: &Lead) -> Result<u8, EnrichmentError> {
        let answer = self.client.generate_text(&readiness_prompt(lead)).await?;
        parse_readiness_score(&answer)
    }

    /// Like [`score`](Self::score), but logs any failure and returns
    /// [`DEFAULT_READINESS_SCORE`] instead.
    pub async fn score_or_default(&self, lead: &Lead) -> u8 {
        match self.score(lead).await {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!(
                    lead_id = %lead.id,
                    error = %e,
                    fallback = DEFAULT_READINESS_SCORE,
                    "enrich: readiness scoring failed, using default"
                );
                DEFAULT_READINESS_SCORE
            }
        }
    }
}
