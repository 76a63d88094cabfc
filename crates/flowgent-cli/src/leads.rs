//! Lead ingestion, listing and enrichment command handlers.
//!
//! These are called from `main` after the database pool and config are
//! established, except the scrape preview which never touches the database.

use std::path::Path;

use flowgent_agent::{EnrichmentAgent, PgLeadStore};
use flowgent_core::{Lead, LeadSource, MockScraper, NewLead, ScrapeQuery};
use flowgent_scoring::Temperature;

const NAME_WIDTH: usize = 32;

/// Classify and store one manually entered lead.
///
/// # Errors
///
/// Returns an error if the lead fails validation or the upsert fails.
pub(crate) async fn run_add(pool: &sqlx::PgPool, new: NewLead) -> anyhow::Result<()> {
    new.validate()?;
    let lead = Lead::from_new(new, LeadSource::Manual);
    let stored = flowgent_db::upsert_lead(pool, &lead).await?;

    println!(
        "stored {} ({}): score {} {} {}",
        stored.business_name, stored.id, stored.score, stored.temperature, stored.pitch_type
    );
    Ok(())
}

/// Import every lead in a YAML file.
///
/// The whole file is validated before anything is written. Individual upsert
/// failures are logged and skipped, not propagated.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub(crate) async fn run_import(pool: &sqlx::PgPool, path: &Path) -> anyhow::Result<()> {
    let new_leads = flowgent_core::load_leads_file(path)?;
    let (stored, failed) = store_all(pool, new_leads, LeadSource::Import).await;
    println!(
        "imported {stored} lead(s) from {}{}",
        path.display(),
        failure_note(failed)
    );
    Ok(())
}

/// Generate mock listings and store them as scraped leads.
///
/// Per-listing failures are logged and counted.
pub(crate) async fn run_scrape(pool: &sqlx::PgPool, category: &str, city: &str, count: usize) {
    let listings = MockScraper.scrape(&scrape_query(category, city, count));
    let (stored, failed) = store_all(pool, listings, LeadSource::Scraper).await;
    println!(
        "scraped {stored} lead(s) for {category} in {city}{}",
        failure_note(failed)
    );
}

/// Print the scored listings a scrape would produce, without storing them.
pub(crate) fn run_scrape_preview(category: &str, city: &str, count: usize) {
    let leads: Vec<Lead> = MockScraper
        .scrape(&scrape_query(category, city, count))
        .into_iter()
        .map(|new| Lead::from_new(new, LeadSource::Scraper))
        .collect();

    println!(
        "dry-run: would store {} lead(s) for {category} in {city}",
        leads.len()
    );
    print!("{}", format_table(&leads));
}

/// Attribute edits for `update`; `None` leaves a field as stored.
#[derive(Debug, Default)]
pub(crate) struct AttributeChanges {
    /// `Some(None)` clears the website.
    pub website: Option<Option<String>>,
    pub category: Option<String>,
    pub city: Option<String>,
}

impl AttributeChanges {
    fn apply(self, lead: &mut Lead) {
        let website = self.website.unwrap_or_else(|| lead.website_url.clone());
        let category = self.category.or_else(|| lead.category.clone());
        let city = self.city.or_else(|| lead.city.clone());
        lead.update_scoring_attributes(website, category, city);
    }
}

/// Change a stored lead's scoring attributes and save the recomputed
/// classification.
///
/// # Errors
///
/// Returns an error if no lead has `id` or a query fails.
pub(crate) async fn run_update(
    pool: &sqlx::PgPool,
    id: uuid::Uuid,
    changes: AttributeChanges,
) -> anyhow::Result<()> {
    let mut lead = flowgent_db::get_lead(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no lead with id {id}"))?;
    changes.apply(&mut lead);
    let saved = flowgent_db::update_lead(pool, &lead).await?;

    println!(
        "updated {} ({}): score {} {} {}{}",
        saved.business_name,
        saved.id,
        saved.score,
        saved.temperature,
        saved.pitch_type,
        if saved.processed { "" } else { ", queued for enrichment" }
    );
    Ok(())
}

/// Print stored leads, highest score first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_list(
    pool: &sqlx::PgPool,
    temperature: Option<Temperature>,
    limit: i64,
) -> anyhow::Result<()> {
    let leads = flowgent_db::list_leads(pool, temperature, limit).await?;

    if leads.is_empty() {
        println!(
            "no leads found{}; run `add`, `import` or `scrape` first",
            temperature
                .map(|t| format!(" with temperature {t}"))
                .unwrap_or_default()
        );
        return Ok(());
    }

    print!("{}", format_table(&leads));
    Ok(())
}

/// Run a single enrichment cycle and report the outcome.
///
/// # Errors
///
/// Returns an error if the enrichment clients cannot be built.
pub(crate) async fn run_enrich(
    pool: sqlx::PgPool,
    config: &flowgent_core::AppConfig,
) -> anyhow::Result<()> {
    let agent = EnrichmentAgent::from_app_config(PgLeadStore::new(pool), config)?;
    let summary = agent.run_cycle().await;

    println!(
        "enrichment ({}): {} fetched, {} enriched, {} failed",
        agent.policy_name(),
        summary.fetched,
        summary.enriched,
        summary.failed
    );
    Ok(())
}

fn scrape_query(category: &str, city: &str, count: usize) -> ScrapeQuery {
    ScrapeQuery {
        category: category.to_owned(),
        city: city.to_owned(),
        count,
    }
}

async fn store_all(
    pool: &sqlx::PgPool,
    new_leads: Vec<NewLead>,
    source: LeadSource,
) -> (usize, usize) {
    let mut stored = 0usize;
    let mut failed = 0usize;

    for new in new_leads {
        let name = new.business_name.clone();
        if let Err(e) = new.validate() {
            tracing::warn!(business = %name, error = %e, "skipping invalid lead");
            failed += 1;
            continue;
        }
        let lead = Lead::from_new(new, source);
        match flowgent_db::upsert_lead(pool, &lead).await {
            Ok(_) => stored += 1,
            Err(e) => {
                tracing::warn!(business = %name, error = %e, "failed to store lead");
                failed += 1;
            }
        }
    }

    (stored, failed)
}

fn failure_note(failed: usize) -> String {
    if failed == 0 {
        String::new()
    } else {
        format!(" ({failed} failed; see log)")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max - 3).collect::<String>())
    } else {
        s.to_owned()
    }
}

fn format_table(leads: &[Lead]) -> String {
    let header = format!(
        "{:<w$}{:<7}{:<7}{:<21}{:<10}READINESS",
        "NAME",
        "SCORE",
        "TEMP",
        "PITCH",
        "VALUE",
        w = NAME_WIDTH + 2
    );
    let rows = leads.iter().map(|lead| {
        let readiness = lead
            .readiness_score
            .map_or_else(|| "\u{2014}".to_string(), |r| r.to_string());
        format!(
            "{:<w$}{:<7}{:<7}{:<21}{:<10}{}",
            truncate(&lead.business_name, NAME_WIDTH),
            lead.score,
            lead.temperature.as_str(),
            lead.pitch_type.as_str(),
            lead.estimated_value,
            readiness,
            w = NAME_WIDTH + 2
        )
    });

    std::iter::once(header)
        .chain(rows)
        .map(|line| line + "\n")
        .collect()
}
