//! Mocked business-listing scraper.
//!
//! Stands in for a directory scraper: given a category and city it returns a
//! deterministic set of fake listings. Listings rotate through three website
//! states (none, broken, working) so downstream scoring sees every branch.

use crate::ingest::NewLead;

/// Upper bound on listings returned for a single query.
pub const MAX_SCRAPE_RESULTS: usize = 50;

const NAME_PREFIXES: &[&str] = &[
    "Sunrise", "Metro", "Apex", "Galaxy", "Shree", "Royal", "Prime", "Evergreen", "Lotus",
    "Pioneer",
];

const NAME_SUFFIXES: &[&str] = &["Enterprises", "Solutions", "Traders", "Group", "& Sons", "Works"];

/// What to scrape for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeQuery {
    pub category: String,
    pub city: String,
    pub count: usize,
}

/// Deterministic fake scraper.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockScraper;

impl MockScraper {
    /// Produce up to `query.count` listings (capped at [`MAX_SCRAPE_RESULTS`]).
    ///
    /// The same query always yields the same listings.
    #[must_use]
    pub fn scrape(&self, query: &ScrapeQuery) -> Vec<NewLead> {
        let category = query.category.trim();
        let city = query.city.trim();
        let count = query.count.min(MAX_SCRAPE_RESULTS);

        (0..count)
            .map(|i| {
                let prefix = NAME_PREFIXES[i % NAME_PREFIXES.len()];
                let suffix = NAME_SUFFIXES[(i / NAME_PREFIXES.len()) % NAME_SUFFIXES.len()];
                let business_name = if category.is_empty() {
                    format!("{prefix} {suffix}")
                } else {
                    format!("{prefix} {category} {suffix}")
                };
                let slug = slugify(&business_name);

                let website_url = match i % 3 {
                    0 => None,
                    1 => Some(format!("https://{slug}.example.com/error")),
                    _ => Some(format!("https://{slug}.example.com")),
                };

                NewLead {
                    business_name,
                    website_url,
                    category: non_empty(category),
                    city: non_empty(city),
                    phone: Some(format!("+91 90000 {:05}", i + 1)),
                    email: Some(format!("contact@{slug}.example.com")),
                }
            })
            .collect()
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_owned())
    }
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
