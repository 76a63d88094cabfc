//! Background enrichment agent for Flowgent leads.
//!
//! Polls for unprocessed leads, obtains an AI readiness score for each,
//! applies the configured enrichment policy, writes the result back and
//! notifies the webhook.

pub mod cycle;
pub mod scheduler;
pub mod store;

pub use cycle::{CycleSummary, EnrichmentAgent};
pub use scheduler::build_scheduler;
pub use store::{LeadStore, PgLeadStore};
