//! Shared domain types and configuration for Flowgent.

pub mod app_config;
pub mod config;
pub mod ingest;
pub mod lead;
pub mod scraper;

use thiserror::Error;

pub use app_config::{AgentPolicyKind, AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use ingest::{load_leads_file, parse_leads_yaml, NewLead};
pub use lead::{make_lead_key, Lead, LeadEnrichment, LeadSource};
pub use scraper::{MockScraper, ScrapeQuery};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read leads file {path}: {source}")]
    LeadsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse leads file: {0}")]
    LeadsFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
