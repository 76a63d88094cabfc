//! Manual lead entry, single or batched from a YAML file.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::lead::make_lead_key;
use crate::ConfigError;

/// A lead as entered by an operator or produced by a scraper, before scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub business_name: String,
    #[serde(default, alias = "website")]
    pub website_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl NewLead {
    /// Check the fields an operator can get wrong by hand.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an empty business name or an
    /// email address without an `@`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.business_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "business name must be non-empty".to_string(),
            ));
        }
        if let Some(email) = self.email.as_deref() {
            if !email.trim().is_empty() && !email.contains('@') {
                return Err(ConfigError::Validation(format!(
                    "lead '{}' has invalid email '{email}'",
                    self.business_name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct LeadsFile {
    leads: Vec<NewLead>,
}

/// Parse and validate a batch of leads from YAML.
///
/// The document must have a top-level `leads:` list. Duplicates (same
/// business name and city, ignoring case) are rejected.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML does not parse or any lead fails validation.
pub fn parse_leads_yaml(content: &str) -> Result<Vec<NewLead>, ConfigError> {
    let file: LeadsFile = serde_yaml::from_str(content)?;

    let mut seen = HashSet::new();
    for lead in &file.leads {
        lead.validate()?;
        let key = make_lead_key(&lead.business_name, lead.city.as_deref());
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!(
                "duplicate lead: '{}' in {}",
                lead.business_name,
                lead.city.as_deref().unwrap_or("(no city)")
            )));
        }
    }

    Ok(file.leads)
}

/// Load and validate a batch of leads from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_leads_file(path: &Path) -> Result<Vec<NewLead>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LeadsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_leads_yaml(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_and_full_entries() {
        let yaml = r"
leads:
  - business_name: Sharma Auto Parts
    website: https://sharma-auto.in
    category: Automotive
    city: Pune
    phone: '+91 20 5555 0101'
  - business_name: Corner Bakery
";
        let leads = parse_leads_yaml(yaml).unwrap();

        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].website_url.as_deref(), Some("https://sharma-auto.in"));
        assert_eq!(leads[0].category.as_deref(), Some("Automotive"));
        assert_eq!(leads[1].business_name, "Corner Bakery");
        assert!(leads[1].website_url.is_none());
        assert!(leads[1].city.is_none());
    }

    #[test]
    fn rejects_empty_business_name() {
        let yaml = "leads:\n  - business_name: '  '\n";
        let err = parse_leads_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn rejects_duplicate_business_in_same_city() {
        let yaml = r"
leads:
  - business_name: Corner Bakery
    city: Pune
  - business_name: corner bakery
    city: PUNE
";
        let err = parse_leads_yaml(yaml).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")),
            "got {err:?}"
        );
    }

    #[test]
    fn same_name_in_different_cities_is_allowed() {
        let yaml = r"
leads:
  - business_name: Corner Bakery
    city: Pune
  - business_name: Corner Bakery
    city: Delhi
";
        assert_eq!(parse_leads_yaml(yaml).unwrap().len(), 2);
    }

    #[test]
    fn rejects_malformed_email() {
        let lead = NewLead {
            business_name: "Acme".to_string(),
            email: Some("not-an-email".to_string()),
            ..NewLead::default()
        };
        assert!(matches!(lead.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = parse_leads_yaml("leads: [unterminated").unwrap_err();
        assert!(matches!(err, ConfigError::LeadsFileParse(_)), "got {err:?}");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_leads_file(Path::new("/nonexistent/flowgent/leads.yaml")).unwrap_err();
        assert!(
            matches!(err, ConfigError::LeadsFileIo { ref path, .. } if path.contains("leads.yaml")),
            "got {err:?}"
        );
    }
}
