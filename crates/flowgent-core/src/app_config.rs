use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which enrichment policy the background agent applies to each lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentPolicyKind {
    /// AI readiness score drives temperature and estimated value.
    Readiness,
    /// Re-runs the rule engine; readiness is stored alongside as a side attribute.
    RuleMirror,
}

impl std::fmt::Display for AgentPolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentPolicyKind::Readiness => write!(f, "readiness"),
            AgentPolicyKind::RuleMirror => write!(f, "rule_mirror"),
        }
    }
}

impl FromStr for AgentPolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "readiness" => Ok(AgentPolicyKind::Readiness),
            "rule_mirror" => Ok(AgentPolicyKind::RuleMirror),
            other => Err(format!(
                "unknown policy '{other}'; expected 'readiness' or 'rule_mirror'"
            )),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub genai_api_key: Option<String>,
    pub genai_base_url: String,
    pub genai_model: String,
    pub genai_request_timeout_secs: u64,
    pub genai_max_retries: u32,
    pub genai_retry_backoff_base_ms: u64,
    pub webhook_url: Option<String>,
    pub agent_poll_interval_secs: u64,
    pub agent_batch_size: u32,
    pub agent_policy: AgentPolicyKind,
    pub agent_run_once: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "genai_api_key",
                &self.genai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("genai_base_url", &self.genai_base_url)
            .field("genai_model", &self.genai_model)
            .field(
                "genai_request_timeout_secs",
                &self.genai_request_timeout_secs,
            )
            .field("genai_max_retries", &self.genai_max_retries)
            .field(
                "genai_retry_backoff_base_ms",
                &self.genai_retry_backoff_base_ms,
            )
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "[redacted]"))
            .field("agent_poll_interval_secs", &self.agent_poll_interval_secs)
            .field("agent_batch_size", &self.agent_batch_size)
            .field("agent_policy", &self.agent_policy)
            .field("agent_run_once", &self.agent_run_once)
            .finish()
    }
}
