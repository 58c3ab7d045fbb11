// crates/mycel-cli/src/config.rs
//
// Runtime configuration for the mycel CLI.
// Loaded from a TOML file, overridden by flags, and validated into the
// engine, source, and ingestion settings before any network call.

use std::fmt;
use std::fs;

use serde::Deserialize;

use mycel_core::MycelError;
use mycel_github::{GitHubConfig, DEFAULT_API_BASE_URL};
use mycel_policy::PolicyConfig;
use mycel_reputation::IngestOptions;

use crate::output::OutputFormat;

/// Blocklist as either a TOML array or a comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Blocklist {
    List(Vec<String>),
    Csv(String),
}

impl Default for Blocklist {
    fn default() -> Self {
        Blocklist::List(Vec::new())
    }
}

impl Blocklist {
    /// Entries, trimmed, with blanks dropped.
    pub fn entries(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Blocklist::List(items) => items.iter().map(String::as_str).collect(),
            Blocklist::Csv(csv) => csv.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Raw configuration as written by the operator.
#[derive(Clone, Deserialize)]
pub struct MycelConfig {
    /// API token. May also come from `GITHUB_TOKEN`.
    #[serde(default)]
    pub token: Option<String>,

    /// Organization login.
    #[serde(default)]
    pub org: Option<String>,

    /// Seed identity from which all trust propagates.
    #[serde(default)]
    pub pioneer: Option<String>,

    /// Usernames that are never added or removed.
    #[serde(default)]
    pub blocklist: Blocklist,

    /// Minimum propagated trust for membership.
    #[serde(default = "default_trust_threshold")]
    pub trust_threshold: f64,

    /// Removals never shrink the roster below this size.
    #[serde(default)]
    pub min_member_count: i64,

    /// Months without activity before a member counts as inactive.
    #[serde(default = "default_inactive_after_months")]
    pub inactive_after_months: i64,

    /// Base URL of the GitHub REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Scan at most this many repositories.
    #[serde(default)]
    pub max_repos: Option<usize>,

    /// Repositories scanned in parallel.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Report format: "table" or "json".
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_trust_threshold() -> f64 {
    1.0
}

fn default_inactive_after_months() -> i64 {
    12
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_concurrency() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for MycelConfig {
    fn default() -> Self {
        Self {
            token: None,
            org: None,
            pioneer: None,
            blocklist: Blocklist::default(),
            trust_threshold: default_trust_threshold(),
            min_member_count: 0,
            inactive_after_months: default_inactive_after_months(),
            api_base_url: default_api_base_url(),
            max_repos: None,
            concurrency: default_concurrency(),
            log_level: default_log_level(),
            output: OutputFormat::default(),
        }
    }
}

impl fmt::Debug for MycelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MycelConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("org", &self.org)
            .field("pioneer", &self.pioneer)
            .field("blocklist", &self.blocklist)
            .field("trust_threshold", &self.trust_threshold)
            .field("min_member_count", &self.min_member_count)
            .field("inactive_after_months", &self.inactive_after_months)
            .field("api_base_url", &self.api_base_url)
            .field("max_repos", &self.max_repos)
            .field("concurrency", &self.concurrency)
            .field("log_level", &self.log_level)
            .field("output", &self.output)
            .finish()
    }
}

/// Values given on the command line. Each one that is set replaces the
/// corresponding file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub org: Option<String>,
    pub pioneer: Option<String>,
    pub max_repos: Option<usize>,
    pub output: Option<OutputFormat>,
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub policy: PolicyConfig,
    pub github: GitHubConfig,
    pub ingest: IngestOptions,
    pub output: OutputFormat,
}

impl MycelConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &str) -> Result<Self, MycelError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| MycelError::Config(format!("cannot read {}: {}", path, e)))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, MycelError> {
        toml::from_str(contents).map_err(|e| MycelError::Config(e.to_string()))
    }

    /// Apply command-line overrides on top of the file values.
    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(org) = overrides.org {
            self.org = Some(org);
        }
        if let Some(pioneer) = overrides.pioneer {
            self.pioneer = Some(pioneer);
        }
        if let Some(max_repos) = overrides.max_repos {
            self.max_repos = Some(max_repos);
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
    }

    /// Validate and split into engine, source, and ingestion settings.
    ///
    /// `env_token` is used when the file carries no token.
    pub fn resolve(self, env_token: Option<String>) -> Result<ResolvedConfig, MycelError> {
        let token = non_blank(self.token)
            .or_else(|| non_blank(env_token))
            .ok_or_else(|| {
                MycelError::Config("token is required (config or GITHUB_TOKEN)".to_string())
            })?;
        let org = non_blank(self.org)
            .ok_or_else(|| MycelError::Config("org is required".to_string()))?;
        let pioneer = non_blank(self.pioneer)
            .ok_or_else(|| MycelError::Config("pioneer is required".to_string()))?;

        let min_member_count = usize::try_from(self.min_member_count).map_err(|_| {
            MycelError::Config(format!(
                "min_member_count must be non-negative, got {}",
                self.min_member_count
            ))
        })?;
        let inactive_after_months = u32::try_from(self.inactive_after_months).map_err(|_| {
            MycelError::Config(format!(
                "inactive_after_months must be a non-negative month count, got {}",
                self.inactive_after_months
            ))
        })?;

        let policy = PolicyConfig::new(pioneer)
            .with_trust_threshold(self.trust_threshold)
            .with_min_member_count(min_member_count)
            .with_inactive_after_months(inactive_after_months)
            .with_blocklist(self.blocklist.entries());
        policy.validate()?;

        Ok(ResolvedConfig {
            policy,
            github: GitHubConfig {
                api_base_url: self.api_base_url,
                org,
                token,
            },
            ingest: IngestOptions {
                max_repos: self.max_repos,
                concurrency: self.concurrency.max(1),
            },
            output: self.output,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
