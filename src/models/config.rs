use std::fmt;

use super::ProjectRef;

pub const ENV_ORG: &str = "ADO_ORG";
pub const ENV_PROJECT: &str = "ADO_PROJECT";
pub const ENV_PAT: &str = "ADO_PAT";
pub const ENV_BASE_URL: &str = "ADO_BASE_URL";
pub const ENV_API_VERSION: &str = "ADO_API_VERSION";
pub const ENV_TIMEOUT: &str = "ADO_TIMEOUT_SECS";

/// Connection settings read from `ADO_*` environment variables
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub organization: String,
    pub project: String,
    /// Personal Access Token
    pub pat: String,
    /// Service root without trailing slashes
    pub base_url: String,
    pub api_version: String,
    /// Timeout in seconds for the create request
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "https://dev.azure.com".to_string()
}

fn default_api_version() -> String {
    "7.1".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Build the config from a variable reader.
    ///
    /// Unset and empty variables are treated the same. Every missing required
    /// variable is reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let organization = read(ENV_ORG).unwrap_or_default();
        let project = read(ENV_PROJECT).unwrap_or_default();
        let pat = read(ENV_PAT).unwrap_or_default();
        let base_url = match read(ENV_BASE_URL) {
            Some(url) => normalize_base_url(&url),
            None => default_base_url(),
        };

        let mut missing = Vec::new();
        if organization.is_empty() {
            missing.push(ENV_ORG);
        }
        if project.is_empty() {
            missing.push(ENV_PROJECT);
        }
        if pat.is_empty() {
            missing.push(ENV_PAT);
        }
        // A value made only of slashes normalizes to nothing
        if base_url.is_empty() {
            missing.push(ENV_BASE_URL);
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        let timeout_seconds = match read(ENV_TIMEOUT) {
            Some(raw) => parse_timeout(&raw)?,
            None => default_timeout(),
        };

        Ok(Self {
            organization,
            project,
            pat,
            base_url,
            api_version: read(ENV_API_VERSION).unwrap_or_else(default_api_version),
            timeout_seconds,
        })
    }

    /// Read the config from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Merge CLI overrides into the config
    pub fn with_overrides(mut self, timeout: Option<u64>) -> Self {
        if let Some(t) = timeout {
            self.timeout_seconds = t;
        }
        self
    }

    pub fn project_ref(&self) -> ProjectRef {
        ProjectRef::new(&self.base_url, &self.organization, &self.project)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("pat", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Strip trailing slashes so URLs can be joined with `/`
pub fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{}", format_missing(.0))]
    MissingVariables(Vec<&'static str>),
    #[error("Invalid value for ADO_TIMEOUT_SECS: '{0}' (expected a positive number of seconds)")]
    InvalidTimeout(String),
}

fn format_missing(missing: &[&str]) -> String {
    let mut msg = String::from("Missing required environment variables:\n");
    for name in missing {
        msg.push_str(&format!("  - {}\n", name));
    }
    msg.push_str("\nPlease set the above variables in your environment. Example (bash/zsh):\n");
    for name in missing {
        msg.push_str(&format!("  export {}=value\n", name));
    }
    msg
}
