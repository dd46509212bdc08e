use tracing::debug;

use crate::error::AppError;
use crate::models::Config;

/// Load configuration from the environment with CLI overrides
pub fn load_config(timeout: Option<u64>) -> Result<Config, AppError> {
    load_config_with(|name| std::env::var(name).ok(), timeout)
}

/// Load configuration from an arbitrary variable reader with CLI overrides
pub fn load_config_with<F>(lookup: F, timeout: Option<u64>) -> Result<Config, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = Config::from_lookup(lookup)?.with_overrides(timeout);

    debug!(
        "Configuration loaded: org={}, project={}, url={}, api-version={}, timeout={}s",
        config.organization,
        config.project,
        config.base_url,
        config.api_version,
        config.timeout_seconds
    );

    Ok(config)
}
