use std::collections::HashSet;

use super::{types::Config, ConfigError};
use crate::catalog::GOOGLE_MAX_RESULTS;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Catalog result limit is within what the catalogs accept
/// - At least one catalog source, none listed twice
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let limit = config.catalog.default_limit;
    if limit == 0 || limit > GOOGLE_MAX_RESULTS {
        return Err(ConfigError::ValidationError(format!(
            "catalog.default_limit must be between 1 and {}, got {}",
            GOOGLE_MAX_RESULTS, limit
        )));
    }

    if config.catalog.sources.is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.sources must list at least one catalog".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for source in &config.catalog.sources {
        if !seen.insert(source) {
            return Err(ConfigError::ValidationError(format!(
                "catalog.sources lists {} more than once",
                source
            )));
        }
    }

    Ok(())
}
