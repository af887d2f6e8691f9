//! Configuration validation

use super::ClientConfig;
use crate::error::{QueryError, Result};

/// Validate complete configuration
pub fn validate_config(config: &ClientConfig) -> Result<()> {
    // Validate endpoint
    if config.endpoint.is_empty() {
        return Err(QueryError::Config(
            "Endpoint URL is required".to_string(),
        ));
    }

    if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
        return Err(QueryError::Config(
            "Endpoint URL must start with http:// or https://".to_string(),
        ));
    }

    // Validate timeout
    if config.timeout_secs == 0 {
        return Err(QueryError::Config(
            "Timeout must be greater than 0".to_string(),
        ));
    }

    if config.timeout_secs > 300 {
        return Err(QueryError::Config(
            "Timeout too large (max: 300 seconds)".to_string(),
        ));
    }

    // Validate pagination defaults
    if config.page_size == 0 {
        return Err(QueryError::Config(
            "Page size must be greater than 0".to_string(),
        ));
    }

    // Validate token refresh margin
    if config.token_refresh_margin_secs < 0 {
        return Err(QueryError::Config(
            "Token refresh margin cannot be negative".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = ClientConfig::default_config();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_endpoint() {
        let mut config = ClientConfig::default_config();
        config.endpoint = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_scheme() {
        let mut config = ClientConfig::default_config();
        config.endpoint = "ftp://localhost:9055".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_page_size() {
        let mut config = ClientConfig::default_config();
        config.page_size = 0;
        assert!(validate_config(&config).is_err());
    }
}
