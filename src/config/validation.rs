use crate::config::types::{Config, OutputConfig, SourceConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the listing source configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.page_param.trim().is_empty() {
        return Err(ConfigError::Validation(
            "page-param cannot be empty".to_string(),
        ));
    }

    if config.pages.is_empty() {
        return Err(ConfigError::Validation(
            "pages must list at least one page number".to_string(),
        ));
    }

    if let Some(zero) = config.pages.iter().find(|&&p| p == 0) {
        return Err(ConfigError::Validation(format!(
            "page numbers start at 1, got {}",
            zero
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.source.base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_non_http_base_url() {
        let mut config = Config::default();
        config.source.base_url = "ftp://example.com/listing".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_empty_pages() {
        let mut config = Config::default();
        config.source.pages.clear();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_page_zero_rejected() {
        let mut config = Config::default();
        config.source.pages = vec![1, 0, 2];
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_page_param() {
        let mut config = Config::default();
        config.source.page_param = " ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent() {
        let mut config = Config::default();
        config.source.user_agent = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_database_path() {
        let mut config = Config::default();
        config.output.database_path = String::new();
        assert!(validate(&config).is_err());
    }
}
