use crate::config::types::{
    Config, CrawlerConfig, DiscoveryConfig, OutputConfig, OutputFormat, TargetEntry,
    UserAgentConfig,
};
use crate::url::{is_safe_identifier, slugify};
use crate::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_discovery_config(&config.discovery)?;
    validate_output_config(&config.output)?;
    validate_targets(&config.targets)?;

    if !config.crawler.discover && config.targets.is_empty() {
        return Err(ConfigError::Validation(
            "discovery is disabled and no [[target]] entries are configured".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_http_url(&config.base_url, "base_url")?;

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.min_accept_length < 1 {
        return Err(ConfigError::Validation(
            "min_accept_length must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.identity.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent identity cannot be empty".to_string(),
        ));
    }

    // Header values cannot carry control characters
    if config.identity.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(
            "user-agent identity contains control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every link pattern compiles
fn validate_discovery_config(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    for pattern in &config.link_patterns {
        Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    match config.format {
        OutputFormat::Text => {
            if config.directory.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "output directory cannot be empty".to_string(),
                ));
            }
        }
        OutputFormat::Sqlite => {
            let missing = config
                .database_path
                .as_deref()
                .map_or(true, |p| p.trim().is_empty());
            if missing {
                return Err(ConfigError::Validation(
                    "database_path is required for sqlite output".to_string(),
                ));
            }
        }
    }

    if let Some(summary) = &config.summary_path {
        if summary.trim().is_empty() {
            return Err(ConfigError::Validation(
                "summary_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates fixed target entries
fn validate_targets(targets: &[TargetEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in targets {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "target name cannot be empty".to_string(),
            ));
        }

        let identifier = match &entry.id {
            Some(id) => id.clone(),
            None => slugify(&entry.name),
        };

        if !is_safe_identifier(&identifier) {
            return Err(ConfigError::Validation(format!(
                "target '{}' has an unusable identifier '{}' (letters, digits, '_' and '-' only)",
                entry.name, identifier
            )));
        }

        if !seen.insert(identifier.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate target identifier '{}'",
                identifier
            )));
        }

        if entry.urls.is_empty() {
            return Err(ConfigError::Validation(format!(
                "target '{}' must have at least one URL",
                entry.name
            )));
        }

        for url in &entry.urls {
            validate_http_url(url, &format!("url for target '{}'", entry.name))?;
        }
    }

    Ok(())
}

/// Checks that a string parses as an absolute HTTP(S) URL
fn validate_http_url(value: &str, what: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", what, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            what, value
        )));
    }

    Ok(())
}
