use crate::config::types::{Config, HarvesterConfig, SelectorConfig, SiteConfig, UserAgentConfig};
use crate::url::{AUTHOR_PLACEHOLDER, PAGE_PLACEHOLDER};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

const MAX_CONCURRENCY: usize = 256;
const MAX_AUTHOR_CONCURRENCY: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvester_config(&config.harvester)?;
    validate_site_config(&config.site)?;
    validate_selector_config(&config.selectors)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates worker pool sizes
fn validate_harvester_config(config: &HarvesterConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.max_author_concurrency < 1 || config.max_author_concurrency > MAX_AUTHOR_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "max_author_concurrency must be between 1 and {}, got {}",
            MAX_AUTHOR_CONCURRENCY, config.max_author_concurrency
        )));
    }

    Ok(())
}

/// Validates the host and listing templates
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let host = Url::parse(&config.host)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid host '{}': {}", config.host, e)))?;

    if host.scheme() != "http" && host.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Host '{}' must use HTTP or HTTPS",
            config.host
        )));
    }

    for (name, template) in [
        ("poems_path", &config.poems_path),
        ("top_authors_path", &config.top_authors_path),
    ] {
        if !template.contains(PAGE_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "{} must contain {}, got '{}'",
                name, PAGE_PLACEHOLDER, template
            )));
        }
    }

    if !config.poems_path.contains(AUTHOR_PLACEHOLDER) {
        return Err(ConfigError::Validation(format!(
            "poems_path must contain {}, got '{}'",
            AUTHOR_PLACEHOLDER, config.poems_path
        )));
    }

    Ok(())
}

/// Checks that every selector parses
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, selector) in [
        ("poem_links", &config.poem_links),
        ("author_links", &config.author_links),
        ("next_page", &config.next_page),
        ("body", &config.body),
    ] {
        Selector::parse(selector).map_err(|e| {
            ConfigError::Validation(format!("Invalid {} selector '{}': {}", name, selector, e))
        })?;
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}
