use crate::config::types::{CrawlConfig, DiscoveryMethod};
use crate::ConfigError;

/// Validates a crawl configuration before the run starts
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_base_url(config)?;
    validate_method(config)?;
    validate_limits(config)?;
    Ok(())
}

fn validate_base_url(config: &CrawlConfig) -> Result<(), ConfigError> {
    let url = &config.base_url;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base URL has no host: {}",
            url
        )));
    }

    Ok(())
}

fn validate_method(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.method == DiscoveryMethod::Sitemap && config.sitemap_url.is_none() {
        return Err(ConfigError::Validation(
            "--method sitemap requires --sitemap <url>".to_string(),
        ));
    }

    if let Some(sitemap_url) = &config.sitemap_url {
        if sitemap_url.scheme() != "http" && sitemap_url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "sitemap URL must use http or https, got '{}'",
                sitemap_url.scheme()
            )));
        }
    }

    Ok(())
}

fn validate_limits(config: &CrawlConfig) -> Result<(), ConfigError> {
    if !config.delay.is_finite() || config.delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay must be a non-negative number of seconds, got {}",
            config.delay
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be at least 1".to_string(),
        ));
    }

    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
