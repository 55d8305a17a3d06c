//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses parse and upstream URLs are well-formed
//! - Validate value ranges (timeouts > 0, at least one video mount)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug)]
pub enum ValidationError {
    InvalidBindAddress(String),
    InvalidUrl { field: &'static str, value: String },
    NoVideoMounts,
    ZeroTimeout(&'static str),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address '{}'", addr)
            }
            ValidationError::InvalidUrl { field, value } => {
                write!(f, "invalid URL in {}: '{}'", field, value)
            }
            ValidationError::NoVideoMounts => {
                write!(f, "upstream.video_mounts must list at least one mount")
            }
            ValidationError::ZeroTimeout(field) => {
                write!(f, "{} must be greater than zero", field)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    check_url(&mut errors, "upstream.catalog_base_url", &config.upstream.catalog_base_url);
    check_url(&mut errors, "upstream.test_video_url", &config.upstream.test_video_url);

    if config.upstream.video_mounts.is_empty() {
        errors.push(ValidationError::NoVideoMounts);
    }
    for mount in &config.upstream.video_mounts {
        check_url(&mut errors, "upstream.video_mounts", mount);
    }

    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("probe.timeout_secs"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.connect_secs"));
    }
    if config.timeouts.api_request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.api_request_secs"));
    }
    if config.timeouts.image_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.image_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn rejects_empty_mounts_and_bad_urls() {
        let mut config = GatewayConfig::default();
        config.upstream.video_mounts.clear();
        config.upstream.catalog_base_url = "not a url".to_string();
        config.probe.timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rejects_unparseable_bind_address() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "nonsense".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::InvalidBindAddress(_)));
    }
}
