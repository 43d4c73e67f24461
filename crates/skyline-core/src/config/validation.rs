//! Configuration validation

use super::SkylineConfig;
use crate::error::{SkylineError, SkylineResult};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    pub fn validate(config: &SkylineConfig) -> SkylineResult<()> {
        Self::validate_deployment(config)?;
        Self::validate_inference(config)?;
        Self::validate_scan(config)?;
        Self::validate_logging(config)?;
        Ok(())
    }

    fn validate_deployment(config: &SkylineConfig) -> SkylineResult<()> {
        let deployment = &config.deployment;

        if !is_dns_label(&deployment.project_name) {
            return Err(SkylineError::config(format!(
                "Project name '{}' must be a lowercase DNS label (a-z, 0-9, '-', at most 63 chars)",
                deployment.project_name
            )));
        }
        if !is_dns_label(deployment.namespace()) {
            return Err(SkylineError::config(format!(
                "Namespace '{}' must be a lowercase DNS label",
                deployment.namespace()
            )));
        }

        for (field, value) in [
            ("region", &deployment.region),
            ("image", &deployment.image),
            ("domain", &deployment.domain),
            ("environment", &deployment.environment),
        ] {
            if value.trim().is_empty() {
                return Err(SkylineError::config(format!(
                    "deployment.{} must not be empty",
                    field
                )));
            }
        }

        Ok(())
    }

    fn validate_inference(config: &SkylineConfig) -> SkylineResult<()> {
        let inference = &config.inference;

        if inference.max_tokens == 0 {
            return Err(SkylineError::config("inference.max_tokens must be positive"));
        }
        if inference.timeout.is_zero() {
            return Err(SkylineError::config("inference.timeout must be positive"));
        }
        if !(inference.base_url.starts_with("http://") || inference.base_url.starts_with("https://"))
        {
            return Err(SkylineError::config(format!(
                "inference.base_url '{}' must be an http(s) URL",
                inference.base_url
            )));
        }
        if inference.enabled && !inference.has_api_key() {
            return Err(SkylineError::config(
                "Inference is enabled but no API key is set (SKYLINE_API_KEY or ANTHROPIC_API_KEY)",
            ));
        }

        Ok(())
    }

    fn validate_scan(config: &SkylineConfig) -> SkylineResult<()> {
        let scan = &config.scan;
        if scan.max_depth == 0 || scan.max_files_per_extension == 0 || scan.max_bytes_per_file == 0 {
            return Err(SkylineError::config(
                "scan.max_depth, scan.max_files_per_extension and scan.max_bytes_per_file must be positive",
            ));
        }
        Ok(())
    }

    fn validate_logging(config: &SkylineConfig) -> SkylineResult<()> {
        if !config.logging.is_valid_level() {
            return Err(SkylineError::config(format!(
                "Unknown log level '{}'",
                config.logging.level
            )));
        }
        Ok(())
    }
}

/// RFC 1123 label: lowercase alphanumerics and '-', not starting or ending with '-'
pub fn is_dns_label(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 63
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !value.starts_with('-')
        && !value.ends_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&SkylineConfig::default()).is_ok());
    }

    #[test]
    fn test_dns_labels() {
        assert!(is_dns_label("shop-api"));
        assert!(is_dns_label("a1"));
        assert!(!is_dns_label("Shop"));
        assert!(!is_dns_label("-shop"));
        assert!(!is_dns_label("shop_api"));
        assert!(!is_dns_label(&"a".repeat(64)));
    }

    #[test]
    fn test_bad_project_name() {
        let mut config = SkylineConfig::default();
        config.deployment.project_name = "My App".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_inference_requires_key() {
        let mut config = SkylineConfig::default();
        config.inference.enabled = true;
        assert!(ConfigValidator::validate(&config).is_err());

        config.inference.api_key = Some("sk-test".to_string());
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_empty_region_and_zero_limits() {
        let mut config = SkylineConfig::default();
        config.deployment.region = " ".to_string();
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = SkylineConfig::default();
        config.scan.max_bytes_per_file = 0;
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = SkylineConfig::default();
        config.inference.max_tokens = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
