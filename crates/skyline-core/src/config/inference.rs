//! Remote inference settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the optional inference delegate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Use the remote model unless the command line says otherwise
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub api_version: String,
    /// Never written back to disk
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-sonnet-latest".to_string(),
            max_tokens: 4000,
            timeout: Duration::from_secs(60),
            api_version: "2023-06-01".to_string(),
            api_key: None,
        }
    }
}

impl InferenceConfig {
    /// Whether a usable API key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_human_readable() {
        let config: InferenceConfig = toml::from_str("timeout = \"90s\"").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(90));

        let text = toml::to_string(&InferenceConfig::default()).unwrap();
        assert!(text.contains("timeout = \"1m\""));
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = InferenceConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(config.has_api_key());
    }
}
