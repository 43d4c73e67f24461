//! Environment variable overrides
//!
//! The engine never reads process state; the CLI calls
//! [`apply_env_overrides`] with `std::env::var` at its edge, tests pass a map.

use super::SkylineConfig;

/// API key variables, first present wins
pub const API_KEY_VARS: [&str; 2] = ["SKYLINE_API_KEY", "ANTHROPIC_API_KEY"];
pub const MODEL_VAR: &str = "SKYLINE_MODEL";
pub const REGION_VAR: &str = "SKYLINE_REGION";
pub const IMAGE_VAR: &str = "SKYLINE_IMAGE";

/// Apply overrides from a variable lookup
pub fn apply_env_overrides<F>(config: &mut SkylineConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(api_key) = API_KEY_VARS.iter().find_map(|name| non_empty(*name)) {
        config.inference.api_key = Some(api_key);
    }
    if let Some(model) = non_empty(MODEL_VAR) {
        config.inference.model = model;
    }
    if let Some(region) = non_empty(REGION_VAR) {
        config.deployment.region = region;
    }
    if let Some(image) = non_empty(IMAGE_VAR) {
        config.deployment.image = image;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = SkylineConfig::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                ("ANTHROPIC_API_KEY", "sk-env"),
                ("SKYLINE_REGION", "eu-west-1"),
                ("SKYLINE_IMAGE", "registry/app:1.2"),
            ]),
        );
        assert_eq!(config.inference.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.deployment.region, "eu-west-1");
        assert_eq!(config.deployment.image, "registry/app:1.2");
        assert_eq!(config.inference.model, "claude-3-5-sonnet-latest");
    }

    #[test]
    fn test_skyline_key_takes_precedence_and_blanks_are_ignored() {
        let mut config = SkylineConfig::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                ("SKYLINE_API_KEY", "sk-skyline"),
                ("ANTHROPIC_API_KEY", "sk-anthropic"),
                ("SKYLINE_MODEL", "  "),
            ]),
        );
        assert_eq!(config.inference.api_key.as_deref(), Some("sk-skyline"));
        assert_eq!(config.inference.model, "claude-3-5-sonnet-latest");
    }
}
