//! Signature matching
//!
//! Pure functions from an [`ArtifactSet`] to classification parts. Every
//! decision with precedence is a [`rules::RuleSet`]; extractors for ports,
//! environment and build settings collect rather than choose.

pub mod application;
pub mod build;
pub mod database;
pub mod dependencies;
pub mod environment;
pub mod ports;
pub mod rules;

use std::collections::BTreeSet;
use tracing::debug;

use crate::scanner::ArtifactSet;
use crate::signature::{AppType, BuildConfig, DatabaseRequirement, DependencyProfile, Framework};

pub use rules::{Evidence, Indicator, Rule, RuleSet};

/// Raw classification parts, before defaults and sizing are applied
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub app_type: AppType,
    pub framework: Framework,
    pub database: DatabaseRequirement,
    /// Declared ports only; may be empty
    pub ports: BTreeSet<u16>,
    /// Referenced variables only; database variables are added by the assembler
    pub environment: BTreeSet<String>,
    pub dependencies: DependencyProfile,
    pub build_config: BuildConfig,
    /// Complexity score of the scanned tree
    pub complexity: usize,
}

/// Rule-based matcher over scanned artifacts
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureMatcher;

impl SignatureMatcher {
    /// Create a new matcher
    pub fn new() -> Self {
        Self
    }

    /// Classify an artifact set. Never fails; an empty set yields `unknown`.
    pub fn detect(&self, artifacts: &ArtifactSet) -> Detection {
        let evidence = Evidence::new(artifacts);

        let app_type = application::detect_app_type(&evidence);
        let framework = application::detect_framework(&evidence, app_type);
        let database = database::detect_database(&evidence);
        let ports = ports::detect_ports(artifacts);
        let environment = environment::detect_environment(artifacts);
        let dependencies = dependencies::detect_dependencies(&evidence);
        let build_config = build::detect_build_config(artifacts, app_type);

        debug!(
            app_type = %app_type,
            framework = %framework,
            database = database.required,
            ports = ports.len(),
            "Matched signature rules"
        );

        Detection {
            app_type,
            framework,
            database,
            ports,
            environment,
            dependencies,
            build_config,
            complexity: artifacts.complexity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScannedArtifact;

    #[test]
    fn test_empty_set_is_unknown() {
        let detection = SignatureMatcher::new().detect(&ArtifactSet::new("/repo"));
        assert_eq!(detection.app_type, AppType::Unknown);
        assert_eq!(detection.framework, Framework::Unknown);
        assert!(!detection.database.required);
        assert!(detection.ports.is_empty());
        assert_eq!(detection.complexity, 0);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let set = ArtifactSet::from_artifacts(
            "/repo",
            [
                ScannedArtifact::config("package.json", r#"{"dependencies":{"express":"4","pg":"8"}}"#),
                ScannedArtifact::config(".env.example", "PORT=4000\nDATABASE_URL=postgres://db\n"),
            ],
        );
        let matcher = SignatureMatcher::new();
        let first = matcher.detect(&set);
        assert_eq!(first, matcher.detect(&set));
        assert_eq!(first.framework, Framework::Express);
        assert_eq!(first.ports, BTreeSet::from([4000]));
        assert!(first.database.required);
    }
}
