//! Signature assembly
//!
//! Both classification paths end here, so the invariants of
//! [`ProjectSignature`] hold no matter where the parts came from.

use std::collections::BTreeSet;
use tracing::debug;

use crate::detector::Detection;
use crate::estimator;
use crate::signature::{
    AppType, BuildConfig, DATABASE_ENV_VARS, DatabaseRequirement, DependencyProfile, Framework,
    MAX_REPLICAS, ProjectSignature, Provenance, ResourceTier,
};

/// Classification parts, possibly incomplete
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureParts {
    pub app_type: AppType,
    pub framework: Framework,
    pub database: DatabaseRequirement,
    /// `None` means size from the framework tier
    pub resources: Option<ResourceTier>,
    pub ports: BTreeSet<u16>,
    pub environment: BTreeSet<String>,
    pub dependencies: DependencyProfile,
    pub build_config: BuildConfig,
    pub complexity: usize,
}

impl From<Detection> for SignatureParts {
    fn from(detection: Detection) -> Self {
        Self {
            app_type: detection.app_type,
            framework: detection.framework,
            database: detection.database,
            resources: None,
            ports: detection.ports,
            environment: detection.environment,
            dependencies: detection.dependencies,
            build_config: detection.build_config,
            complexity: detection.complexity,
        }
    }
}

/// Builds immutable signatures from parts
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureAssembler;

impl SignatureAssembler {
    /// Create a new assembler
    pub fn new() -> Self {
        Self
    }

    /// Merge parts into a signature, substituting defaults where parts are
    /// missing or violate an invariant.
    pub fn assemble(&self, parts: SignatureParts, source: Provenance) -> ProjectSignature {
        let app_type = parts.app_type;

        let framework = if app_type.admits(parts.framework) {
            parts.framework
        } else {
            debug!(
                app_type = %app_type,
                framework = %parts.framework,
                "Framework outside candidate set, using default"
            );
            app_type.default_framework()
        };

        let resources = complete_resources(parts.resources, framework, parts.complexity);

        let mut ports: BTreeSet<u16> = parts.ports.into_iter().filter(|p| *p != 0).collect();
        if ports.is_empty() {
            ports.insert(framework.default_port());
        }

        let mut environment = parts.environment;
        if parts.database.required {
            environment.extend(DATABASE_ENV_VARS.iter().map(|name| name.to_string()));
        }

        let mut build_config = parts.build_config;
        if build_config.build_tool.is_none() {
            build_config.build_tool = app_type.build_tool();
        }

        ProjectSignature {
            app_type,
            framework,
            database: parts.database,
            resources,
            ports,
            environment,
            dependencies: parts.dependencies,
            build_config,
            confidence: source.confidence().clamp(0.0, 1.0),
            source,
        }
    }
}

/// Fill absent or unusable resource fields from the estimator
fn complete_resources(
    resources: Option<ResourceTier>,
    framework: Framework,
    complexity: usize,
) -> ResourceTier {
    let estimated = estimator::estimate(framework, complexity);
    let Some(given) = resources else {
        return estimated;
    };

    let pick = |value: String, fallback: String| {
        if value.trim().is_empty() {
            fallback
        } else {
            value
        }
    };

    ResourceTier {
        cpu_request: pick(given.cpu_request, estimated.cpu_request),
        cpu_limit: pick(given.cpu_limit, estimated.cpu_limit),
        memory_request: pick(given.memory_request, estimated.memory_request),
        memory_limit: pick(given.memory_limit, estimated.memory_limit),
        replicas: if given.replicas == 0 {
            estimated.replicas
        } else {
            given.replicas.min(MAX_REPLICAS)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{BuildTool, DatabaseKind};

    fn parts(app_type: AppType, framework: Framework) -> SignatureParts {
        SignatureParts {
            app_type,
            framework,
            database: DatabaseRequirement::default(),
            resources: None,
            ports: BTreeSet::new(),
            environment: BTreeSet::new(),
            dependencies: DependencyProfile::default(),
            build_config: BuildConfig::default(),
            complexity: 0,
        }
    }

    #[test]
    fn test_defaults_are_applied() {
        let signature = SignatureAssembler::new().assemble(
            parts(AppType::JavaMaven, Framework::SpringBoot),
            Provenance::Heuristic,
        );
        assert_eq!(signature.ports, BTreeSet::from([8080]));
        assert_eq!(signature.resources.memory_limit, "1.5Gi");
        assert_eq!(signature.build_config.build_tool, Some(BuildTool::Maven));
        assert_eq!(signature.confidence, 0.85);
        assert!(signature.environment.is_empty());
    }

    #[test]
    fn test_foreign_framework_is_replaced() {
        let signature = SignatureAssembler::new().assemble(
            parts(AppType::Python, Framework::React),
            Provenance::ExternalInference,
        );
        assert_eq!(signature.framework, Framework::Python);
        assert_eq!(signature.ports, BTreeSet::from([8080]));
        assert_eq!(signature.confidence, 0.95);
    }

    #[test]
    fn test_database_variables_are_unioned() {
        let mut input = parts(AppType::Nodejs, Framework::Express);
        input.environment.insert("API_KEY".to_string());
        input.database = DatabaseRequirement {
            required: true,
            kind: Some(DatabaseKind::Postgresql),
            ..Default::default()
        };

        let signature = SignatureAssembler::new().assemble(input, Provenance::Heuristic);
        for name in DATABASE_ENV_VARS {
            assert!(signature.environment.contains(name));
        }
        assert!(signature.environment.contains("API_KEY"));
    }

    #[test]
    fn test_partial_resources_are_completed() {
        let mut input = parts(AppType::Nodejs, Framework::React);
        input.ports.insert(0);
        input.resources = Some(ResourceTier {
            cpu_request: "300m".to_string(),
            cpu_limit: String::new(),
            memory_request: String::new(),
            memory_limit: "2Gi".to_string(),
            replicas: 0,
        });

        let signature = SignatureAssembler::new().assemble(input, Provenance::ExternalInference);
        assert_eq!(signature.resources.cpu_request, "300m");
        assert_eq!(signature.resources.cpu_limit, "200m");
        assert_eq!(signature.resources.memory_limit, "2Gi");
        assert_eq!(signature.resources.replicas, 2);
        assert_eq!(signature.ports, BTreeSet::from([3000]));
    }

    #[test]
    fn test_replicas_are_capped() {
        let mut input = parts(AppType::JavaMaven, Framework::SpringBoot);
        input.resources = Some(ResourceTier {
            cpu_request: String::new(),
            cpu_limit: String::new(),
            memory_request: String::new(),
            memory_limit: String::new(),
            replicas: u32::MAX,
        });

        let signature = SignatureAssembler::new().assemble(input, Provenance::ExternalInference);
        assert_eq!(signature.resources.replicas, MAX_REPLICAS);
        assert!(!signature.resources.cpu_request.is_empty());
    }
}
