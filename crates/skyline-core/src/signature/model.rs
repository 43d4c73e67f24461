//! The project signature record

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::types::{
    AppType, BuildTool, DatabaseKind, DatabaseSize, Framework, Orm, Provenance,
};

/// Replica count above which an autoscaler is rendered
pub const AUTOSCALING_FLOOR: u32 = 2;

/// Upper bound on a replica count, whatever the classifier proposed
pub const MAX_REPLICAS: u32 = 20;

/// Connection variables every database-backed workload receives
pub const DATABASE_ENV_VARS: [&str; 5] = ["DB_HOST", "DB_PORT", "DB_NAME", "DB_USER", "DB_PASSWORD"];

/// Persistence requirements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseRequirement {
    /// Whether the application needs a database
    pub required: bool,
    /// Detected engine
    #[serde(rename = "type")]
    pub kind: Option<DatabaseKind>,
    /// Estimated data volume
    pub estimated_size: DatabaseSize,
    /// Persistence framework that implied the requirement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orm: Option<Orm>,
}

impl DatabaseRequirement {
    /// Engine to provision, mysql when the tree only showed an ORM
    pub fn effective_kind(&self) -> DatabaseKind {
        self.kind.unwrap_or(DatabaseKind::Mysql)
    }
}

/// Compute sizing for one workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTier {
    pub cpu_request: String,
    pub cpu_limit: String,
    pub memory_request: String,
    pub memory_limit: String,
    pub replicas: u32,
}

/// External collaborators the application talks to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyProfile {
    pub external_services: BTreeSet<String>,
    pub third_party_apis: BTreeSet<String>,
    pub security_requirements: BTreeSet<String>,
}

impl DependencyProfile {
    /// Whether a named external service was detected
    pub fn uses(&self, service: &str) -> bool {
        self.external_services.contains(service)
    }

    /// Whether nothing was detected at all
    pub fn is_empty(&self) -> bool {
        self.external_services.is_empty()
            && self.third_party_apis.is_empty()
            && self.security_requirements.is_empty()
    }
}

/// Build settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub build_tool: Option<BuildTool>,
    pub language_version: Option<String>,
    pub docker_required: bool,
}

/// Structured classification of a project's runtime requirements
///
/// Produced once by [`crate::assembler::SignatureAssembler`] and only read
/// afterwards. Serializes to the flat document downstream consumers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSignature {
    pub app_type: AppType,
    pub framework: Framework,
    pub database: DatabaseRequirement,
    pub resources: ResourceTier,
    pub ports: BTreeSet<u16>,
    pub environment: BTreeSet<String>,
    pub dependencies: DependencyProfile,
    pub build_config: BuildConfig,
    pub confidence: f32,
    pub source: Provenance,
}

impl ProjectSignature {
    /// Port the workload is addressed on (lowest declared port)
    pub fn primary_port(&self) -> u16 {
        // The assembler guarantees a non-empty set
        self.ports
            .iter()
            .next()
            .copied()
            .unwrap_or_else(|| self.framework.default_port())
    }

    /// Whether an autoscaler should be rendered
    pub fn needs_autoscaling(&self) -> bool {
        self.resources.replicas > AUTOSCALING_FLOOR
    }

    /// Same classification, ignoring provenance fields
    pub fn same_classification(&self, other: &Self) -> bool {
        self.app_type == other.app_type
            && self.framework == other.framework
            && self.database == other.database
            && self.resources == other.resources
            && self.ports == other.ports
            && self.environment == other.environment
            && self.dependencies == other.dependencies
            && self.build_config == other.build_config
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Application: {} ({}, {:.0}% confidence, {})",
            self.app_type,
            self.framework,
            self.confidence * 100.0,
            self.source
        ));

        if self.database.required {
            lines.push(format!(
                "Database: {} ({})",
                self.database.effective_kind(),
                self.database.estimated_size.name()
            ));
        } else {
            lines.push("Database: not required".to_string());
        }

        let ports: Vec<String> = self.ports.iter().map(|p| p.to_string()).collect();
        lines.push(format!("Ports: {}", ports.join(", ")));

        lines.push(format!(
            "Resources: {} replicas, cpu {}/{}, memory {}/{}",
            self.resources.replicas,
            self.resources.cpu_request,
            self.resources.cpu_limit,
            self.resources.memory_request,
            self.resources.memory_limit
        ));

        if !self.environment.is_empty() {
            lines.push(format!("Environment variables: {}", self.environment.len()));
        }

        if !self.dependencies.external_services.is_empty() {
            let services: Vec<&str> = self
                .dependencies
                .external_services
                .iter()
                .map(String::as_str)
                .collect();
            lines.push(format!("External services: {}", services.join(", ")));
        }

        if let Some(tool) = self.build_config.build_tool {
            match &self.build_config.language_version {
                Some(version) => lines.push(format!("Build: {} ({})", tool.name(), version)),
                None => lines.push(format!("Build: {}", tool.name())),
            }
        }

        lines.join("\n")
    }
}
