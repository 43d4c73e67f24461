//! Deployment parameters passed explicitly to renderers and collaborators

use serde::{Deserialize, Serialize};

/// Naming, placement and image settings for rendered infrastructure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentParams {
    /// Project name used for resource names and labels (DNS-1123 label)
    pub project_name: String,
    /// Environment tag (dev, staging, prod)
    pub environment: String,
    /// Cloud region
    pub region: String,
    /// Container image reference
    pub image: String,
    /// Public host name served by the ingress
    pub domain: String,
    /// Kubernetes namespace; defaults to the project name
    pub namespace: Option<String>,
    /// TLS certificate for the load balancer
    pub certificate_arn: Option<String>,
    /// Worker node instance type
    pub node_instance_type: String,
    /// Kubernetes control plane version
    pub kubernetes_version: String,
}

impl Default for DeploymentParams {
    fn default() -> Self {
        Self {
            project_name: "skyline-app".to_string(),
            environment: "dev".to_string(),
            region: "ap-northeast-2".to_string(),
            image: "skyline-app:latest".to_string(),
            domain: "app.example.com".to_string(),
            namespace: None,
            certificate_arn: None,
            node_instance_type: "t3.medium".to_string(),
            kubernetes_version: "1.29".to_string(),
        }
    }
}

impl DeploymentParams {
    /// Create parameters for a project, other fields at their defaults
    pub fn for_project(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Default::default()
        }
    }

    /// Effective namespace
    pub fn namespace(&self) -> &str {
        self.namespace
            .as_deref()
            .filter(|ns| !ns.trim().is_empty())
            .unwrap_or(&self.project_name)
    }

    /// Set the image
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the domain
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }
}
