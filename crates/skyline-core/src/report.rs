//! Human-readable analysis report and machine-readable summary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::signature::{AppType, Framework, ProjectSignature};

/// Control plane cost per month
pub const EKS_MONTHLY_COST: u32 = 73;
/// Cost per worker node per month
pub const NODE_MONTHLY_COST: u32 = 30;
/// Smallest database instance per month
pub const DATABASE_MONTHLY_COST: u32 = 25;
/// Smallest cache node per month
pub const CACHE_MONTHLY_COST: u32 = 15;
/// Worker nodes billed at minimum
pub const MIN_BILLED_NODES: u32 = 2;

/// Rough monthly cost breakdown in USD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub cluster: u32,
    pub nodes: u32,
    pub node_count: u32,
    pub database: u32,
    pub cache: u32,
}

impl CostEstimate {
    /// Estimate for a signature
    pub fn for_signature(signature: &ProjectSignature) -> Self {
        let node_count = signature.resources.replicas.max(MIN_BILLED_NODES);
        Self {
            cluster: EKS_MONTHLY_COST,
            nodes: node_count.saturating_mul(NODE_MONTHLY_COST),
            node_count,
            database: if signature.database.required { DATABASE_MONTHLY_COST } else { 0 },
            cache: if signature.dependencies.uses("redis") { CACHE_MONTHLY_COST } else { 0 },
        }
    }

    /// Total monthly cost
    pub fn total(&self) -> u32 {
        self.cluster
            .saturating_add(self.nodes)
            .saturating_add(self.database)
            .saturating_add(self.cache)
    }
}

/// Headline fields of the JSON summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryFields {
    pub app_type: AppType,
    pub framework: Framework,
    pub database_required: bool,
    pub replicas: u32,
    pub memory_limit: String,
    pub estimated_cost: u32,
}

/// What to provision and tune
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub terraform_modules: Vec<String>,
    pub k8s_resources: Vec<String>,
    pub optimizations: Vec<String>,
}

/// Machine-readable analysis summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub timestamp: DateTime<Utc>,
    pub repo_path: String,
    pub summary: SummaryFields,
    pub recommendations: Recommendations,
}

/// Report generator for one analysis
#[derive(Debug, Clone)]
pub struct AnalysisReport<'a> {
    signature: &'a ProjectSignature,
    repo_path: String,
    generated_at: DateTime<Utc>,
}

impl<'a> AnalysisReport<'a> {
    /// Create a report; the timestamp is supplied so output stays reproducible
    pub fn new(
        signature: &'a ProjectSignature,
        repo_path: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            signature,
            repo_path: repo_path.into(),
            generated_at,
        }
    }

    /// Cost breakdown
    pub fn costs(&self) -> CostEstimate {
        CostEstimate::for_signature(self.signature)
    }

    /// Terraform modules the rendered configuration enables
    pub fn terraform_modules(&self) -> Vec<String> {
        let mut modules = vec!["vpc".to_string(), "eks".to_string()];
        if self.signature.database.required {
            modules.push("rds".to_string());
        }
        if self.signature.dependencies.uses("redis") {
            modules.push("elasticache".to_string());
        }
        modules
    }

    /// Kubernetes resources the rendered manifests contain
    pub fn k8s_resources(&self) -> Vec<String> {
        let mut resources: Vec<String> = ["namespace", "deployment", "service", "ingress", "configmap"]
            .iter()
            .map(|r| r.to_string())
            .collect();
        if self.signature.database.required {
            resources.push("secret".to_string());
        }
        if self.signature.needs_autoscaling() {
            resources.push("hpa".to_string());
        }
        resources
    }

    /// Short optimization keys
    pub fn optimizations(&self) -> Vec<String> {
        let mut items = vec!["monitoring".to_string(), "logging".to_string()];
        if self.is_jvm_sized() {
            items.push("jvm_tuning".to_string());
        }
        if self.signature.database.required {
            items.push("database_read_replica".to_string());
        }
        if self.signature.dependencies.uses("redis") {
            items.push("cache_cluster_mode".to_string());
        }
        items
    }

    fn is_jvm_sized(&self) -> bool {
        matches!(
            self.signature.resources.memory_limit.as_str(),
            "1.5Gi" | "2Gi"
        ) && matches!(
            self.signature.app_type,
            AppType::JavaMaven | AppType::JavaGradle
        )
    }

    /// JSON summary
    pub fn summary(&self) -> AnalysisSummary {
        let signature = self.signature;
        AnalysisSummary {
            timestamp: self.generated_at,
            repo_path: self.repo_path.clone(),
            summary: SummaryFields {
                app_type: signature.app_type,
                framework: signature.framework,
                database_required: signature.database.required,
                replicas: signature.resources.replicas,
                memory_limit: signature.resources.memory_limit.clone(),
                estimated_cost: self.costs().total(),
            },
            recommendations: Recommendations {
                terraform_modules: self.terraform_modules(),
                k8s_resources: self.k8s_resources(),
                optimizations: self.optimizations(),
            },
        }
    }

    /// Pretty-printed JSON summary
    pub fn summary_json(&self) -> crate::error::SkylineResult<String> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }

    /// Markdown report
    pub fn to_markdown(&self) -> String {
        let sig = self.signature;
        let res = &sig.resources;
        let mut out = String::new();

        out.push_str("# Application Analysis Report\n\n");
        out.push_str(&format!("**Repository**: `{}`  \n", self.repo_path));
        out.push_str(&format!(
            "**Generated**: {}  \n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&format!(
            "**Classification**: {} ({:.0}% confidence)\n\n",
            sig.source,
            sig.confidence * 100.0
        ));

        out.push_str("## Application\n\n");
        out.push_str(&format!("- **Type**: {}\n", sig.app_type));
        out.push_str(&format!("- **Framework**: {}\n", sig.framework));
        out.push_str(&format!(
            "- **Build tool**: {}\n",
            sig.build_config.build_tool.map(|t| t.name()).unwrap_or("n/a")
        ));
        out.push_str(&format!(
            "- **Language version**: {}\n\n",
            sig.build_config.language_version.as_deref().unwrap_or("n/a")
        ));

        out.push_str("## Database\n\n");
        if sig.database.required {
            out.push_str("- **Required**: yes\n");
            out.push_str(&format!("- **Engine**: {}\n", sig.database.effective_kind()));
            if let Some(orm) = sig.database.orm {
                out.push_str(&format!("- **ORM**: {}\n", orm.name()));
            }
            out.push_str(&format!(
                "- **Estimated size**: {} ({})\n\n",
                sig.database.estimated_size.name(),
                sig.database.estimated_size.instance_class()
            ));
        } else {
            out.push_str("- **Required**: no\n\n");
        }

        out.push_str("## Network\n\n");
        let ports: Vec<String> = sig.ports.iter().map(|p| p.to_string()).collect();
        out.push_str(&format!("- **Ports**: {}\n", ports.join(", ")));
        out.push_str(&format!("- **Primary port**: {}\n", sig.primary_port()));
        out.push_str(&format!("- **Environment variables**: {}\n\n", sig.environment.len()));

        out.push_str("## Resources\n\n");
        out.push_str("| | request | limit |\n|---|---|---|\n");
        out.push_str(&format!("| cpu | {} | {} |\n", res.cpu_request, res.cpu_limit));
        out.push_str(&format!("| memory | {} | {} |\n\n", res.memory_request, res.memory_limit));
        out.push_str(&format!("Replicas: {}\n\n", res.replicas));

        out.push_str("## Terraform modules\n\n");
        for module in self.terraform_modules() {
            out.push_str(&format!("- {module}\n"));
        }
        out.push('\n');

        out.push_str("## Kubernetes resources\n\n");
        for resource in self.k8s_resources() {
            out.push_str(&format!("- {resource}\n"));
        }
        out.push('\n');

        out.push_str("## Environment variables\n\n");
        if sig.environment.is_empty() {
            out.push_str("- none detected\n");
        }
        for var in &sig.environment {
            out.push_str(&format!("- `{var}`\n"));
        }
        out.push('\n');

        out.push_str("## Dependencies\n\n");
        if sig.dependencies.is_empty() {
            out.push_str("- none detected\n");
        }
        for (heading, items) in [
            ("External services", &sig.dependencies.external_services),
            ("Third-party APIs", &sig.dependencies.third_party_apis),
            ("Security", &sig.dependencies.security_requirements),
        ] {
            if !items.is_empty() {
                let names: Vec<&str> = items.iter().map(String::as_str).collect();
                out.push_str(&format!("- **{heading}**: {}\n", names.join(", ")));
            }
        }
        out.push('\n');

        out.push_str("## Build\n\n");
        out.push_str(&format!(
            "- **Dockerfile**: {}\n\n",
            if sig.build_config.docker_required { "present" } else { "missing" }
        ));

        out.push_str("## Recommendations\n\n");
        for line in self.recommendation_lines() {
            out.push_str(&format!("- {line}\n"));
        }
        out.push('\n');

        let costs = self.costs();
        out.push_str("## Estimated monthly cost\n\n");
        out.push_str("| resource | USD / month |\n|---|---|\n");
        out.push_str(&format!("| EKS control plane | {} |\n", costs.cluster));
        out.push_str(&format!("| worker nodes ({}) | {} |\n", costs.node_count, costs.nodes));
        out.push_str(&format!("| database | {} |\n", costs.database));
        out.push_str(&format!("| redis cache | {} |\n", costs.cache));
        out.push_str(&format!("| **total** | **{}** |\n", costs.total()));

        out
    }

    fn recommendation_lines(&self) -> Vec<&'static str> {
        let sig = self.signature;
        let mut lines = Vec::new();
        if self.is_jvm_sized() {
            lines.push("Tune the JVM heap to the container memory limit");
        }
        if sig.resources.replicas >= 3 {
            lines.push("Spread replicas across availability zones with a pod disruption budget");
        }
        if sig.database.required {
            lines.push("Add a read replica once read traffic grows");
            lines.push("Replace the placeholder values in k8s/secret.yaml before applying");
        }
        if sig.dependencies.uses("redis") {
            lines.push("Consider Redis cluster mode for cache throughput");
        }
        if !sig.build_config.docker_required {
            lines.push("Add a Dockerfile so the image referenced by the deployment can be built");
        }
        lines.push("Set up metrics and log collection for the cluster");
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{SignatureAssembler, SignatureParts};
    use crate::signature::{
        BuildConfig, DatabaseKind, DatabaseRequirement, DependencyProfile, Provenance,
    };
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn spring_signature(complexity: usize) -> ProjectSignature {
        SignatureAssembler::new().assemble(
            SignatureParts {
                app_type: AppType::JavaMaven,
                framework: Framework::SpringBoot,
                database: DatabaseRequirement {
                    required: true,
                    kind: Some(DatabaseKind::Mysql),
                    ..Default::default()
                },
                resources: None,
                ports: BTreeSet::new(),
                environment: BTreeSet::new(),
                dependencies: DependencyProfile {
                    external_services: ["redis".to_string()].into_iter().collect(),
                    ..Default::default()
                },
                build_config: BuildConfig::default(),
                complexity,
            },
            Provenance::Heuristic,
        )
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_cost_model() {
        let sig = spring_signature(500);
        let costs = CostEstimate::for_signature(&sig);
        assert_eq!(costs.node_count, 3);
        assert_eq!(costs.total(), 73 + 90 + 25 + 15);

        let small = spring_signature(10);
        assert_eq!(CostEstimate::for_signature(&small).total(), 73 + 60 + 25 + 15);
    }

    #[test]
    fn test_cost_model_saturates() {
        let mut sig = spring_signature(10);
        sig.resources.replicas = u32::MAX;
        let costs = CostEstimate::for_signature(&sig);
        assert_eq!(costs.nodes, u32::MAX);
        assert_eq!(costs.total(), u32::MAX);
    }

    #[test]
    fn test_summary_json_shape() {
        let sig = spring_signature(500);
        let report = AnalysisReport::new(&sig, "/repo", at());
        let value: serde_json::Value =
            serde_json::from_str(&report.summary_json().unwrap()).unwrap();

        assert_eq!(value["summary"]["app_type"], "java-maven");
        assert_eq!(value["summary"]["framework"], "spring-boot");
        assert_eq!(value["summary"]["replicas"], 3);
        assert_eq!(value["summary"]["estimated_cost"], 203);
        assert_eq!(
            value["recommendations"]["terraform_modules"],
            serde_json::json!(["vpc", "eks", "rds", "elasticache"])
        );
        assert!(
            value["recommendations"]["optimizations"]
                .as_array()
                .unwrap()
                .contains(&serde_json::json!("jvm_tuning"))
        );
    }

    #[test]
    fn test_markdown_sections() {
        let sig = spring_signature(10);
        let markdown = AnalysisReport::new(&sig, "/repo", at()).to_markdown();
        assert!(markdown.contains("**Generated**: 2024-05-01 12:00:00 UTC"));
        assert!(markdown.contains("- **Engine**: mysql"));
        assert!(markdown.contains("| **total** | **173** |"));
        assert!(!markdown.contains("- hpa"));
        assert!(markdown.contains("- secret"));
    }
}
