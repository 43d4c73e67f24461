//! Review request handoff
//!
//! The engine only prepares the request. Branch creation, pushing and the
//! hosting provider's API live behind [`ReviewCollaborator`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::config::DeploymentParams;
use crate::error::{SkylineError, SkylineResult};
use crate::render::{ArtifactWriter, RenderedArtifact};
use crate::report::CostEstimate;
use crate::signature::ProjectSignature;

/// Branch the request targets unless overridden
pub const DEFAULT_BASE_BRANCH: &str = "dev";

/// File the directory reviewer writes the request description to
pub const REVIEW_REQUEST_FILE: &str = "REVIEW_REQUEST.md";

/// Everything a collaborator needs to open a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub title: String,
    pub branch: String,
    pub base_branch: String,
    pub labels: Vec<String>,
    pub commit_message: String,
    pub body: String,
    /// Relative paths of the artifacts under review
    pub files: Vec<String>,
}

impl ReviewRequest {
    /// Build a request for rendered artifacts
    pub fn new(
        signature: &ProjectSignature,
        params: &DeploymentParams,
        artifacts: &[RenderedArtifact],
        created_at: DateTime<Utc>,
    ) -> Self {
        let files: Vec<String> = artifacts.iter().map(|a| a.relative_path.clone()).collect();
        Self {
            title: format!(
                "Infrastructure for {} ({})",
                params.project_name, signature.framework
            ),
            branch: branch_name(&params.project_name, created_at),
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            labels: vec![
                "infrastructure".to_string(),
                "generated".to_string(),
                params.environment.clone(),
            ],
            commit_message: commit_message(signature, params),
            body: body(signature, params, &files),
            files,
        }
    }

    /// Target a different base branch
    pub fn with_base_branch(mut self, base: impl Into<String>) -> Self {
        self.base_branch = base.into();
        self
    }
}

/// `infrastructure/<project>-<YYYYmmdd-HHMMSS>`
pub fn branch_name(project: &str, created_at: DateTime<Utc>) -> String {
    format!(
        "infrastructure/{}-{}",
        project,
        created_at.format("%Y%m%d-%H%M%S")
    )
}

fn commit_message(signature: &ProjectSignature, params: &DeploymentParams) -> String {
    format!(
        "Add generated infrastructure for {}\n\nFramework: {}\nDatabase: {}\nReplicas: {}\nMemory limit: {}\n",
        params.project_name,
        signature.framework,
        if signature.database.required {
            signature.database.effective_kind().name()
        } else {
            "none"
        },
        signature.resources.replicas,
        signature.resources.memory_limit,
    )
}

fn body(signature: &ProjectSignature, params: &DeploymentParams, files: &[String]) -> String {
    let costs = CostEstimate::for_signature(signature);
    let mut out = String::new();
    out.push_str(&format!("## Infrastructure for `{}`\n\n", params.project_name));
    out.push_str(&format!(
        "Environment `{}` in `{}`, served at `{}`.\n\n",
        params.environment, params.region, params.domain
    ));
    out.push_str("### Analysis\n\n```\n");
    out.push_str(&signature.summary());
    out.push_str("\n```\n\n");
    out.push_str("### Files\n\n");
    for file in files {
        out.push_str(&format!("- `{file}`\n"));
    }
    out.push_str(&format!("\n### Estimated cost\n\n~${} per month\n\n", costs.total()));
    out.push_str("### Before merging\n\n");
    out.push_str("1. Review the Terraform plan for `terraform/`\n");
    if signature.database.required {
        out.push_str("2. Fill in the placeholders in `k8s/secret.yaml`\n");
        out.push_str("3. Point the deployment image at a published build\n");
    } else {
        out.push_str("2. Point the deployment image at a published build\n");
    }
    out
}

/// Where a submitted review can be found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewReceipt {
    pub branch: String,
    /// URL or directory of the review
    pub location: String,
    pub files_written: usize,
}

/// Opens a review for rendered artifacts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCollaborator: Send + Sync {
    /// Submit the request with its artifacts
    async fn submit(
        &self,
        request: &ReviewRequest,
        artifacts: &[RenderedArtifact],
    ) -> SkylineResult<ReviewReceipt>;
}

/// Stages a review in a local directory for a human to pick up
#[derive(Debug, Clone)]
pub struct DirectoryReviewer {
    root: PathBuf,
}

impl DirectoryReviewer {
    /// Create a reviewer writing under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn request_document(request: &ReviewRequest) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", request.title));
        out.push_str(&format!("- **Branch**: `{}`\n", request.branch));
        out.push_str(&format!("- **Base**: `{}`\n", request.base_branch));
        out.push_str(&format!("- **Labels**: {}\n\n", request.labels.join(", ")));
        out.push_str("## Commit message\n\n```\n");
        out.push_str(&request.commit_message);
        out.push_str("```\n\n");
        out.push_str(&request.body);
        out
    }
}

#[async_trait]
impl ReviewCollaborator for DirectoryReviewer {
    #[instrument(skip_all, fields(root = %self.root.display(), branch = %request.branch))]
    async fn submit(
        &self,
        request: &ReviewRequest,
        artifacts: &[RenderedArtifact],
    ) -> SkylineResult<ReviewReceipt> {
        if artifacts.is_empty() {
            return Err(SkylineError::review("nothing to review"));
        }

        let writer = ArtifactWriter::new(&self.root);
        let mut written = writer.write_all(artifacts)?;
        written.push(writer.write(&RenderedArtifact::new(
            REVIEW_REQUEST_FILE,
            Self::request_document(request),
        ))?);

        info!(files = written.len(), "Review request staged");
        Ok(ReviewReceipt {
            branch: request.branch.clone(),
            location: self.root.display().to_string(),
            files_written: written.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{SignatureAssembler, SignatureParts};
    use crate::signature::{
        AppType, BuildConfig, DatabaseRequirement, DependencyProfile, Framework, Provenance,
    };
    use chrono::TimeZone;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn signature() -> ProjectSignature {
        SignatureAssembler::new().assemble(
            SignatureParts {
                app_type: AppType::Nodejs,
                framework: Framework::Express,
                database: DatabaseRequirement::default(),
                resources: None,
                ports: BTreeSet::new(),
                environment: BTreeSet::new(),
                dependencies: DependencyProfile::default(),
                build_config: BuildConfig::default(),
                complexity: 5,
            },
            Provenance::Heuristic,
        )
    }

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 8, 7, 6).unwrap()
    }

    #[test]
    fn test_request_fields() {
        let artifacts = vec![RenderedArtifact::new("terraform/main.tf", "x")];
        let request = ReviewRequest::new(
            &signature(),
            &DeploymentParams::for_project("api"),
            &artifacts,
            created_at(),
        );

        assert_eq!(request.branch, "infrastructure/api-20240309-080706");
        assert_eq!(request.base_branch, "dev");
        assert_eq!(request.files, vec!["terraform/main.tf"]);
        assert!(request.title.contains("express"));
        assert!(request.commit_message.contains("Database: none"));
        assert!(request.body.contains("- `terraform/main.tf`"));

        let request = request.with_base_branch("main");
        assert_eq!(request.base_branch, "main");
    }

    #[tokio::test]
    async fn test_directory_reviewer_stages_files() {
        let temp = TempDir::new().unwrap();
        let artifacts = vec![
            RenderedArtifact::new("terraform/main.tf", "main"),
            RenderedArtifact::new("k8s/service.yaml", "service"),
        ];
        let request = ReviewRequest::new(
            &signature(),
            &DeploymentParams::for_project("api"),
            &artifacts,
            created_at(),
        );

        let receipt = DirectoryReviewer::new(temp.path())
            .submit(&request, &artifacts)
            .await
            .unwrap();

        assert_eq!(receipt.files_written, 3);
        assert_eq!(receipt.branch, request.branch);
        let doc = std::fs::read_to_string(temp.path().join(REVIEW_REQUEST_FILE)).unwrap();
        assert!(doc.starts_with("# Infrastructure for api"));
        assert!(temp.path().join("k8s/service.yaml").exists());
    }

    #[tokio::test]
    async fn test_empty_submission_is_rejected() {
        let temp = TempDir::new().unwrap();
        let request = ReviewRequest::new(
            &signature(),
            &DeploymentParams::default(),
            &[],
            created_at(),
        );
        let err = DirectoryReviewer::new(temp.path())
            .submit(&request, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, SkylineError::Review(_)));
    }
}
