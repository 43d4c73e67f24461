//! End-to-end pass: scan, classify, render, report, prepare review

use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{info, instrument};

use crate::classifier::Classifier;
use crate::config::DeploymentParams;
use crate::error::SkylineResult;
use crate::render::{self, RenderedArtifact};
use crate::report::AnalysisReport;
use crate::review::{ReviewCollaborator, ReviewReceipt, ReviewRequest};
use crate::scanner::{ArtifactScanner, ScanConfig};
use crate::signature::ProjectSignature;

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub signature: ProjectSignature,
    pub artifacts: Vec<RenderedArtifact>,
    pub report_markdown: String,
    pub summary_json: String,
    pub review_request: ReviewRequest,
}

/// Single-pass analysis pipeline
pub struct Pipeline {
    classifier: Box<dyn Classifier>,
    params: DeploymentParams,
    scan_config: ScanConfig,
}

impl Pipeline {
    /// Create a pipeline with a classification strategy
    pub fn new(classifier: impl Classifier + 'static, params: DeploymentParams) -> Self {
        Self::from_boxed(Box::new(classifier), params)
    }

    /// Create a pipeline from a strategy chosen at runtime
    pub fn from_boxed(classifier: Box<dyn Classifier>, params: DeploymentParams) -> Self {
        Self {
            classifier,
            params,
            scan_config: ScanConfig::default(),
        }
    }

    /// Override scan limits
    pub fn with_scan_config(mut self, scan_config: ScanConfig) -> Self {
        self.scan_config = scan_config;
        self
    }

    /// Deployment parameters in use
    pub fn params(&self) -> &DeploymentParams {
        &self.params
    }

    /// Scan and classify only
    #[instrument(skip(self, root), fields(root = %root.as_ref().display(), classifier = self.classifier.name()))]
    pub async fn classify(&self, root: impl AsRef<Path>) -> SkylineResult<ProjectSignature> {
        let artifacts = ArtifactScanner::new(root.as_ref())
            .with_config(self.scan_config.clone())
            .scan()?;
        info!(
            artifacts = artifacts.len(),
            skipped = artifacts.stats().skipped,
            "Scan complete"
        );
        Ok(self.classifier.classify(&artifacts).await)
    }

    /// Run the whole pass stamped with the current time
    pub async fn run(&self, root: impl AsRef<Path>) -> SkylineResult<PipelineOutcome> {
        self.run_at(root, Utc::now()).await
    }

    /// Run the whole pass with an explicit timestamp
    pub async fn run_at(
        &self,
        root: impl AsRef<Path>,
        now: DateTime<Utc>,
    ) -> SkylineResult<PipelineOutcome> {
        let root = root.as_ref();
        let signature = self.classify(root).await?;
        info!(summary = %signature.summary(), "Classification complete");

        let artifacts = render::render_all(&signature, &self.params);

        let report = AnalysisReport::new(&signature, root.display().to_string(), now);
        let report_markdown = report.to_markdown();
        let summary_json = report.summary_json()?;
        info!("Report generated");

        let review_request = ReviewRequest::new(&signature, &self.params, &artifacts, now);

        Ok(PipelineOutcome {
            signature,
            artifacts,
            report_markdown,
            summary_json,
            review_request,
        })
    }

    /// Hand the outcome to a review collaborator
    pub async fn deliver(
        &self,
        outcome: &PipelineOutcome,
        collaborator: &dyn ReviewCollaborator,
    ) -> SkylineResult<ReviewReceipt> {
        let receipt = collaborator
            .submit(&outcome.review_request, &outcome.artifacts)
            .await?;
        info!(branch = %receipt.branch, location = %receipt.location, "Review delivered");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::HeuristicClassifier;
    use crate::error::SkylineError;
    use crate::review::MockReviewCollaborator;
    use crate::signature::Framework;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{"name":"web","dependencies":{"express":"^4.18.0"}}"#,
        )
        .unwrap();
        std::fs::write(temp.path().join("server.js"), "app.listen(process.env.PORT)").unwrap();
        temp
    }

    #[tokio::test]
    async fn test_run_produces_all_outputs() {
        let temp = project();
        let pipeline = Pipeline::new(HeuristicClassifier::new(), DeploymentParams::for_project("web"));
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let outcome = pipeline.run_at(temp.path(), now).await.unwrap();

        assert_eq!(outcome.signature.framework, Framework::Express);
        assert_eq!(outcome.artifacts.first().unwrap().relative_path, "terraform/main.tf");
        assert_eq!(outcome.review_request.branch, "infrastructure/web-20240102-030405");
        assert!(outcome.report_markdown.contains("express"));
        assert!(outcome.summary_json.contains("\"framework\": \"express\""));
    }

    #[tokio::test]
    async fn test_missing_root_is_scan_error() {
        let pipeline = Pipeline::new(HeuristicClassifier::new(), DeploymentParams::default());
        let err = pipeline.run("/definitely/not/here").await.unwrap_err();
        assert!(matches!(err, SkylineError::Scan(_)));
    }

    #[tokio::test]
    async fn test_deliver_hands_off_artifacts() {
        let temp = project();
        let pipeline = Pipeline::new(HeuristicClassifier::new(), DeploymentParams::for_project("web"));
        let outcome = pipeline.run(temp.path()).await.unwrap();
        let expected = outcome.artifacts.len();

        let mut collaborator = MockReviewCollaborator::new();
        collaborator
            .expect_submit()
            .withf(move |_, artifacts| artifacts.len() == expected)
            .times(1)
            .returning(|request, artifacts| {
                Ok(ReviewReceipt {
                    branch: request.branch.clone(),
                    location: "https://review.example/1".to_string(),
                    files_written: artifacts.len(),
                })
            });

        let receipt = pipeline.deliver(&outcome, &collaborator).await.unwrap();
        assert_eq!(receipt.files_written, expected);
        assert_eq!(receipt.branch, outcome.review_request.branch);
    }
}
