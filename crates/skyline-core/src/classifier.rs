//! Classification strategies
//!
//! The caller picks a strategy; neither path branches on the other at runtime.
//! [`InferenceClassifier`] falls back to the heuristic path on any
//! [`FallbackReason`] and records that in the signature's provenance.

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::assembler::{SignatureAssembler, SignatureParts};
use crate::detector::SignatureMatcher;
use crate::llm::{FallbackReason, InferenceDelegate, InferenceEndpoint};
use crate::scanner::ArtifactSet;
use crate::signature::{ProjectSignature, Provenance};

/// Turns scanned artifacts into a signature
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Strategy name for logs
    fn name(&self) -> &str;

    /// Classify an artifact set; never fails
    async fn classify(&self, artifacts: &ArtifactSet) -> ProjectSignature;
}

/// Rule-based local classification
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier {
    matcher: SignatureMatcher,
    assembler: SignatureAssembler,
}

impl HeuristicClassifier {
    /// Create a new heuristic classifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify synchronously with an explicit provenance
    pub fn classify_as(&self, artifacts: &ArtifactSet, source: Provenance) -> ProjectSignature {
        let detection = self.matcher.detect(artifacts);
        self.assembler
            .assemble(SignatureParts::from(detection), source)
    }
}

#[async_trait]
impl Classifier for HeuristicClassifier {
    fn name(&self) -> &str {
        "heuristic"
    }

    #[instrument(skip(self, artifacts), fields(artifacts = artifacts.len()))]
    async fn classify(&self, artifacts: &ArtifactSet) -> ProjectSignature {
        let signature = self.classify_as(artifacts, Provenance::Heuristic);
        info!(
            app_type = %signature.app_type,
            framework = %signature.framework,
            "Heuristic classification complete"
        );
        signature
    }
}

/// Remote classification with heuristic fallback
pub struct InferenceClassifier<E> {
    delegate: InferenceDelegate<E>,
    fallback: HeuristicClassifier,
    assembler: SignatureAssembler,
}

impl<E: InferenceEndpoint> InferenceClassifier<E> {
    /// Create a new inference classifier
    pub fn new(endpoint: E, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            delegate: InferenceDelegate::new(endpoint, model, max_tokens),
            fallback: HeuristicClassifier::new(),
            assembler: SignatureAssembler::new(),
        }
    }

    /// Classify and report why the remote path was abandoned, if it was
    pub async fn classify_with_reason(
        &self,
        artifacts: &ArtifactSet,
    ) -> (ProjectSignature, Option<FallbackReason>) {
        match self.delegate.infer(artifacts).await {
            Ok(parts) => {
                let signature = self.assembler.assemble(parts, Provenance::ExternalInference);
                info!(
                    app_type = %signature.app_type,
                    framework = %signature.framework,
                    "External inference classification complete"
                );
                (signature, None)
            }
            Err(reason) => {
                warn!(
                    reason = reason.label(),
                    detail = %reason,
                    "External inference failed, falling back to heuristic classification"
                );
                let signature = self
                    .fallback
                    .classify_as(artifacts, Provenance::ExternalInferenceFallback);
                (signature, Some(reason))
            }
        }
    }
}

#[async_trait]
impl<E: InferenceEndpoint> Classifier for InferenceClassifier<E> {
    fn name(&self) -> &str {
        "external-inference"
    }

    #[instrument(skip(self, artifacts), fields(artifacts = artifacts.len()))]
    async fn classify(&self, artifacts: &ArtifactSet) -> ProjectSignature {
        self.classify_with_reason(artifacts).await.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{EndpointError, InferenceReply, MockInferenceEndpoint};
    use crate::scanner::ScannedArtifact;
    use crate::signature::{AppType, Framework};

    fn spring_boot() -> ArtifactSet {
        ArtifactSet::from_artifacts(
            "/repo",
            [ScannedArtifact::config(
                "pom.xml",
                "<artifactId>spring-boot-starter-web</artifactId>",
            )],
        )
    }

    fn endpoint(result: Result<InferenceReply, EndpointError>) -> MockInferenceEndpoint {
        let mut endpoint = MockInferenceEndpoint::new();
        endpoint.expect_name().return_const("mock");
        endpoint.expect_complete().return_once(move |_| result);
        endpoint
    }

    #[tokio::test]
    async fn test_heuristic_provenance() {
        let signature = HeuristicClassifier::new().classify(&spring_boot()).await;
        assert_eq!(signature.source, Provenance::Heuristic);
        assert_eq!(signature.confidence, 0.85);
        assert_eq!(signature.framework, Framework::SpringBoot);
    }

    #[tokio::test]
    async fn test_inference_provenance() {
        let classifier = InferenceClassifier::new(
            endpoint(Ok(InferenceReply::new(
                r#"{"app_type":"java-maven","framework":"spring-boot","resources":{"replicas":4}}"#,
            ))),
            "model",
            4000,
        );
        let (signature, reason) = classifier.classify_with_reason(&spring_boot()).await;

        assert!(reason.is_none());
        assert_eq!(signature.source, Provenance::ExternalInference);
        assert_eq!(signature.confidence, 0.95);
        assert_eq!(signature.app_type, AppType::JavaMaven);
        assert_eq!(signature.resources.replicas, 4);
        assert_eq!(signature.resources.memory_limit, "1.5Gi");
    }

    #[tokio::test]
    async fn test_fallback_matches_heuristic_except_provenance() {
        let artifacts = spring_boot();
        let heuristic = HeuristicClassifier::new().classify(&artifacts).await;

        let classifier = InferenceClassifier::new(
            endpoint(Err(EndpointError::Unavailable("connection refused".to_string()))),
            "model",
            4000,
        );
        let (fallback, reason) = classifier.classify_with_reason(&artifacts).await;

        assert!(matches!(reason, Some(FallbackReason::EndpointUnavailable(_))));
        assert_eq!(fallback.source, Provenance::ExternalInferenceFallback);
        assert_eq!(fallback.confidence, 0.85);
        assert!(fallback.same_classification(&heuristic));
    }
}
