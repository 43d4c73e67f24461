//! Skyline Core Library
//!
//! Reads an application's source tree, classifies what it needs to run
//! (runtime, framework, persistence, ports, sizing) and renders Terraform
//! and Kubernetes configuration from that classification.
//!
//! The flow is strictly one way:
//!
//! ```text
//! scanner -> classifier (detector | llm delegate) -> estimator -> assembler
//!         -> render -> review collaborator
//! ```

pub mod assembler;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod error;
pub mod estimator;
pub mod llm;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod review;
pub mod scanner;
pub mod signature;

// Re-export commonly used types
pub use classifier::{Classifier, HeuristicClassifier, InferenceClassifier};
pub use config::{DeploymentParams, SkylineConfig};
pub use error::{SkylineError, SkylineResult};
pub use pipeline::{Pipeline, PipelineOutcome};
pub use render::{ArtifactWriter, RenderedArtifact};
pub use report::AnalysisReport;
pub use review::{DirectoryReviewer, ReviewCollaborator, ReviewReceipt, ReviewRequest};
pub use scanner::{ArtifactScanner, ArtifactSet, ScanConfig, ScannedArtifact};
pub use signature::{AppType, Framework, ProjectSignature, Provenance};
