//! Inference delegate
//!
//! Sends the scanned artifacts to a remote model and turns its reply into
//! signature parts. Every way this can go wrong is one [`FallbackReason`];
//! the caller decides what to do about it.

use thiserror::Error;
use tracing::{debug, instrument};

use super::endpoint::{EndpointError, InferenceEndpoint, InferenceRequest};
use super::parser::{ExtractError, extract_first_object};
use super::prompt::build_analysis_prompt;
use super::reshape::reshape_reply;
use crate::assembler::SignatureParts;
use crate::scanner::ArtifactSet;

/// Closed set of conditions that send classification back to the heuristic path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    #[error("endpoint unavailable: {0}")]
    EndpointUnavailable(String),

    #[error("endpoint rejected the request with status {status}")]
    EndpointRejected { status: u16 },

    #[error("endpoint returned an empty reply")]
    EmptyReply,

    #[error("reply contains no complete JSON object")]
    NoJsonObject,

    #[error("reply contains malformed JSON")]
    MalformedJson,
}

impl FallbackReason {
    /// Short stable label for logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::EndpointUnavailable(_) => "endpoint-unavailable",
            Self::EndpointRejected { .. } => "endpoint-rejected",
            Self::EmptyReply => "empty-reply",
            Self::NoJsonObject => "no-json-object",
            Self::MalformedJson => "malformed-json",
        }
    }
}

impl From<EndpointError> for FallbackReason {
    fn from(err: EndpointError) -> Self {
        match err {
            EndpointError::Unavailable(message) => Self::EndpointUnavailable(message),
            EndpointError::Rejected { status, .. } => Self::EndpointRejected { status },
        }
    }
}

impl From<ExtractError> for FallbackReason {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::NoObject => Self::NoJsonObject,
            ExtractError::Malformed => Self::MalformedJson,
        }
    }
}

/// Remote classification through an [`InferenceEndpoint`]
pub struct InferenceDelegate<E> {
    endpoint: E,
    model: String,
    max_tokens: u32,
}

impl<E: InferenceEndpoint> InferenceDelegate<E> {
    /// Create a new delegate
    pub fn new(endpoint: E, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            endpoint,
            model: model.into(),
            max_tokens,
        }
    }

    /// Ask the endpoint to classify `artifacts`
    #[instrument(skip(self, artifacts), fields(endpoint = self.endpoint.name(), model = %self.model))]
    pub async fn infer(&self, artifacts: &ArtifactSet) -> Result<SignatureParts, FallbackReason> {
        let request = InferenceRequest {
            model: self.model.clone(),
            prompt: build_analysis_prompt(artifacts),
            max_tokens: self.max_tokens,
        };
        debug!(prompt_chars = request.prompt.len(), "Sending inference request");

        let reply = self.endpoint.complete(request).await?;
        if reply.text.trim().is_empty() {
            return Err(FallbackReason::EmptyReply);
        }

        let object = extract_first_object(&reply.text)?;
        debug!(fields = object.len(), "Parsed inference reply");
        Ok(reshape_reply(&object, artifacts.complexity()))
    }
}
