//! Inference endpoint abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
}

/// Raw completion text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceReply {
    pub text: String,
}

impl InferenceReply {
    /// Create a reply
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Why an endpoint could not produce a reply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// Transport failure, timeout or an undecodable response envelope
    #[error("Endpoint unavailable: {0}")]
    Unavailable(String),

    /// The endpoint answered with a non-success status
    #[error("Endpoint rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Remote model that turns a prompt into text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceEndpoint: Send + Sync {
    /// Endpoint name for logs
    fn name(&self) -> &'static str;

    /// Send one request; no retries are attempted
    async fn complete(&self, request: InferenceRequest) -> Result<InferenceReply, EndpointError>;
}
