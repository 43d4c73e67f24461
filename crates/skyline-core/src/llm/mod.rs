//! Remote model classification
//!
//! The delegate builds a prompt from scanned artifacts, sends it through an
//! [`InferenceEndpoint`], pulls the first JSON object out of the reply and
//! reshapes it into signature parts.

pub mod anthropic;
pub mod delegate;
pub mod endpoint;
pub mod parser;
pub mod prompt;
pub mod reshape;
pub mod sanitize;

pub use anthropic::AnthropicEndpoint;
pub use delegate::{FallbackReason, InferenceDelegate};
pub use endpoint::{EndpointError, InferenceEndpoint, InferenceReply, InferenceRequest};

#[cfg(test)]
pub use endpoint::MockInferenceEndpoint;
