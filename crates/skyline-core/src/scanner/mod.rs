//! Artifact scanning
//!
//! Walks a project directory, locates build descriptors, runtime configuration
//! and a bounded sample of source files, and reads a bounded prefix of each.

pub mod models;
pub mod reader;
pub mod walker;

pub use models::{
    ArtifactKind, ArtifactSet, COMPLEXITY_PER_FILE, ScanConfig, ScanStats, ScannedArtifact,
};
pub use walker::ArtifactScanner;
