//! Batch request generation.
//!
//! Turns every post in the manifest into one line of a batch API input file:
//! a chat completion request whose single user message is the prompt
//! template followed by the post's HTML.

mod generator;
mod request;

use std::path::PathBuf;

pub use generator::BatchGenerator;

use crate::manifest::ManifestError;

#[derive(thiserror::Error, Debug)]
pub enum BatchError {
    #[error("failed to read prompt template {path}: {source}")]
    Prompt {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to flush {path}: {source}")]
    Flush {
        path: PathBuf,
        source: std::io::Error,
    },
}
