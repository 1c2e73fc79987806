//! Per-run outcome tracking.
//!
//! Fatal setup errors abort a run through each pipeline's own error type.
//! Everything that goes wrong for a single post lands here instead, so a run
//! always finishes with an accurate tally.

use std::fmt;
use std::path::PathBuf;

use tracing::warn;

use crate::site::FrontMatterError;

/// Why a single post could not be processed.
#[derive(thiserror::Error, Debug)]
pub enum ItemError {
    #[error("failed reading {path}: {source}")]
    ReadHtml {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to render front matter: {0}")]
    FrontMatter(#[from] FrontMatterError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("slug '{slug}' is already used by an earlier post")]
    DuplicateSlug { slug: String },
}

/// A post that failed, and why.
#[derive(Debug)]
pub struct ItemFailure {
    pub post_id: String,
    pub error: ItemError,
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.post_id, self.error)
    }
}

/// Tally of a pipeline run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Posts fully processed
    pub succeeded: usize,
    /// Posts deliberately left out (e.g. drafts when ignoring drafts)
    pub skipped: usize,
    /// Posts that failed, in manifest order
    pub failures: Vec<ItemFailure>,
}

impl RunReport {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Record a failed post and log it.
    pub fn record_failure(&mut self, post_id: impl Into<String>, error: impl Into<ItemError>) {
        let failure = ItemFailure {
            post_id: post_id.into(),
            error: error.into(),
        };
        warn!(post_id = %failure.post_id, error = %failure.error, "skipping post");
        self.failures.push(failure);
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}
