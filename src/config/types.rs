//! Configuration type definitions.
//!
//! This module contains all the data structures used in blogport configuration files.
//! These types are pure data - no I/O or complex logic.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// =============================================================================
// Root config
// =============================================================================

/// The full blogport configuration.
///
/// Every section is optional in the file; missing keys fall back to the
/// defaults that match a plain Substack export unpacked in the current
/// directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub batch: BatchConfig,
    pub seo: SeoConfig,
    pub site: SiteConfig,
}

// =============================================================================
// Paths
// =============================================================================

/// Input and output locations, relative to the config file's directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// The CSV manifest of posts
    pub manifest: PathBuf,
    /// Directory holding `<post_id>.html` bodies
    pub posts_dir: PathBuf,
    /// Prompt template prepended to each post in a batch request
    pub prompt: PathBuf,
    /// Batch request file written by `batch`
    pub requests: PathBuf,
    /// Batch response file read by `convert` (optional on disk)
    pub responses: PathBuf,
    /// Directory the converted pages are written to
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("posts.csv"),
            posts_dir: PathBuf::from("posts"),
            prompt: PathBuf::from("prompt.txt"),
            requests: PathBuf::from("posts2upload.jsonl"),
            responses: PathBuf::from("batch_output.jsonl"),
            output_dir: PathBuf::from("hugohtml"),
        }
    }
}

impl PathsConfig {
    /// Resolve every relative path against `base_path`.
    pub fn resolve(&self, base_path: &Path) -> Self {
        let join = |path: &PathBuf| {
            if path.is_relative() {
                base_path.join(path)
            } else {
                path.clone()
            }
        };

        Self {
            manifest: join(&self.manifest),
            posts_dir: join(&self.posts_dir),
            prompt: join(&self.prompt),
            requests: join(&self.requests),
            responses: join(&self.responses),
            output_dir: join(&self.output_dir),
        }
    }

    /// Path of the HTML body for a post.
    pub fn post_html(&self, post_id: &str) -> PathBuf {
        self.posts_dir.join(format!("{post_id}.html"))
    }
}

// =============================================================================
// Batch requests
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Chat model requested for every line
    pub model: String,
    /// Completion token limit for every line
    pub max_tokens: u32,
    /// Endpoint path each request targets
    pub url: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1".to_string(),
            max_tokens: 2048,
            url: "/v1/chat/completions".to_string(),
        }
    }
}

// =============================================================================
// SEO responses
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    /// Separator between title, description and keywords in a response
    pub delimiter: String,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            delimiter: "----".to_string(),
        }
    }
}

// =============================================================================
// Site output
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Author written into every page's `[params]`
    pub author: String,
    /// Page weight
    pub weight: i64,
    /// Markup type the generator should treat the body as
    pub markup: String,
    /// Skip posts explicitly marked unpublished
    pub ignore_drafts: bool,
    /// Prefer the generated SEO title over the manifest title
    pub use_seo_title: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            author: "Manuel Delgado Tenorio".to_string(),
            weight: 10,
            markup: "text/html".to_string(),
            ignore_drafts: false,
            use_seo_title: false,
        }
    }
}

impl SiteConfig {
    /// Merge command line switches. A flag can turn an option on but never off.
    pub fn with_flags(mut self, ignore_drafts: bool, use_seo_title: bool) -> Self {
        self.ignore_drafts |= ignore_drafts;
        self.use_seo_title |= use_seo_title;
        self
    }
}
