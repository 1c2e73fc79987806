//! Static-site page conversion.
//!
//! Each manifest post becomes `<slug>.html` in the output directory: a TOML
//! front matter block followed by the post's HTML, untouched. Generated SEO
//! metadata is merged in when a response file is available.

mod converter;
mod front_matter;
mod output;

use std::path::PathBuf;

pub use converter::Converter;
pub use front_matter::FrontMatterError;

use crate::manifest::ManifestError;
use crate::seo::SeoError;

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("SEO response error: {0}")]
    Seo(#[from] SeoError),

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("front matter error: {0}")]
    FrontMatter(#[from] FrontMatterError),
}
