//! Post manifest reading.
//!
//! The manifest is the `posts.csv` file of a blog export. Columns are located
//! by header name, so their order in the file does not matter, but all of
//! [`REQUIRED_COLUMNS`] must be present before any row is read.

use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::util::{extract_slug, invert_boolean};

/// Header names the manifest must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["post_id", "post_date", "is_published", "title"];

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    #[error("failed to open manifest {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read manifest: {0}")]
    Read(std::io::Error),

    #[error("failed to read manifest header: {0}")]
    Header(#[from] csv::Error),

    #[error("manifest is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
}

// =============================================================================
// Records
// =============================================================================

/// A single post as listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Unique identifier, also the HTML file stem
    pub post_id: String,
    /// Publication date, passed through verbatim
    pub post_date: String,
    /// Raw `is_published` value ("true"/"false", any case)
    pub is_published: String,
    pub title: String,
}

impl Post {
    /// URL slug for this post.
    pub fn slug(&self) -> &str {
        extract_slug(&self.post_id)
    }

    /// Whether the post should be rendered as a draft.
    pub fn is_draft(&self) -> bool {
        invert_boolean(&self.is_published)
    }

    /// Whether the manifest explicitly marks this post unpublished.
    ///
    /// An empty or unrecognised flag still renders as a draft but is not
    /// treated as an explicit "false".
    pub fn is_marked_unpublished(&self) -> bool {
        self.is_published.eq_ignore_ascii_case("false")
    }
}

/// Validated positions of the required columns in a manifest header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    post_id: usize,
    post_date: usize,
    is_published: usize,
    title: usize,
}

impl ColumnMap {
    /// Locate every required column by name, reporting all that are missing.
    pub fn from_headers(headers: &StringRecord) -> Result<Self, ManifestError> {
        let find = |name: &str| headers.iter().position(|h| h.trim_start() == name);

        let positions: Vec<Option<usize>> =
            REQUIRED_COLUMNS.iter().map(|&name| find(name)).collect();
        let missing: Vec<&'static str> = REQUIRED_COLUMNS
            .iter()
            .zip(&positions)
            .filter(|(_, pos)| pos.is_none())
            .map(|(name, _)| *name)
            .collect();

        match positions.as_slice() {
            [Some(post_id), Some(post_date), Some(is_published), Some(title)] => Ok(Self {
                post_id: *post_id,
                post_date: *post_date,
                is_published: *is_published,
                title: *title,
            }),
            _ => Err(ManifestError::MissingColumns(missing)),
        }
    }

    /// Project a data row onto a post. Returns `None` if the row is too short.
    fn post(&self, record: &StringRecord) -> Option<Post> {
        let field = |idx: usize| record.get(idx).map(|v| v.trim_start().to_string());

        Some(Post {
            post_id: field(self.post_id)?,
            post_date: field(self.post_date)?,
            is_published: field(self.is_published)?,
            title: field(self.title)?,
        })
    }
}

// =============================================================================
// Reading
// =============================================================================

/// Read the manifest at `path`.
pub fn read_manifest(path: &Path) -> Result<Vec<Post>, ManifestError> {
    let file = std::fs::File::open(path).map_err(|source| ManifestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(file)
}

/// Parse a manifest from any reader.
///
/// Rows are returned in file order. Reading stops at the first row that
/// fails to parse (typically a truncated trailing line), keeping every row
/// before it. Stopping anywhere but the last row is logged as a warning.
pub fn parse_manifest<R: Read>(mut reader: R) -> Result<Vec<Post>, ManifestError> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw).map_err(ManifestError::Read)?;
    let content = strip_space_before_quotes(&raw);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_slice());

    let columns = ColumnMap::from_headers(rdr.headers()?)?;

    let mut posts = Vec::new();
    let mut records = rdr.records();
    let mut row = 0;
    while let Some(record) = records.next() {
        row += 1;
        let error = match record {
            Ok(record) => match columns.post(&record) {
                Some(post) => {
                    posts.push(post);
                    continue;
                }
                None => "row is missing fields".to_string(),
            },
            Err(e) => e.to_string(),
        };

        if records.next().is_some() {
            warn!(row, %error, "stopping at malformed manifest row, later rows are ignored");
        } else {
            debug!(row, %error, "ignoring malformed trailing manifest row");
        }
        break;
    }

    debug!(count = posts.len(), "read manifest");
    Ok(posts)
}

/// Drop spaces and tabs between the start of a field and an opening quote.
///
/// With leading-space trimming, `a, "b, c"` is two fields. The csv reader
/// only recognises a quote as the very first byte of a field, so the spaces
/// are removed up front. Bytes inside quoted fields are left alone.
fn strip_space_before_quotes(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut i = 0;

    while i < input.len() {
        let b = input[i];

        if in_quotes {
            out.push(b);
            i += 1;
            if b == b'"' {
                if input.get(i) == Some(&b'"') {
                    out.push(b'"');
                    i += 1;
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        if at_field_start {
            at_field_start = false;
            let rest = &input[i..];
            let spaces = rest
                .iter()
                .take_while(|&&c| matches!(c, b' ' | b'\t'))
                .count();
            if rest.get(spaces) == Some(&b'"') {
                out.push(b'"');
                in_quotes = true;
                i += spaces + 1;
                continue;
            }
        }

        if matches!(b, b',' | b'\n' | b'\r') {
            at_field_start = true;
        }
        out.push(b);
        i += 1;
    }

    out
}
