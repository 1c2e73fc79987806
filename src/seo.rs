//! Loading generated SEO metadata from a batch response file.
//!
//! Each line of the response file is one batch API result. The first choice's
//! message content is expected to hold title, description and keywords
//! separated by a delimiter (`----` by default). Lines that don't fit are
//! skipped and reported, never fatal.

use std::collections::HashMap;
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum SeoError {
    #[error("failed to read SEO responses {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

// =============================================================================
// Wire shape
// =============================================================================

/// One line of a batch response file. Only the fields we read are modelled.
#[derive(Debug, Deserialize)]
struct ResponseLine {
    custom_id: String,
    response: ResponseEnvelope,
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    body: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// =============================================================================
// Records
// =============================================================================

/// SEO metadata for one post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoRecord {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

impl SeoRecord {
    /// Split generated content into its three parts, trimming each.
    ///
    /// Returns `None` unless there are exactly three segments.
    pub fn parse(content: &str, delimiter: &str) -> Option<Self> {
        let parts: Vec<&str> = content.split(delimiter).collect();
        match parts.as_slice() {
            [title, description, keywords] => Some(Self {
                title: title.trim().to_string(),
                description: description.trim().to_string(),
                keywords: keywords.trim().to_string(),
            }),
            _ => None,
        }
    }
}

/// Why a response line was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The line is not a valid batch response object
    InvalidJson(String),
    /// The response carries no choice with content
    NoContent,
    /// The content split into the wrong number of segments
    Malformed { segments: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidJson(e) => write!(f, "invalid JSON: {e}"),
            SkipReason::NoContent => write!(f, "no message content"),
            SkipReason::Malformed { segments } => {
                write!(f, "expected 3 segments, found {segments}")
            }
        }
    }
}

/// A response line that did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the response file
    pub line: usize,
    pub custom_id: Option<String>,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.custom_id {
            Some(id) => write!(f, "line {} ({id}): {}", self.line, self.reason),
            None => write!(f, "line {}: {}", self.line, self.reason),
        }
    }
}

/// SEO metadata keyed by post identifier, plus the lines that were skipped.
#[derive(Debug, Default)]
pub struct SeoResponses {
    records: HashMap<String, SeoRecord>,
    pub skipped: Vec<SkippedLine>,
}

impl SeoResponses {
    pub fn get(&self, post_id: &str) -> Option<&SeoRecord> {
        self.records.get(post_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn skip(&mut self, line: usize, custom_id: Option<String>, reason: SkipReason) {
        warn!(
            line,
            custom_id = custom_id.as_deref().unwrap_or("-"),
            %reason,
            "skipping SEO response"
        );
        self.skipped.push(SkippedLine {
            line,
            custom_id,
            reason,
        });
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Load SEO responses from `path`.
///
/// The file is optional: if it does not exist an empty set is returned.
pub fn load_seo_responses(path: &Path, delimiter: &str) -> Result<SeoResponses, SeoError> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no SEO responses found, using manifest metadata only");
            return Ok(SeoResponses::default());
        }
        Err(source) => {
            return Err(SeoError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let responses =
        parse_seo_responses(BufReader::new(file), delimiter).map_err(|source| SeoError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        path = %path.display(),
        loaded = responses.len(),
        skipped = responses.skipped.len(),
        "loaded SEO responses"
    );
    Ok(responses)
}

/// Parse SEO responses from any buffered reader.
///
/// Only I/O failures are errors. Blank lines are ignored; every other line
/// either yields a record or an entry in [`SeoResponses::skipped`]. A later
/// line for the same post replaces an earlier one.
pub fn parse_seo_responses<R: BufRead>(
    reader: R,
    delimiter: &str,
) -> Result<SeoResponses, std::io::Error> {
    let mut responses = SeoResponses::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let parsed: ResponseLine = match serde_json::from_str(&line) {
            Ok(parsed) => parsed,
            Err(e) => {
                responses.skip(line_no, None, SkipReason::InvalidJson(e.to_string()));
                continue;
            }
        };

        let content = parsed
            .response
            .body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);
        let Some(content) = content else {
            responses.skip(line_no, Some(parsed.custom_id), SkipReason::NoContent);
            continue;
        };

        match SeoRecord::parse(&content, delimiter) {
            Some(record) => {
                responses.records.insert(parsed.custom_id, record);
            }
            None => {
                let segments = content.split(delimiter).count();
                responses.skip(
                    line_no,
                    Some(parsed.custom_id),
                    SkipReason::Malformed { segments },
                );
            }
        }
    }

    Ok(responses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_line(custom_id: &str, content: &str) -> String {
        serde_json::json!({
            "id": "batch_req_1",
            "custom_id": custom_id,
            "response": {
                "status_code": 200,
                "body": {
                    "choices": [
                        { "index": 0, "message": { "role": "assistant", "content": content } }
                    ]
                }
            }
        })
        .to_string()
    }

    fn parse(lines: &[String]) -> SeoResponses {
        parse_seo_responses(lines.join("\n").as_bytes(), "----").unwrap()
    }

    #[test]
    fn test_seo_record_parse() {
        let record =
            SeoRecord::parse(" A Title \n----\nA description.\n----\nrust, blogs ", "----")
                .unwrap();
        assert_eq!(record.title, "A Title");
        assert_eq!(record.description, "A description.");
        assert_eq!(record.keywords, "rust, blogs");
    }

    #[test]
    fn test_seo_record_parse_wrong_segment_count() {
        assert_eq!(SeoRecord::parse("only----two", "----"), None);
        assert_eq!(SeoRecord::parse("a----b----c----d", "----"), None);
        assert_eq!(SeoRecord::parse("no delimiter", "----"), None);
    }

    #[test]
    fn test_parse_seo_responses() {
        let responses = parse(&[
            response_line("1.first", "First----Desc one----k1, k2"),
            response_line("2.second", "Second----Desc two----k3"),
        ]);

        assert_eq!(responses.len(), 2);
        assert!(responses.skipped.is_empty());
        assert_eq!(responses.get("2.second").unwrap().title, "Second");
        assert_eq!(responses.get("3.third"), None);
    }

    #[test]
    fn test_parse_seo_responses_skips_malformed_content() {
        let responses = parse(&[
            response_line("1.first", "Only title----and description"),
            response_line("2.second", "Second----Desc----keys"),
        ]);

        assert_eq!(responses.len(), 1);
        assert!(responses.get("1.first").is_none());
        assert_eq!(
            responses.skipped,
            vec![SkippedLine {
                line: 1,
                custom_id: Some("1.first".to_string()),
                reason: SkipReason::Malformed { segments: 2 },
            }]
        );
    }

    #[test]
    fn test_parse_seo_responses_skips_invalid_json_and_empty_choices() {
        let responses = parse(&[
            "{not json".to_string(),
            String::new(),
            r#"{"custom_id":"4.x","response":{"body":{"choices":[]}}}"#.to_string(),
            response_line("5.ok", "T----D----K"),
        ]);

        assert_eq!(responses.len(), 1);
        assert_eq!(responses.skipped.len(), 2);
        assert!(matches!(
            responses.skipped[0].reason,
            SkipReason::InvalidJson(_)
        ));
        assert_eq!(responses.skipped[1].line, 3);
        assert_eq!(responses.skipped[1].reason, SkipReason::NoContent);
        assert_eq!(
            responses.skipped[1].to_string(),
            "line 3 (4.x): no message content"
        );
    }

    #[test]
    fn test_parse_seo_responses_last_line_wins() {
        let responses = parse(&[
            response_line("1.a", "Old----D----K"),
            response_line("1.a", "New----D----K"),
        ]);
        assert_eq!(responses.get("1.a").unwrap().title, "New");
    }

    #[test]
    fn test_parse_seo_responses_custom_delimiter() {
        let line = response_line("1.a", "T|||D|||K");
        let responses = parse_seo_responses(line.as_bytes(), "|||").unwrap();
        assert_eq!(responses.get("1.a").unwrap().keywords, "K");
    }

    #[test]
    fn test_load_seo_responses_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let responses =
            load_seo_responses(&dir.path().join("batch_output.jsonl"), "----").unwrap();
        assert!(responses.is_empty());
        assert!(responses.skipped.is_empty());
    }

    #[test]
    fn test_load_seo_responses_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch_output.jsonl");
        std::fs::write(
            &path,
            format!("{}\n", response_line("1.a", "T----D----K")),
        )
        .unwrap();

        let responses = load_seo_responses(&path, "----").unwrap();
        assert_eq!(responses.len(), 1);
    }
}
