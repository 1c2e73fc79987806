use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::config::{BatchConfig, PathsConfig};
use crate::manifest::{Post, read_manifest};
use crate::report::{ItemError, RunReport};

use super::BatchError;
use super::request::{BatchRequest, build_prompt};

/// Writes one batch request per manifest post.
pub struct BatchGenerator<'a> {
    paths: &'a PathsConfig,
    config: &'a BatchConfig,
}

impl<'a> BatchGenerator<'a> {
    pub fn new(paths: &'a PathsConfig, config: &'a BatchConfig) -> Self {
        Self { paths, config }
    }

    /// Generate the request file, replacing any previous one.
    ///
    /// Missing prompt, missing manifest and an uncreatable output file are
    /// fatal. Anything that fails for a single post is recorded in the report.
    pub fn generate(&self) -> Result<RunReport, BatchError> {
        let prompt = read_prompt(&self.paths.prompt)?;
        let posts = read_manifest(&self.paths.manifest)?;
        info!(posts = posts.len(), "read manifest");

        let requests_path = &self.paths.requests;
        let file = File::create(requests_path).map_err(|source| BatchError::Create {
            path: requests_path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        let report = self.write_requests(&prompt, &posts, &mut writer);

        writer.flush().map_err(|source| BatchError::Flush {
            path: requests_path.clone(),
            source,
        })?;

        Ok(report)
    }

    /// Write a request line for each post to `writer`, in manifest order.
    pub fn write_requests<W: Write>(
        &self,
        prompt: &str,
        posts: &[Post],
        writer: &mut W,
    ) -> RunReport {
        let mut report = RunReport::default();

        for post in posts {
            match self.write_request(prompt, post, writer) {
                Ok(()) => report.record_success(),
                Err(e) => report.record_failure(&post.post_id, e),
            }
        }

        report
    }

    fn write_request<W: Write>(
        &self,
        prompt: &str,
        post: &Post,
        writer: &mut W,
    ) -> Result<(), ItemError> {
        let html_path = self.paths.post_html(&post.post_id);
        let html = std::fs::read(&html_path).map_err(|source| ItemError::ReadHtml {
            path: html_path.clone(),
            source,
        })?;

        // Invalid UTF-8 becomes U+FFFD rather than failing the post
        let prompt = build_prompt(prompt, &String::from_utf8_lossy(&html));
        let request = BatchRequest::for_post(&post.post_id, prompt, self.config);
        let mut line = serde_json::to_vec(&request)?;
        line.push(b'\n');

        writer.write_all(&line).map_err(|source| ItemError::Write {
            path: self.paths.requests.clone(),
            source,
        })?;

        debug!(post_id = %post.post_id, bytes = line.len(), "wrote batch request");
        Ok(())
    }
}

/// Read the prompt template.
fn read_prompt(path: &Path) -> Result<String, BatchError> {
    std::fs::read_to_string(path).map_err(|source| BatchError::Prompt {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const MANIFEST: &str = "post_id,post_date,is_published,title\n\
                            1.first,2023-01-01,true,First\n\
                            2.missing,2023-01-02,true,Missing\n\
                            3.third,2023-01-03,false,Third\n";

    fn fixture(dir: &Path) -> PathsConfig {
        let paths = PathsConfig::default().resolve(dir);
        std::fs::create_dir_all(&paths.posts_dir).unwrap();
        std::fs::write(&paths.manifest, MANIFEST).unwrap();
        std::fs::write(&paths.prompt, "Write SEO metadata for:\n").unwrap();
        std::fs::write(paths.post_html("1.first"), "<p>one</p>\n").unwrap();
        std::fs::write(paths.post_html("3.third"), "<p>three</p>").unwrap();
        paths
    }

    #[test]
    fn test_generate_skips_missing_html() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixture(dir.path());
        let config = BatchConfig::default();

        let report = BatchGenerator::new(&paths, &config).generate().unwrap();
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].post_id, "2.missing");
        assert!(matches!(
            report.failures[0].error,
            ItemError::ReadHtml { .. }
        ));

        let output = std::fs::read_to_string(&paths.requests).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["custom_id"], "1.first");
        assert_eq!(lines[1]["custom_id"], "3.third");
        assert_eq!(
            lines[0]["body"]["messages"][0]["content"],
            "Write SEO metadata for:\n\n\n<p>one</p>"
        );
    }

    #[test]
    fn test_generate_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixture(dir.path());
        std::fs::write(&paths.requests, "stale\nstale\nstale\nstale\n").unwrap();

        BatchGenerator::new(&paths, &BatchConfig::default())
            .generate()
            .unwrap();

        let output = std::fs::read_to_string(&paths.requests).unwrap();
        assert_eq!(output.lines().count(), 2);
        assert!(!output.contains("stale"));
    }

    #[test]
    fn test_generate_uses_configured_model() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixture(dir.path());
        let config = BatchConfig {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 512,
            ..Default::default()
        };

        BatchGenerator::new(&paths, &config).generate().unwrap();

        let output = std::fs::read_to_string(&paths.requests).unwrap();
        let first: serde_json::Value =
            serde_json::from_str(output.lines().next().unwrap()).unwrap();
        assert_eq!(first["body"]["model"], "gpt-4o-mini");
        assert_eq!(first["body"]["max_tokens"], 512);
    }

    #[test]
    fn test_generate_missing_prompt_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixture(dir.path());
        std::fs::remove_file(&paths.prompt).unwrap();

        let err = BatchGenerator::new(&paths, &BatchConfig::default())
            .generate()
            .unwrap_err();
        assert!(matches!(err, BatchError::Prompt { .. }));
        assert!(!paths.requests.exists());
    }

    #[test]
    fn test_generate_missing_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixture(dir.path());
        std::fs::remove_file(&paths.manifest).unwrap();

        let err = BatchGenerator::new(&paths, &BatchConfig::default())
            .generate()
            .unwrap_err();
        assert!(matches!(err, BatchError::Manifest(_)));
    }

    #[test]
    fn test_generate_unwritable_output_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = fixture(dir.path());
        paths.requests = PathBuf::from(dir.path()).join("no-such-dir/requests.jsonl");

        let err = BatchGenerator::new(&paths, &BatchConfig::default())
            .generate()
            .unwrap_err();
        assert!(matches!(err, BatchError::Create { .. }));
    }

    #[test]
    fn test_write_requests_counts_n_minus_k() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathsConfig::default().resolve(dir.path());
        std::fs::create_dir_all(&paths.posts_dir).unwrap();

        let posts: Vec<Post> = (0..5)
            .map(|i| Post {
                post_id: format!("{i}.post"),
                post_date: String::new(),
                is_published: "true".to_string(),
                title: format!("Post {i}"),
            })
            .collect();
        for post in posts.iter().step_by(2) {
            std::fs::write(paths.post_html(&post.post_id), "<p/>").unwrap();
        }

        let config = BatchConfig::default();
        let mut out = Vec::new();
        let report = BatchGenerator::new(&paths, &config).write_requests("p", &posts, &mut out);

        assert_eq!(report.succeeded, 3);
        assert_eq!(report.failed(), 2);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_generate_accepts_invalid_utf8_html() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixture(dir.path());
        std::fs::write(paths.post_html("2.missing"), b"<p>caf\xe9</p>").unwrap();

        let report = BatchGenerator::new(&paths, &BatchConfig::default())
            .generate()
            .unwrap();
        assert_eq!(report.succeeded, 3);
        assert_eq!(report.failed(), 0);

        let output = std::fs::read_to_string(&paths.requests).unwrap();
        let second: serde_json::Value =
            serde_json::from_str(output.lines().nth(1).unwrap()).unwrap();
        assert_eq!(second["custom_id"], "2.missing");
        assert!(
            second["body"]["messages"][0]["content"]
                .as_str()
                .unwrap()
                .ends_with("<p>caf\u{FFFD}</p>")
        );
    }
}
