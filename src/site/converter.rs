use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::{PathsConfig, SiteConfig};
use crate::manifest::{Post, read_manifest};
use crate::report::{ItemError, RunReport};
use crate::seo::{SeoResponses, SkippedLine, load_seo_responses};

use super::ConvertError;
use super::front_matter::{FrontMatter, FrontMatterRenderer, SeoFields};
use super::output::clean_or_create_dir;

#[derive(Debug)]
pub struct ConvertResult {
    pub output_dir: PathBuf,
    pub report: RunReport,
    /// Posts with SEO metadata available
    pub seo_records: usize,
    /// Response lines that produced no SEO metadata
    pub seo_skipped: Vec<SkippedLine>,
}

/// Converts exported posts into static-site pages.
pub struct Converter<'a> {
    paths: &'a PathsConfig,
    site: &'a SiteConfig,
    seo_delimiter: &'a str,
}

impl<'a> Converter<'a> {
    pub fn new(paths: &'a PathsConfig, site: &'a SiteConfig, seo_delimiter: &'a str) -> Self {
        Self {
            paths,
            site,
            seo_delimiter,
        }
    }

    pub fn convert(&self) -> Result<ConvertResult, ConvertError> {
        // Pipeline:
        // 1. Load SEO responses (optional file)
        // 2. Read the manifest
        // 3. Clear the output directory
        // 4. Render and write each post

        let seo = load_seo_responses(&self.paths.responses, self.seo_delimiter)?;
        if seo.is_empty() && self.site.use_seo_title {
            warn!("SEO titles requested but no SEO metadata is available");
        }

        let posts = read_manifest(&self.paths.manifest)?;
        info!(posts = posts.len(), "read manifest");

        let output_dir = self.paths.output_dir.clone();
        clean_or_create_dir(&output_dir).map_err(|source| ConvertError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        let renderer = FrontMatterRenderer::new()?;
        let report = self.convert_posts(&posts, &seo, &renderer);

        Ok(ConvertResult {
            output_dir,
            report,
            seo_records: seo.len(),
            seo_skipped: seo.skipped,
        })
    }

    /// Convert each post in manifest order. Failures are recorded, never fatal.
    pub fn convert_posts(
        &self,
        posts: &[Post],
        seo: &SeoResponses,
        renderer: &FrontMatterRenderer,
    ) -> RunReport {
        let mut report = RunReport::default();
        let mut claimed_slugs: HashSet<&str> = HashSet::new();

        for post in posts {
            if self.site.ignore_drafts && post.is_marked_unpublished() {
                debug!(post_id = %post.post_id, "ignoring unpublished post");
                report.record_skip();
                continue;
            }

            if claimed_slugs.contains(post.slug()) {
                report.record_failure(
                    &post.post_id,
                    ItemError::DuplicateSlug {
                        slug: post.slug().to_string(),
                    },
                );
                continue;
            }

            match self.convert_post(post, seo, renderer) {
                Ok(()) => {
                    claimed_slugs.insert(post.slug());
                    report.record_success();
                }
                Err(e) => report.record_failure(&post.post_id, e),
            }
        }

        report
    }

    fn convert_post(
        &self,
        post: &Post,
        seo: &SeoResponses,
        renderer: &FrontMatterRenderer,
    ) -> Result<(), ItemError> {
        let slug = post.slug();
        let input_path = self.paths.post_html(&post.post_id);
        let html = std::fs::read(&input_path).map_err(|source| ItemError::ReadHtml {
            path: input_path.clone(),
            source,
        })?;

        let seo = seo.get(&post.post_id);
        let title = match seo {
            Some(record) if self.site.use_seo_title && !record.title.is_empty() => &record.title,
            _ => &post.title,
        };

        let front_matter = renderer.render(&FrontMatter {
            date: &post.post_date,
            draft: post.is_draft(),
            title,
            weight: self.site.weight,
            markup: &self.site.markup,
            slug,
            seo: seo.map(|record| SeoFields {
                description: &record.description,
                keywords: &record.keywords,
            }),
            author: &self.site.author,
        })?;

        let mut content = front_matter.into_bytes();
        content.extend_from_slice(&html);

        let output_path = self.paths.output_dir.join(format!("{slug}.html"));
        std::fs::write(&output_path, content).map_err(|source| ItemError::Write {
            path: output_path.clone(),
            source,
        })?;

        debug!(post_id = %post.post_id, path = %output_path.display(), "wrote page");
        Ok(())
    }
}
