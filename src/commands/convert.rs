use crate::{ConvertArgs, config::Config, site::Converter};

pub async fn run(args: &ConvertArgs) -> Result<(), anyhow::Error> {
    let mut config = Config::load_from_arg(args.config_file.as_deref())?;
    config.site = config
        .site
        .with_flags(args.ignore_drafts, args.use_seo_title);

    if config.site.ignore_drafts {
        println!("Draft posts will be ignored.");
    } else {
        println!("Processing all posts (including drafts).");
    }

    let converter = Converter::new(&config.paths, &config.site, &config.seo.delimiter);
    let result = converter.convert()?;
    let report = &result.report;

    println!("\nSummary:");
    println!("Successfully created {} files.", report.succeeded);
    if report.skipped > 0 {
        println!("Ignored {} unpublished posts.", report.skipped);
    }
    println!(
        "Applied SEO metadata from {} responses ({} unusable).",
        result.seo_records,
        result.seo_skipped.len()
    );
    for skipped in &result.seo_skipped {
        println!("- skipped SEO response at {skipped}");
    }
    if report.failed() > 0 {
        println!("Encountered {} errors:", report.failed());
        for failure in &report.failures {
            println!("- {failure}");
        }
    }

    let display_output = result
        .output_dir
        .canonicalize()
        .unwrap_or(result.output_dir.clone());
    println!("Pages saved in: {}", display_output.display());

    Ok(())
}
