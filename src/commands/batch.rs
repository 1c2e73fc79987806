use crate::{BatchArgs, batch::BatchGenerator, config::Config};

pub async fn run(args: &BatchArgs) -> Result<(), anyhow::Error> {
    let config = Config::load_from_arg(args.config_file.as_deref())?;

    let generator = BatchGenerator::new(&config.paths, &config.batch);
    let report = generator.generate()?;

    println!("\nSummary:");
    println!("Successfully processed {} posts.", report.succeeded);
    if report.failed() > 0 {
        println!("Encountered {} errors.", report.failed());
    }
    println!(
        "Batch requests written to {}",
        config.paths.requests.display()
    );

    Ok(())
}
