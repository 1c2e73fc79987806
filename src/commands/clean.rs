use crate::{CleanArgs, config::Config};

pub async fn run(args: &CleanArgs) -> Result<(), anyhow::Error> {
    let config = Config::load_from_arg(args.config_file.as_deref())?;

    // Delete the generated batch request file
    let requests_path = &config.paths.requests;
    if requests_path.is_file() {
        if args.dry_run {
            println!("Would delete {}", requests_path.display());
        } else {
            tokio::fs::remove_file(requests_path).await?;
            println!("Deleted {}", requests_path.display());
        }
    }

    // Delete the generated pages folder
    let output_dir = &config.paths.output_dir;
    if output_dir.is_dir() {
        if args.dry_run {
            println!("Would delete {}", output_dir.display());
        } else {
            tokio::fs::remove_dir_all(output_dir).await?;
            println!("Deleted {}", output_dir.display());
        }
    }

    Ok(())
}
