use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod batch;
mod commands;
mod config;
mod manifest;
mod report;
mod seo;
mod site;
mod util;

#[derive(Parser)]
#[command(
    name = "blogport",
    about = "Turn a blog export into LLM batch requests and static-site pages"
)]
struct Args {
    /// The command to execute
    #[command(subcommand)]
    command: BlogportCommand,
}

#[derive(Parser)]
struct InitArgs {
    /// The directory to write blogport.yaml into
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(short, long, default_value = "false")]
    create: bool,

    /// Overwrite an existing config file
    #[arg(short, long, default_value = "false")]
    force: bool,
}

#[derive(Parser)]
struct BatchArgs {
    /// The path to the configuration file (default: blogport.yaml, optional)
    #[arg(short, long)]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct ConvertArgs {
    /// The path to the configuration file (default: blogport.yaml, optional)
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Skip posts whose is_published flag is "false"
    #[arg(long, default_value = "false")]
    ignore_drafts: bool,

    /// Use the generated SEO title instead of the original title when available
    #[arg(long, default_value = "false")]
    use_seo_title: bool,
}

#[derive(Parser)]
struct CleanArgs {
    /// The path to the configuration file (default: blogport.yaml, optional)
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Only print what would be deleted
    #[arg(short, long, default_value = "false")]
    dry_run: bool,
}

#[derive(Subcommand)]
enum BlogportCommand {
    /// Write a default blogport.yaml
    Init(InitArgs),

    /// Generate the batch request file for SEO metadata
    Batch(BatchArgs),

    /// Convert posts into static-site pages with front matter
    Convert(ConvertArgs),

    /// Delete generated request files and pages
    Clean(CleanArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        BlogportCommand::Init(args) => {
            commands::init::run(&args).await?;
        }
        BlogportCommand::Batch(args) => {
            commands::batch::run(&args).await?;
        }
        BlogportCommand::Convert(args) => {
            commands::convert::run(&args).await?;
        }
        BlogportCommand::Clean(args) => {
            commands::clean::run(&args).await?;
        }
    }

    Ok(())
}
