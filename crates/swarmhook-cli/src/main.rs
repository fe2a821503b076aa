//! swarmhook operator CLI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "swarmhook")]
#[command(about = "Inspect and exercise swarmhook configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(default_value = "./config.json")]
        path: PathBuf,
    },
    /// Show what a push of an image would deploy, without running anything
    Resolve {
        /// Path to the configuration file
        #[arg(long, env = "SWARMHOOK_CONFIG", default_value = "./config.json")]
        config: PathBuf,
        /// Image id, `repository:tag`
        image: String,
    },
    /// Run the deployment for an image once, as a push would
    Deploy {
        /// Path to the configuration file
        #[arg(long, env = "SWARMHOOK_CONFIG", default_value = "./config.json")]
        config: PathBuf,
        /// Directory to run the command from
        #[arg(long, env = "SWARMHOOK_WORKDIR")]
        workdir: Option<PathBuf>,
        /// Image id, `repository:tag`
        image: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            commands::validate(&path)?;
        }
        Commands::Resolve { config, image } => {
            commands::resolve(&config, &image)?;
        }
        Commands::Deploy {
            config,
            workdir,
            image,
        } => {
            commands::deploy(&config, workdir, &image).await?;
        }
    }

    Ok(())
}
