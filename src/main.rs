//! Binary entry point

use ames_ml::cli::{cmd_download, cmd_evaluate, cmd_run, cmd_train, Cli, Commands};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ames_ml=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Download { url } => cmd_download(&url)?,
        Commands::Train { config } => cmd_train(&config)?,
        Commands::Evaluate => cmd_evaluate()?,
        Commands::Run => cmd_run()?,
    }

    Ok(())
}
