//! Driftwatch - Main Entry Point

use clap::Parser;
use driftwatch::cli::{
    cmd_alert, cmd_concept_drift, cmd_data_drift, cmd_decide, cmd_evaluate, cmd_monitor, cmd_run,
    cmd_serve, cmd_train, Cli, Commands,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "driftwatch=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { skip_training } => cmd_run(&cli, *skip_training)?,
        Commands::Train => cmd_train(&cli)?,
        Commands::Evaluate => cmd_evaluate(&cli)?,
        Commands::DataDrift => cmd_data_drift(&cli)?,
        Commands::ConceptDrift => cmd_concept_drift(&cli)?,
        Commands::Monitor => cmd_monitor(&cli)?,
        Commands::Alert => cmd_alert(&cli)?,
        Commands::Decide => cmd_decide(&cli)?,
        Commands::Serve { host, port } => {
            let host = host.clone();
            let port = *port;
            cmd_serve(&cli, &host, port).await?
        }
    }

    Ok(())
}
