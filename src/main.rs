use anyhow::Context;
use clap::Parser;
use soroswap_core::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    match cli.command {
        Commands::Quote(args) => {
            soroswap_core::cli::commands::quote::execute(args)
                .await
                .context("quote failed")?;
        }
        Commands::Tokens(args) => {
            soroswap_core::cli::commands::tokens::execute(args)
                .await
                .context("token listing failed")?;
        }
    }

    Ok(())
}
