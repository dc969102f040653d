use anyhow::Result;
use clap::Parser;
use item_batch::cli::{
    execute_list_command, execute_process_command, execute_seed_command, Cli, Commands,
    ProcessConfig, SeedConfig,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // ログは stderr、レポートは stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed {
            store,
            count,
            status,
        } => {
            execute_seed_command(SeedConfig {
                store,
                count,
                status,
            })
            .await?;
        }
        Commands::List { store } => {
            execute_list_command(store).await?;
        }
        Commands::Process {
            store,
            workers,
            deadline_ms,
            preset,
        } => {
            execute_process_command(ProcessConfig {
                store,
                workers,
                deadline_ms,
                preset,
            })
            .await?;
        }
    }

    Ok(())
}
