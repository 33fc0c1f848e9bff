use clap::{Parser, Subcommand};
use rst_common::with_tokio::tokio;

use prople_courierd::errors::CourierdError;
use prople_courierd::svc::{self, backups, logging, provision};

#[derive(Parser)]
#[command(name = "courierd")]
#[command(version = "0.1.0")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "provision")]
    #[command(about = "Provision the backup storage of the mediator")]
    Provision {
        #[arg(short, long, value_name = "FILE")]
        config: Option<String>,
    },

    #[command(name = "backups")]
    #[command(about = "List the stored backups of an agent, most recent first")]
    Backups {
        #[arg(short, long, value_name = "FILE")]
        config: Option<String>,

        #[arg(short, long, value_name = "BACKUP_ID")]
        #[arg(required = true)]
        backup_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CourierdError> {
    logging::setup();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Provision { config } => {
            let config = svc::resolve_config(config.to_owned())?;
            let _ = provision::run(&config).await?;
        }
        Commands::Backups { config, backup_id } => {
            let config = svc::resolve_config(config.to_owned())?;
            backups::run(&config, backup_id).await?;
        }
    }

    Ok(())
}
