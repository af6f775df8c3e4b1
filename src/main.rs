use caseorder_core::{DateKey, DocumentStore, Planner};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{ConfigCommand, DishCommand, OrderCommand, ReceiveCommand, ShareCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "caseorder")]
#[command(version)]
#[command(about = "Plan the dishes for each day and share the order as text", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the dish catalog
    Dish(DishCommand),

    /// Order dishes for a day
    Order(OrderCommand),

    /// Print a day's order as shareable text
    Share(ShareCommand),

    /// Import shared text from a file or stdin
    Receive(ReceiveCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logs go to stderr so shared text on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caseorder=warn,caseorder_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    let command = match cli.command {
        Some(Commands::Config(cmd)) => return cmd.run(&config),
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    tracing::debug!("Data directory: {}", config.data_dir.value.display());
    let store = DocumentStore::open(config.data_dir.value.clone())?;
    let mut planner = Planner::open(store, DateKey::today())?;

    match command {
        Commands::Dish(cmd) => cmd.run(&mut planner, &config).await?,
        Commands::Order(cmd) => cmd.run(&mut planner, &config)?,
        Commands::Share(cmd) => cmd.run(&mut planner, &config)?,
        Commands::Receive(cmd) => cmd.run(&mut planner, &config)?,
        Commands::Config(cmd) => cmd.run(&config)?,
    }

    Ok(())
}
