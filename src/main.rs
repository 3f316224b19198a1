mod commands;
mod config;
mod models;
mod services;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::ConfigStore;

#[derive(Parser, Debug)]
#[command(
    name = "pickterm",
    version,
    about = "Warehouse fulfillment terminal for InvenTree-compatible backends"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List sales orders awaiting fulfillment
    Orders,
    /// Run an interactive fulfillment session for one sales order
    Fulfill {
        /// Primary key of the sales order
        order: i64,
    },
    /// Show or change terminal settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Print the current settings
    Show,
    /// Update the server URL and/or API token
    Set {
        /// Base URL of the inventory server
        #[arg(long)]
        server_url: Option<String>,
        /// API token; stored in the OS keychain or encrypted at rest
        #[arg(long)]
        api_token: Option<String>,
    },
    /// Check connectivity against the configured server
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pickterm=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = ConfigStore::default_location()?;

    match cli.command {
        Commands::Orders => {
            let client = commands::client_from_settings(&store.load()?)?;
            commands::orders::run(&client).await
        }
        Commands::Fulfill { order } => {
            let client = commands::client_from_settings(&store.load()?)?;
            commands::fulfill::run(client, order).await
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(&store),
            SettingsAction::Set {
                server_url,
                api_token,
            } => commands::settings::set(&store, server_url, api_token),
            SettingsAction::Test => commands::settings::test(&store).await,
        },
    }
}
