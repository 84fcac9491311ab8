//! Copydesk CLI - drive a running Copydesk server from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Check the server and which upstream services are configured
//! copydesk health
//!
//! # List catalog products, optionally filtered
//! copydesk products --search linen
//!
//! # Rewrite one description and write it back to Shopify
//! copydesk improve 8123456789 --save
//!
//! # Rewrite every product matching a search
//! copydesk batch --all --search mug
//! ```
//!
//! The server address comes from `--server` or `COPYDESK_SERVER`
//! (default `http://127.0.0.1:3000`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{ArgGroup, Parser, Subcommand};
use copydesk_core::ProductId;

mod api;
mod commands;

const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(name = "copydesk")]
#[command(author, version, about = "Copydesk command-line client")]
struct Cli {
    /// Base URL of the Copydesk server
    #[arg(long, env = "COPYDESK_SERVER", default_value = DEFAULT_SERVER, global = true)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show server status and upstream configuration
    Health,
    /// List catalog products
    Products {
        /// Only show products whose title or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Rewrite one product's description
    Improve {
        /// Product ID
        id: ProductId,

        /// Write the rewritten description back to Shopify
        #[arg(long)]
        save: bool,
    },
    /// Rewrite several descriptions in one request
    #[command(group(ArgGroup::new("targets").required(true).args(["all", "ids"])))]
    Batch {
        /// Every loaded product (narrowed by --search)
        #[arg(long)]
        all: bool,

        /// Comma-separated product IDs
        #[arg(long, value_delimiter = ',')]
        ids: Vec<ProductId>,

        /// Only include products whose title or description contains this text
        #[arg(short, long, requires = "all")]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "copydesk=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let client = api::ApiClient::connect(&cli.server).await?;

    match cli.command {
        Commands::Health => commands::health::run(&client).await?,
        Commands::Products { search } => {
            commands::products::run(&client, search.as_deref()).await?;
        }
        Commands::Improve { id, save } => commands::improve::run(&client, id, save).await?,
        Commands::Batch { all, ids, search } => {
            let target = if all {
                commands::batch::Target::All {
                    search: search.unwrap_or_default(),
                }
            } else {
                commands::batch::Target::Ids(ids)
            };
            commands::batch::run(&client, &target).await?;
        }
    }
    Ok(())
}
