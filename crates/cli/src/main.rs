//! Inventory CLI - Database migrations and seed data.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! inv-cli migrate
//!
//! # Seed a fresh database with sample users, products and links
//! inv-cli seed
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "inv-cli")]
#[command(author, version, about = "Inventory service CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed a fresh database with sample data
    Seed,
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "inv_cli=info,inventory_cli=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await.map_err(|e| e.to_string()),
        Commands::Seed => commands::seed::run().await.map_err(|e| e.to_string()),
    };

    if let Err(message) = result {
        tracing::error!("{message}");
        std::process::exit(1);
    }
}
