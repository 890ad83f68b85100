//! Bookstore CLI - Database migrations and key management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bookstore migrate
//!
//! # Generate a session signing seed for BOOKSTORE_AUTH_KEY
//! bookstore keygen
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `keygen` - Print a fresh 32-byte signing seed as hex

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bookstore")]
#[command(author, version, about = "Bookstore CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Generate a session signing seed
    Keygen,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Keygen => commands::keygen::run()?,
    }
    Ok(())
}
