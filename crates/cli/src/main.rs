//! swiftBite CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! swiftbite migrate
//!
//! # Grant the admin role to a registered identity
//! swiftbite user promote -e owner@example.com
//!
//! # List registered identities
//! swiftbite user list
//!
//! # Mint a one-hour bearer token (local testing)
//! swiftbite token issue -e diner@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user` - Inspect identities and grant the admin role
//! - `token issue` - Sign a bearer token with `ACCESS_TOKEN_SECRET`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "swiftbite")]
#[command(author, version, about = "swiftBite CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage identities
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List every registered identity
    List,
    /// Grant the admin role to a registered identity
    Promote {
        /// Identity email address
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Sign a one-hour bearer token for an email
    Issue {
        /// Email claim
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

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
        Commands::User { action } => match action {
            UserAction::List => commands::user::list().await?,
            UserAction::Promote { email } => commands::user::promote(&email).await?,
        },
        Commands::Token { action } => match action {
            TokenAction::Issue { email } => commands::token::issue(&email)?,
        },
    }
    Ok(())
}
