//! CLI administration tool for url-shortener.
//!
//! Shortens and expands URLs directly against the database, inspects
//! fingerprints offline, and checks database connectivity.
//!
//! # Usage
//!
//! ```bash
//! # Show the fingerprint and first candidate code (no database needed)
//! cargo run --bin admin -- fingerprint https://example.com
//!
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com
//!
//! # Resolve a code
//! cargo run --bin admin -- expand G60jKicb00
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`
//!   (required for every command except `fingerprint`)

use url_shortener::application::services::{ShortenError, ShortenerService};
use url_shortener::config::Config;
use url_shortener::infrastructure::cache::ExpiringCache;
use url_shortener::infrastructure::persistence::{PgUrlRepository, connect_pool};
use url_shortener::infrastructure::storage::TieredStorage;
use url_shortener::utils::code_generator::{SLOT_COUNT, candidates, fingerprint};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing url-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the fingerprint and candidate codes for a URL
    Fingerprint {
        url: String,

        /// Number of candidate codes to list
        #[arg(short, long, default_value_t = 3)]
        candidates: usize,
    },

    /// Shorten a URL
    Shorten { url: String },

    /// Resolve a short code
    Expand { code: String },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fingerprint { url, candidates } => print_fingerprint(&url, candidates),
        Commands::Shorten { url } => {
            let (config, pool) = connect().await?;
            shorten(&shortener(&config, pool), &config.base_url, &url).await?;
        }
        Commands::Expand { code } => {
            let (config, pool) = connect().await?;
            expand(&shortener(&config, pool), &code).await?;
        }
        Commands::Db { action } => {
            let (_, pool) = connect().await?;
            handle_db_action(action, &pool).await?;
        }
    }

    Ok(())
}

/// Loads configuration and opens the database pool.
async fn connect() -> Result<(Config, PgPool)> {
    let config = Config::from_env()?;
    let pool = connect_pool(&config).await?;
    Ok((config, pool))
}

fn shortener(config: &Config, pool: PgPool) -> ShortenerService {
    let durable = Arc::new(PgUrlRepository::new(
        Arc::new(pool),
        config.db_query_timeout(),
    ));
    let storage = TieredStorage::new(Arc::new(ExpiringCache::new()), durable);

    ShortenerService::new(Arc::new(storage))
}

fn print_fingerprint(url: &str, count: usize) {
    println!("{}", "🔎 Fingerprint".bright_blue().bold());
    println!();
    println!("  URL:         {}", url.cyan());
    println!("  Fingerprint: {}", fingerprint(url).bright_yellow().bold());
    println!();
    println!(
        "{}",
        format!("Candidates (first {} of {}):", count.min(SLOT_COUNT), SLOT_COUNT).bright_white()
    );
    for (slot, code) in candidates(url).take(count).enumerate() {
        println!("  {:>4}  {}", slot, code.bright_green());
    }
    println!();
}

async fn shorten(service: &ShortenerService, base_url: &str, url: &str) -> Result<String> {
    match service.shorten(url).await {
        Ok(code) => {
            println!("{}", "✅ Shortened".green().bold());
            println!("  Code:      {}", code.bright_yellow().bold());
            println!("  Short URL: {}", service.short_url(base_url, &code).cyan());
            Ok(code)
        }
        Err(e) => {
            println!("{} {}", "❌ Failed:".red().bold(), e);
            Err(e.into())
        }
    }
}

/// Prints the URL stored under `code`. An unknown code is an error.
async fn expand(service: &ShortenerService, code: &str) -> Result<String> {
    match service.expand(code).await {
        Ok(long_url) => {
            println!("  {} → {}", code.bright_yellow(), long_url.cyan());
            Ok(long_url)
        }
        Err(ShortenError::NotFound) => {
            println!("{}", format!("⚠️  No URL stored under '{}'", code).yellow());
            anyhow::bail!("short code '{}' not found", code)
        }
        Err(e) => {
            println!("{} {}", "❌ Failed:".red().bold(), e);
            Err(e.into())
        }
    }
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let urls_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  URLs:       {}",
                urls_count.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
