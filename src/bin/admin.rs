//! CLI administration tool for snaplink.
//!
//! Shortens URLs and inspects records directly against the database,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com/some/long/path
//!
//! # Shorten with a custom code
//! cargo run --bin admin -- shorten https://example.com --code promo
//!
//! # Show a record and its click count
//! cargo run --bin admin -- stats 2cf24db
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Read and validated exactly as the server does (see [`snaplink::config`]),
//! so generated codes match the server's. Relevant here:
//!
//! - `DATABASE_URL` or `DB_*` components (required)
//! - `BASE_URL` (optional): prefix for printed short URLs
//! - `CODE_LENGTH` (optional): length of generated codes
//!
//! The cache is not consulted. Records created here are cached by the server
//! on their first redirect.

use snaplink::application::services::UrlService;
use snaplink::config::{self, Config};
use snaplink::infrastructure::cache::NullCache;
use snaplink::infrastructure::persistence::PgUrlRepository;
use snaplink::utils::code_generator::validate_custom_code;
use snaplink::utils::extract_host::build_short_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Create a short URL
    Shorten {
        /// URL to shorten
        url: String,

        /// Custom short code
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Show statistics for a short code
    Stats {
        /// Short code to look up
        code: String,
    },

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
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Shorten { url, code } => shorten(&pool, &config, url, code).await?,
        Commands::Stats { code } => stats(&pool, &config, &code).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn url_service(pool: &PgPool, config: &Config) -> UrlService {
    UrlService::new(
        Arc::new(PgUrlRepository::new(Arc::new(pool.clone()))),
        Arc::new(NullCache::new()),
        config.url_service_settings(),
    )
}

/// Creates a short URL and prints the result.
async fn shorten(
    pool: &PgPool,
    config: &Config,
    url: String,
    code: Option<String>,
) -> Result<()> {
    println!("{}", "🔗 Shorten URL".bright_blue().bold());
    println!();

    if let Some(code) = &code {
        validate_custom_code(code).map_err(|e| anyhow::anyhow!("{}", e))?;
    }

    let record = url_service(pool, config)
        .create_short_url(url, code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| "http://localhost:5000".to_string());

    println!("  Code:      {}", record.short_code.bright_yellow().bold());
    println!("  Long URL:  {}", record.long_url.cyan());
    println!(
        "  Short URL: {}",
        build_short_url(&base_url, &record.short_code).bright_white()
    );
    println!(
        "  Created:   {}",
        record
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!();

    Ok(())
}

/// Displays the stored record for a short code.
async fn stats(pool: &PgPool, config: &Config, code: &str) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let record = url_service(pool, config)
        .get_url_stats(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let Some(record) = record else {
        println!("  {}", format!("No URL found for '{}'", code).yellow());
        println!();
        return Ok(());
    };

    let status = if record.is_expired() {
        "EXPIRED".red()
    } else {
        "ACTIVE".green()
    };

    println!("  Code:     {}", record.short_code.bright_yellow().bold());
    println!("  Long URL: {}", record.long_url.cyan());
    println!(
        "  Clicks:   {}",
        record.click_count.to_string().bright_white().bold()
    );
    println!(
        "  Created:  {}",
        record
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    match record.expires_at {
        Some(expires_at) => println!(
            "  Expires:  {} {}",
            expires_at.format("%Y-%m-%d %H:%M").to_string().bright_black(),
            status
        ),
        None => println!("  Expires:  {} {}", "never".bright_black(), status),
    }
    println!();

    Ok(())
}

/// Dispatches database commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => check_database(pool).await?,
    }

    Ok(())
}

/// Verifies the connection and reports whether the schema is in place.
async fn check_database(pool: &PgPool) -> Result<()> {
    println!("{}", "🔍 Checking database connection...".bright_blue());

    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Database query failed")?;

    println!("{}", "✅ Database connection OK".green().bold());

    let urls_table: Option<String> = sqlx::query_scalar("SELECT to_regclass('public.urls')::text")
        .fetch_one(pool)
        .await?;

    if urls_table.is_some() {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
            .fetch_one(pool)
            .await?;
        println!(
            "  URLs stored: {}",
            count.to_string().bright_white().bold()
        );
    } else {
        println!(
            "{}",
            "⚠️  Table 'urls' not found, start the server to run migrations".yellow()
        );
    }
    println!();

    Ok(())
}
