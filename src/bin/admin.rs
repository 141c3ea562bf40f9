//! Command-line administration for hotlink.
//!
//! Issues and revokes the bearer tokens that give callers an owner identity,
//! and prints store statistics without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Issue a token for owner 42
//! cargo run --bin admin -- token create --owner 42 --name "CI pipeline"
//!
//! # List and revoke tokens
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "CI pipeline"
//!
//! # Store statistics and connectivity
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required)
//! - `TOKEN_SIGNING_SECRET` (required for `token create`; must match the server)

use hotlink::application::services::hash_token;
use hotlink::domain::repositories::{ApiToken, TokenRepository};
use hotlink::infrastructure::persistence::PgTokenRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about = "Administration tool for hotlink", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show link, visit and token totals
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a token that authenticates as an owner
    Create {
        /// Owner id recorded on links created with this token
        #[arg(short, long)]
        owner: i64,

        /// Token name (e.g., "CI pipeline")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));

    match action {
        TokenAction::Create {
            owner,
            name,
            token,
            yes,
        } => create_token(&repo, owner, name, token, yes).await,
        TokenAction::List => list_tokens(&repo).await,
        TokenAction::Revoke { name_or_id } => revoke_token(&repo, &name_or_id).await,
    }
}

/// Issues a token for `owner_id`.
///
/// Only the HMAC of the token is stored; the raw value is printed once.
async fn create_token(
    repo: &PgTokenRepository,
    owner_id: i64,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let secret = std::env::var("TOKEN_SIGNING_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .context("TOKEN_SIGNING_SECRET must be set to the server's value")?;

    println!("{}", "Create bearer token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text(format!("owner-{owner_id}"))
            .interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            println!("{}", "Using provided token value".yellow());
            t
        }
        None => generate_token(),
    };

    println!("  Owner: {}", owner_id.to_string().cyan());
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "Save this token now, it cannot be shown again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(&secret, &token_value);

    repo.create_token(owner_id, &token_name, &token_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "Token created.".green().bold());
    println!();
    println!(
        "  curl -X DELETE -H \"Authorization: Bearer {}\" http://localhost:3000/links/<code>",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "No tokens found".yellow());
        println!(
            "Create one with: {}",
            "admin token create --owner <id>".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<8} {:<28} {:<17} {:<17} {}",
        "ID".bright_white().bold(),
        "Owner".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );

    for token in &tokens {
        print_token_row(token);
    }

    println!();
    println!("  Total: {}", tokens.len().to_string().bold());

    Ok(())
}

fn print_token_row(token: &ApiToken) {
    let status = if token.revoked_at.is_some() {
        "REVOKED".red()
    } else {
        "ACTIVE".green()
    };

    let last_used = token
        .last_used_at
        .map_or_else(|| "never".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());

    println!(
        "  {:<5} {:<8} {:<28} {:<17} {:<17} {}",
        token.id.to_string().bright_black(),
        token.owner_id.to_string(),
        token.name.cyan(),
        token.created_at.format("%Y-%m-%d %H:%M").to_string(),
        last_used.bright_black(),
        status
    );
}

/// Revokes a token by numeric ID or exact name.
async fn revoke_token(repo: &PgTokenRepository, name_or_id: &str) -> Result<()> {
    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "Token is already revoked".yellow());
        return Ok(());
    }

    println!(
        "  Token: {} (id {}, owner {})",
        token.name.cyan(),
        token.id,
        token.owner_id
    );

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "Token revoked.".green().bold());

    Ok(())
}

async fn handle_stats(pool: &PgPool) -> Result<()> {
    let (links, owned, expired, visits): (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COUNT(owner_id),
            COUNT(*) FILTER (WHERE expires_at IS NOT NULL AND expires_at <= NOW()),
            COALESCE(SUM(visits), 0)::BIGINT
        FROM links
        "#,
    )
    .fetch_one(pool)
    .await?;

    let active_tokens: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!("{}", "Statistics".bright_blue().bold());
    println!("  Links:         {}", links.to_string().bright_green().bold());
    println!("    owned:       {}", owned);
    println!("    expired:     {}", expired);
    println!("  Visits:        {}", visits.to_string().bright_green().bold());
    println!(
        "  Active tokens: {}",
        active_tokens.to_string().bright_green().bold()
    );

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations applied: {}", applied);
        }
    }

    Ok(())
}

/// Generates a 48-character alphanumeric token (~285 bits of entropy).
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
