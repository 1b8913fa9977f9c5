//! Rate Limit Store CLI
//!
//! Operator entry point for inspecting and maintaining a rate limit store.
//! Uses `anyhow` for process-level errors, but store errors are reported
//! through `kernel::error::AppError` so the output carries kind and action.

use clap::{Parser, Subcommand};
use kernel::error::{
    app_error::{AppError, AppResult, ResultExt},
    kind::ErrorKind,
};
use ratelimit::{DatabaseConfig, PgWindowStore, StoreConfig, StoreStrategy};
use serde::Serialize;
use serde_json::{Value, json};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fixed-window rate limit store maintenance")]
struct Cli {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Namespace of the limiter
    #[arg(long, env = "RATE_LIMIT_PREFIX", default_value = "default")]
    prefix: String,

    /// Counting strategy: `summary` or `detailed`
    #[arg(long, env = "RATE_LIMIT_STRATEGY", default_value = "summary")]
    strategy: StoreStrategy,

    /// Window length in milliseconds
    #[arg(long, env = "RATE_LIMIT_WINDOW_MS", default_value_t = 60_000)]
    window_ms: u64,

    /// Connection pool size
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the schema and tables for the selected strategy
    Bootstrap,
    /// Record one hit for a key
    Increment { key: String },
    /// Remove one hit for a key
    Decrement { key: String },
    /// Remove all hits for a key
    ResetKey { key: String },
    /// Remove all hits of the namespace
    ResetAll,
    /// Show the current hits for a key
    Get { key: String },
    /// Delete expired windows of every namespace
    Purge,
}

/// Error document printed on failure
#[derive(Serialize)]
struct ErrorReport<'a> {
    kind: ErrorKind,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<&'a str>,
}

impl<'a> From<&'a AppError> for ErrorReport<'a> {
    fn from(err: &'a AppError) -> Self {
        Self {
            kind: err.kind(),
            message: err.message(),
            action: err.action(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rlctl=info,ratelimit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json!({ "error": ErrorReport::from(&err) }))?
            );
            std::process::exit(if err.is_transient() { 75 } else { 1 });
        }
    }
}

async fn run(cli: Cli) -> AppResult<Value> {
    let config = StoreConfig::with_window_ms(cli.prefix, cli.strategy, cli.window_ms);
    let database = DatabaseConfig::new(cli.database_url).with_max_connections(cli.max_connections);

    let store = PgWindowStore::init(config, &database).await?;
    let result = execute(&store, cli.command).await;
    store.close().await;

    result
}

async fn execute(store: &PgWindowStore, command: Command) -> AppResult<Value> {
    let output = match command {
        Command::Bootstrap => {
            store.bootstrap().await?;
            json!({ "bootstrapped": store.strategy() })
        }
        Command::Increment { key } => {
            let info = store.increment(&key).await?;
            json!({ "key": key, "hits": to_value(&info)? })
        }
        Command::Decrement { key } => {
            store.decrement(&key).await?;
            json!({ "key": key, "decremented": true })
        }
        Command::ResetKey { key } => {
            store.reset_key(&key).await?;
            json!({ "key": key, "reset": true })
        }
        Command::ResetAll => {
            store.reset_all().await?;
            json!({ "prefix": store.prefix(), "reset": true })
        }
        Command::Get { key } => {
            let info = store.get(&key).await?;
            json!({ "key": key, "hits": to_value(&info)? })
        }
        Command::Purge => {
            let sessions = store.purge_expired().await?;
            json!({ "purgedSessions": sessions })
        }
    };

    Ok(output)
}

fn to_value<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_app_err(ErrorKind::Internal, "Failed to encode output")
}
