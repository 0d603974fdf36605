//! chain_indexer - Blockchain message indexer
//!
//! Reads decoded blocks as JSON lines from stdin, dispatches their messages
//! to the registered modules and persists them into PostgreSQL.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chain_indexer::domain::{Block, GenesisDoc};
use chain_indexer::jobs::{PeriodicScheduler, SchedulerConfig};
use chain_indexer::modules::{default_address_parser, Context, Modules, Registrar};
use chain_indexer::worker::WorkerPool;
use chain_indexer::{db, AppError, AppResult, Config};

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chain_indexer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;

    tracing::info!(environment = %config.environment, "Starting chain indexer");
    tracing::info!("Connecting to database...");

    let pool = db::connect(&config).await?;
    db::verify_connection(&pool).await?;
    db::run_migrations(&pool).await?;

    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(AppError::SchemaIncomplete.into());
    }

    tracing::info!("Database connected successfully");

    let registrar = Registrar::new(default_address_parser(config.bech32_prefix.clone()));
    let modules = registrar.build_modules(&Context::new(&config, &pool));
    tracing::info!(modules = ?modules.names(), "Modules registered");

    if let Some(path) = &config.genesis_file_path {
        import_genesis(&modules, path).await?;
    }

    let scheduler =
        PeriodicScheduler::with_config(modules.clone(), SchedulerConfig::from(&config)).start();
    let workers = WorkerPool::start(modules, config.parser_workers);
    tracing::info!(workers = workers.workers(), "Reading blocks from stdin");

    tokio::select! {
        result = read_blocks(&workers) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Block input failed");
            }
        }
        _ = shutdown_signal() => {}
    }

    // Cleanup
    tracing::info!("Indexer shutting down...");
    scheduler.abort();
    workers.shutdown().await;
    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}

/// Import the genesis document at `path` through every genesis module
async fn import_genesis(modules: &Modules, path: &str) -> AppResult<()> {
    tracing::info!(path, "Importing genesis");

    let raw = tokio::fs::read_to_string(path).await?;
    let doc: GenesisDoc = serde_json::from_str(&raw)?;
    modules.handle_genesis(&doc).await?;

    tracing::info!(chain_id = %doc.chain_id, "Genesis imported");
    Ok(())
}

/// Feed JSON-encoded blocks from stdin to the workers until EOF
async fn read_blocks(workers: &WorkerPool) -> AppResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut count: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Block>(line) {
            Ok(block) => {
                workers.submit(block).await?;
                count += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed block");
            }
        }
    }

    tracing::info!(blocks = count, "Block input closed");
    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
