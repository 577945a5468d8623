//! CRM API - REST backend for clients, deals, tasks and lead accounts
//!
//! Serves the `/api` routes and imports spreadsheets of leads in chunks.

mod cli;
mod config;
mod db;
mod defaults;
mod handlers;
mod services;
mod types;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, ImportKind};
use crate::config::Config;
use crate::db::PgRecordStore;
use crate::handlers::AppState;
use crate::services::importer;
use crate::services::spreadsheet::{read_rows, SheetFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    std::fs::create_dir_all(&config.logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.logs_dir, "crm-api.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,crm_api=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer()) // stdout
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false)) // file
        .init();

    let pool = db::create_pool(&config.database_url).await?;
    info!("Connected to PostgreSQL");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            db::run_migrations(&pool).await?;
            serve(pool, &config).await
        }
        Command::Migrate => {
            db::run_migrations(&pool).await?;
            info!("Database migrations complete");
            Ok(())
        }
        Command::Import { kind, path } => import_file(pool, &config, kind, &path).await,
        Command::CreateDeals { country } => {
            let store = PgRecordStore::new(pool);
            let summary =
                importer::create_missing_deals(&store, country.as_deref(), &config.import_settings())
                    .await?;
            print_report(&summary)
        }
    }
}

async fn serve(pool: PgPool, config: &Config) -> Result<()> {
    let state = AppState {
        store: Arc::new(PgRecordStore::new(pool.clone())),
        pool,
        import: Arc::new(config.import_settings()),
    };
    let app = handlers::create_app(state, config.cors_origin.as_deref(), config.max_upload_bytes)?;

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("CRM API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn import_file(pool: PgPool, config: &Config, kind: ImportKind, path: &Path) -> Result<()> {
    let file_name = path.to_string_lossy();
    let format = SheetFormat::from_filename(&file_name)
        .with_context(|| format!("Unsupported file type: {}", path.display()))?;
    if kind == ImportKind::Clients && format == SheetFormat::Csv {
        anyhow::bail!("Client import accepts only .xlsx and .xls files");
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let rows = tokio::task::spawn_blocking(move || read_rows(&bytes, format)).await??;
    info!(rows = rows.len(), file = %path.display(), "Spreadsheet parsed");

    let store = PgRecordStore::new(pool);
    let settings = config.import_settings();
    match kind {
        ImportKind::Clients => print_report(&importer::import_clients(&store, &rows, &settings).await?),
        ImportKind::Instagram => {
            print_report(&importer::import_instagram_accounts(&store, &rows, &settings).await?)
        }
    }
}

fn print_report<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
