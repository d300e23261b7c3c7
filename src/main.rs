use clap::Parser;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use utils::cli::Args;
use utils::state::AppState;

use crate::config::Config;

mod api;
mod config;
mod domain;
mod error;
mod questions;
mod service;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("studyhall=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = validate_config(&args);

    let options = SqliteConnectOptions::from_str(&config.db_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(12)
        .connect_with(options)
        .await?;
    sqlx::migrate!().run(&pool).await?;

    let state = Arc::new(AppState::new(config.clone(), Arc::new(pool)));
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down...");
}

fn validate_config(args: &Args) -> Config {
    let mut validation_errors = Vec::new();

    if let Some(db_path) = args.database_url.strip_prefix("sqlite://") {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                validation_errors.push(format!(
                    "The directory for the database `{}` does not exist",
                    parent.display(),
                ));
            }
        }
    }

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET is not set. Use default value: `secret`");
        "secret".into()
    });
    let jwt_lifetime_secs = std::env::var("JWT_LIFETIME_SECONDS")
        .unwrap_or_else(|_| "3600".into())
        .parse::<i64>()
        .unwrap_or_else(|_| {
            validation_errors.push("JWT_LIFETIME_SECONDS must be an integer".to_string());
            0
        });

    if !validation_errors.is_empty() {
        eprintln!("{}", validation_errors.join("\n"));
        std::process::exit(1);
    }

    Config {
        host: args.host.clone(),
        port: args.port,
        db_url: args.database_url.clone(),
        jwt_secret,
        jwt_lifetime_secs,
    }
}
