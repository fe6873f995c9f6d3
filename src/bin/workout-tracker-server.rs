// ABOUTME: HTTP server binary for the workout tracker API
// ABOUTME: Loads environment configuration, opens the store and serves the router until Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Tracker Server Binary
//!
//! Starts the HTTP API with token authentication and a `SQLite` session store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use workout_tracker::{
    config::ServerConfig, logging, resources::ServerResources, routes::build_router,
};

#[derive(Parser)]
#[command(name = "workout-tracker-server")]
#[command(about = "Workout Tracker API - validated ingestion of nested workout sessions")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env file: {e}");
        }
    }

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Workout Tracker API");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::from_config(&config).await?);
    info!("Database initialized: {}", config.database.url);

    let router = build_router(resources);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received, draining connections");
}
