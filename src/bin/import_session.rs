// ABOUTME: Offline import of a JSON session file for an existing user
// ABOUTME: Runs the same validation, binding and persistence pipeline as POST /sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session import tool
//!
//! Usage:
//!
//! ```bash
//! cargo run --bin import-session -- --file session.json --username alice
//! ```
//!
//! The file holds a `{"session": {...}}` envelope.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::info;
use workout_tracker::{
    config::{DatabaseConfig, DatabaseUrl},
    database::Database,
    logging,
    services::{load_session_import, SessionService},
};

#[derive(Parser)]
#[command(name = "import-session")]
#[command(about = "Import a workout session file for an existing user")]
struct Args {
    /// Path to the session JSON file
    #[arg(long)]
    file: PathBuf,

    /// Owner of the imported session
    #[arg(long)]
    username: String,

    /// Database URL (defaults to `DATABASE_URL`)
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env()?;

    let mut db_config = DatabaseConfig::from_env()?;
    if let Some(url) = args.database.as_deref() {
        db_config.url = DatabaseUrl::parse_url(url)?;
    }
    let database = Database::new(&db_config).await?;

    let import = load_session_import(&database, &args.file, &args.username, Utc::now()).await?;

    let sessions = SessionService::new(database);
    let session = sessions.submit(&import.owner, &import.session).await?;
    info!(
        session_id = session.id,
        workouts = session.workouts.len(),
        "Session imported"
    );

    println!("{}", serde_json::to_string_pretty(&session)?);
    Ok(())
}
