// ABOUTME: FitBurn server binary entrypoint
// ABOUTME: Loads configuration, initializes logging and storage, and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # FitBurn API Server Binary
//!
//! Starts the fitness-tracking HTTP API with user authentication, profile
//! management, calorie accumulation, and the mock exercise analysis endpoint.

use anyhow::Result;
use clap::Parser;
use fitburn::{
    config::ServerConfig, database::Database, logging, resources::ServerResources, server,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "fitburn-server")]
#[command(about = "FitBurn - fitness tracking API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    logging::init_from_env()?;

    info!("Starting FitBurn API server");
    info!("{}", config.summary());

    if let Some(parent) = std::path::Path::new(
        config.database_url.trim_start_matches("sqlite:"),
    )
    .parent()
    {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let database = Database::new(&config.database_url).await?;
    info!("Database connected and migrated");

    tokio::fs::create_dir_all(&config.uploads_dir).await?;

    let resources = Arc::new(ServerResources::new(database, config));
    server::serve(resources).await
}
