//! Quote HTTP server.
//!
//! Serves the latest USD/BRL bid on `GET /cotacao`. Each request is handled on its own
//! task by axum and wires together three building blocks:
//!
//! - `UpstreamClient`: fetches the quote from the currency API under a short deadline
//!   (200 ms by default) and classifies failures as timeout, fetch, parse or conversion
//!   errors.
//! - `handler`: the route table; answers `{"bid": <number>}` or a plain-text 500.
//! - `SqliteStore`: records every served bid after the response is committed, under its
//!   own much shorter deadline (10 ms by default). Storage failures are only logged.
//!
//! Shutdown: Ctrl+C stops accepting connections and lets in-flight requests finish.
#![warn(missing_docs)]
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use quote_common::Result;
use quote_common::net::{QUOTE_PATH, millis};

use crate::args::Args;
use crate::handler::{AppState, router};
use crate::storage::SqliteStore;
use crate::upstream::UpstreamClient;

mod args;
mod error;
mod handler;
mod model;
mod storage;
mod upstream;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    args.validate()?;

    let upstream = UpstreamClient::new(&args.upstream_url, millis(args.fetch_timeout_ms))?;
    let store = Arc::new(SqliteStore::new(&args.db_path));
    info!(
        "Upstream {} (budget {}ms), storage {} (budget {}ms)",
        args.upstream_url,
        upstream.timeout().as_millis(),
        store.path().display(),
        args.store_timeout_ms
    );

    let app = router(AppState::new(upstream, store, millis(args.store_timeout_ms)));
    let listener = tokio::net::TcpListener::bind(args.bind.as_str()).await?;
    info!("Server running on http://{}{}", listener.local_addr()?, QUOTE_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl+C received. Shutting down server..."),
        Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
