//! Command-line arguments for the Quote Server.
//!
//! Every flag is optional; running the binary bare serves `/cotacao` on port 8080 with
//! the default upstream, database file and budgets.
use clap::Parser;
use quote_common::net::{self, DB_FILE, FETCH_TIMEOUT_MS, SERVER_PORT, STORE_TIMEOUT_MS, UPSTREAM_URL};
use quote_common::{QuoteError, Result};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address to listen on.
    #[clap(long, default_value_t = net::addr("0.0.0.0", SERVER_PORT))]
    pub bind: String,

    /// Upstream currency API returning the USD/BRL quote.
    #[clap(long, default_value = UPSTREAM_URL)]
    pub upstream_url: String,

    /// SQLite file fetched quotes are recorded in.
    #[clap(long, default_value = DB_FILE)]
    pub db_path: String,

    /// Budget for each upstream fetch, in milliseconds.
    #[clap(long, default_value_t = FETCH_TIMEOUT_MS)]
    pub fetch_timeout_ms: u64,

    /// Budget for each database write, in milliseconds.
    #[clap(long, default_value_t = STORE_TIMEOUT_MS)]
    pub store_timeout_ms: u64,
}

impl Args {
    /// Reject budgets that could never succeed.
    pub fn validate(&self) -> Result<()> {
        if self.fetch_timeout_ms == 0 || self.store_timeout_ms == 0 {
            return Err(QuoteError::Config(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
