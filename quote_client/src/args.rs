//! Command-line arguments for the Quote Client.
//!
//! No flag is required: a bare invocation asks the local server and writes `cotacao.txt`
//! in the working directory.
use clap::Parser;
use quote_common::net::{self, CLIENT_TIMEOUT_MS, OUTPUT_FILE};
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// URL of the quote server endpoint.
    #[clap(long, default_value_t = net::default_quote_url())]
    pub url: String,

    /// File the quote is written to; overwritten on every successful run.
    #[clap(long, default_value = OUTPUT_FILE)]
    pub output: PathBuf,

    /// Budget for the whole request, in milliseconds.
    #[clap(long, default_value_t = CLIENT_TIMEOUT_MS)]
    pub timeout_ms: u64,
}
