//! Shared networking constants and helpers used by client and server.
use std::time::Duration;

/// TCP port the quote server listens on.
pub const SERVER_PORT: u16 = 8080;
/// Path of the single quote endpoint.
pub const QUOTE_PATH: &str = "/cotacao";
/// Upstream currency API returning the latest USD/BRL quote.
pub const UPSTREAM_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";

/// Server -> upstream budget.
pub const FETCH_TIMEOUT_MS: u64 = 200;
/// Server -> storage budget.
pub const STORE_TIMEOUT_MS: u64 = 10;
/// Client -> server budget. Must stay above `FETCH_TIMEOUT_MS`.
pub const CLIENT_TIMEOUT_MS: u64 = 300;

const _: () = assert!(CLIENT_TIMEOUT_MS > FETCH_TIMEOUT_MS);

/// SQLite file the server records quotes in.
pub const DB_FILE: &str = "cotacao.db";
/// Text file the client writes the quote to.
pub const OUTPUT_FILE: &str = "cotacao.txt";

/// Helper to format an address with a port like "host:port".
pub fn addr(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

/// Default URL the client calls.
pub fn default_quote_url() -> String {
    format!("http://{}{}", addr("localhost", SERVER_PORT), QUOTE_PATH)
}

/// Milliseconds to a `Duration`.
pub fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
