//! Upstream currency API response.
//!
//! The API answers `GET /json/last/USD-BRL` with a nested object whose numeric fields are
//! all strings. Only `bid` is needed to build a [`Quote`]; the remaining fields are kept
//! optional so a partial payload still parses, and are only used for logging.
use quote_common::{Quote, QuoteError};
use serde::Deserialize;

/// Top-level response body.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamResponse {
    /// Quote for the USD/BRL pair.
    #[serde(rename = "USDBRL")]
    pub usdbrl: UpstreamQuote,
}

/// Nested pair quote, every value string-typed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamQuote {
    pub code: Option<String>,
    pub codein: Option<String>,
    pub name: Option<String>,
    pub high: Option<String>,
    pub low: Option<String>,
    pub var_bid: Option<String>,
    pub pct_change: Option<String>,
    /// Purchase-side rate as a decimal string.
    pub bid: String,
    pub ask: Option<String>,
    pub timestamp: Option<String>,
    #[serde(rename = "create_date")]
    pub create_date: Option<String>,
}

impl UpstreamResponse {
    /// Decode a raw body. Non-JSON and shape mismatches are both `QuoteError::Decode`.
    pub fn from_slice(body: &[u8]) -> Result<Self, QuoteError> {
        serde_json::from_slice(body).map_err(|e| QuoteError::Decode(e.to_string()))
    }

    /// Convert the string bid into a `Quote`.
    pub fn to_quote(&self) -> Result<Quote, QuoteError> {
        Quote::parse_bid(&self.usdbrl.bid)
    }
}
