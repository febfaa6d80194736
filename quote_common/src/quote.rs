//! Quote payload exchanged between server and client.
//!
//! The server answers `GET /cotacao` with a JSON-encoded `Quote` and the client decodes
//! the same type with `serde_json`, so both sides agree on the wire shape `{"bid": <number>}`.
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// Label written in front of the bid in the client's output file.
pub const FILE_LABEL: &str = "Dólar";

/// Current USD/BRL bid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Purchase-side exchange rate.
    pub bid: f64,
}

impl Quote {
    /// Wrap a bid, rejecting NaN and infinities which cannot be sent as JSON numbers.
    pub fn new(bid: f64) -> Result<Self, QuoteError> {
        if bid.is_finite() {
            Ok(Self { bid })
        } else {
            Err(QuoteError::Conversion(format!("bid {bid} is not a finite number")))
        }
    }

    /// Parse a decimal string such as `"5.432100"` into a quote.
    pub fn parse_bid(raw: &str) -> Result<Self, QuoteError> {
        let bid = raw
            .parse::<f64>()
            .map_err(|e| QuoteError::Conversion(format!("bid {raw:?}: {e}")))?;
        Self::new(bid)
    }

    /// Encode the quote to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, QuoteError> {
        let json = serde_json::to_vec(self)?;
        Ok(json)
    }

    /// Single output-file line: label and bid with six decimals, newline-terminated.
    pub fn to_file_line(&self) -> String {
        format!("{FILE_LABEL}: {:.6}\n", self.bid)
    }
}
