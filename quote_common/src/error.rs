//! Error types shared between client and server.
//!
//! `QuoteError` covers every way a quote exchange can end early. Timeouts are kept
//! apart from every other failure at each boundary, and the `Stage` tag tells which
//! exchange produced them (server to upstream, client to server).
use std::io;
use std::time::Duration;

use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Boundary at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    /// Server calling the upstream currency API.
    Fetch,
    /// Client calling the quote server.
    Request,
}

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// The deadline ran out before the exchange completed.
    #[error("{stage} timeout: no answer within {}ms", .budget.as_millis())]
    Timeout {
        /// Boundary that timed out.
        stage: Stage,
        /// Budget that was exceeded.
        budget: Duration,
    },

    /// Network or protocol failure other than a timeout.
    #[error("{stage} error: {message}")]
    Transport {
        /// Boundary that failed.
        stage: Stage,
        /// Human-readable cause.
        message: String,
    },

    /// Body was not JSON or did not have the expected shape.
    #[error("parse error: {0}")]
    Decode(String),

    /// Bid field could not be turned into a finite number.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// I/O error from files or sockets.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid runtime configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl QuoteError {
    /// Builds a `Timeout` for `stage` with the exceeded `budget`.
    pub fn timeout(stage: Stage, budget: Duration) -> Self {
        QuoteError::Timeout { stage, budget }
    }

    /// Builds a `Transport` error for `stage` from any displayable cause.
    pub fn transport(stage: Stage, cause: impl std::fmt::Display) -> Self {
        QuoteError::Transport {
            stage,
            message: cause.to_string(),
        }
    }

    /// Returns `true` when the error is a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, QuoteError::Timeout { .. })
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure_category() {
        let timeout = QuoteError::timeout(Stage::Fetch, Duration::from_millis(200));
        assert_eq!(timeout.to_string(), "fetch timeout: no answer within 200ms");
        assert!(timeout.is_timeout());

        let transport = QuoteError::transport(Stage::Fetch, "connection refused");
        assert_eq!(transport.to_string(), "fetch error: connection refused");
        assert!(!transport.is_timeout());

        assert!(QuoteError::Decode("eof".into()).to_string().starts_with("parse error"));
        assert!(
            QuoteError::Conversion("abc".into())
                .to_string()
                .starts_with("conversion error")
        );
    }

    #[test]
    fn stage_names_are_lowercase() {
        assert_eq!(Stage::Request.to_string(), "request");
        let name: &'static str = Stage::Fetch.into();
        assert_eq!(name, "fetch");
    }
}
