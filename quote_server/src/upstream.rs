//! Bounded fetch from the upstream currency API.
//!
//! One `GET` per call, no retries. The send and the body read share a single
//! [`Deadline`]; when it runs out the request future is dropped and the failure is
//! reported as a fetch timeout rather than a generic transport error.
use std::time::Duration;

use log::{debug, info};
use quote_common::{Deadline, Quote, QuoteError, Result, Stage};

use crate::model::upstream::UpstreamResponse;

/// HTTP client bound to one upstream URL and budget.
pub struct UpstreamClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl UpstreamClient {
    /// Create a client for `url` whose every fetch is bounded by `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("quote_server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QuoteError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.to_string(),
            timeout,
        })
    }

    /// Budget applied to each fetch.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the latest quote.
    ///
    /// Errors: `Timeout` when the deadline passes, `Transport` for connection failures
    /// and non-success statuses, `Decode` for bodies of the wrong shape, `Conversion`
    /// for a bid that is not a number.
    pub async fn fetch(&self) -> Result<Quote> {
        let deadline = Deadline::after(self.timeout);
        let body = deadline
            .run(self.get_body())
            .await
            .map_err(|_| QuoteError::timeout(Stage::Fetch, self.timeout))??;

        parse_quote(&body)
    }

    async fn get_body(&self) -> Result<Vec<u8>> {
        debug!("Requesting quote from {}", self.url);
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        debug!("Upstream answered {}", status);
        if !status.is_success() {
            return Err(QuoteError::transport(
                Stage::Fetch,
                format!("upstream responded with {status}"),
            ));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(body.to_vec())
    }

    fn classify(&self, err: reqwest::Error) -> QuoteError {
        if err.is_timeout() {
            QuoteError::timeout(Stage::Fetch, self.timeout)
        } else {
            QuoteError::transport(Stage::Fetch, err)
        }
    }
}

/// Parse an upstream body into the quote both the response and the store use.
pub fn parse_quote(body: &[u8]) -> Result<Quote> {
    let response = UpstreamResponse::from_slice(body)?;
    let quote = response.to_quote()?;
    let pair = &response.usdbrl;
    debug!(
        "{} high={} low={} varBid={} pctChange={} ts={}",
        pair.name.as_deref().unwrap_or("?"),
        pair.high.as_deref().unwrap_or("?"),
        pair.low.as_deref().unwrap_or("?"),
        pair.var_bid.as_deref().unwrap_or("?"),
        pair.pct_change.as_deref().unwrap_or("?"),
        pair.timestamp.as_deref().unwrap_or("?"),
    );
    info!(
        "Upstream {}{} bid={} ask={} at {}",
        pair.code.as_deref().unwrap_or("?"),
        pair.codein.as_deref().unwrap_or("?"),
        quote.bid,
        pair.ask.as_deref().unwrap_or("?"),
        pair.create_date.as_deref().unwrap_or("?"),
    );
    Ok(quote)
}
