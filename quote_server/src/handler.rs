//! Route table and the `/cotacao` handler.
//!
//! Per request: fetch from upstream, answer, then persist. The quote handed to the
//! store is the same value serialized into the response. The write starts only once the
//! response body has been handed to the connection, and runs in a detached task under
//! its own short budget, so a slow or failing store can neither change nor delay what
//! the caller receives.
use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use futures::stream::{self, Stream};
use log::{error, info};
use quote_common::net::QUOTE_PATH;

use crate::error::ApiError;
use crate::storage::{PendingWrite, QuoteStore};
use crate::upstream::UpstreamClient;

/// Shared, read-only handler dependencies.
#[derive(Clone)]
pub struct AppState {
    /// Upstream API client.
    pub upstream: Arc<UpstreamClient>,
    /// Where fetched quotes are recorded.
    pub store: Arc<dyn QuoteStore>,
    /// Budget for each background write.
    pub store_timeout: Duration,
}

impl AppState {
    /// Bundle the handler dependencies.
    pub fn new(upstream: UpstreamClient, store: Arc<dyn QuoteStore>, store_timeout: Duration) -> Self {
        Self {
            upstream: Arc::new(upstream),
            store,
            store_timeout,
        }
    }
}

/// Build the router: `GET /cotacao` -> [`get_quote`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(QUOTE_PATH, get(get_quote))
        .with_state(state)
}

/// GET /cotacao: latest USD/BRL bid as `{"bid": <number>}`.
async fn get_quote(State(state): State<AppState>) -> Result<Response, ApiError> {
    let quote = state.upstream.fetch().await.map_err(|e| {
        error!("Quote fetch failed: {}", e);
        ApiError(e)
    })?;
    let json = quote.to_json_bytes()?;

    info!("Serving bid {}", quote.bid);
    let write = PendingWrite::new(Arc::clone(&state.store), quote, state.store_timeout);
    Ok(respond_then_persist(json, write))
}

/// `200 application/json` response whose body starts `write` once it has been sent.
fn respond_then_persist(json: Vec<u8>, write: PendingWrite) -> Response {
    let length = HeaderValue::from(json.len());
    let chunks = stream::iter([Ok::<_, Infallible>(Bytes::from(json))]);
    let body = Body::from_stream(PersistAfterBody { chunks, write });
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (header::CONTENT_LENGTH, length),
        ],
        body,
    )
        .into_response()
}

/// Body stream that starts its write when the last chunk has been taken.
///
/// The connection may stop polling once `Content-Length` bytes are out and drop the
/// body instead; [`PendingWrite`] starts on drop, which covers that path.
struct PersistAfterBody<S> {
    chunks: S,
    write: PendingWrite,
}

impl<S: Stream + Unpin> Stream for PersistAfterBody<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S::Item>> {
        let polled = Pin::new(&mut self.chunks).poll_next(cx);
        if let Poll::Ready(None) = polled {
            self.write.start();
        }
        polled
    }
}
