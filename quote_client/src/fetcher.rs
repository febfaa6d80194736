//! One bounded request to the quote server.
//!
//! The send and the body read share one [`Deadline`]. The outcome is one of the terminal
//! states `Success`, `Timeout`, `Transport` or `Decode`; nothing is retried.
use log::{debug, info};
use quote_common::{Deadline, Quote, QuoteError, Result, Stage};

/// Fetch and decode the quote served at `url` before `deadline`.
///
/// A response of any status is decoded the same way. When an error status carries a body
/// that is not a quote, the decode error names the status and the server's message.
pub async fn fetch_quote(client: &reqwest::Client, url: &str, deadline: &Deadline) -> Result<Quote> {
    let timeout = || QuoteError::timeout(Stage::Request, deadline.budget());
    let classify = |err: reqwest::Error| {
        if err.is_timeout() {
            timeout()
        } else {
            QuoteError::transport(Stage::Request, err)
        }
    };

    info!("Requesting quote from {}", url);
    let response = deadline
        .run(client.get(url).send())
        .await
        .map_err(|_| timeout())?
        .map_err(classify)?;

    let status = response.status();
    let body = deadline
        .run(response.bytes())
        .await
        .map_err(|_| timeout())?
        .map_err(classify)?;
    debug!("Server answered {} with {} bytes", status, body.len());

    let quote: Quote = serde_json::from_slice(&body).map_err(|e| {
        if status.is_success() {
            QuoteError::from(e)
        } else {
            let message = String::from_utf8_lossy(&body);
            let message = message.split_whitespace().collect::<Vec<_>>().join(" ");
            QuoteError::Decode(format!("server responded with {status}: {message}"))
        }
    })?;
    Quote::new(quote.bid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::net::QUOTE_PATH;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(response)
            .mount(&mock_server)
            .await;
        mock_server
    }

    async fn fetch_from(server: &MockServer, budget_ms: u64) -> Result<Quote> {
        let url = format!("{}{}", server.uri(), QUOTE_PATH);
        let deadline = Deadline::after(Duration::from_millis(budget_ms));
        fetch_quote(&reqwest::Client::new(), &url, &deadline).await
    }

    #[tokio::test]
    async fn decodes_server_payload() {
        let server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(r#"{"bid":5.4321}"#))
                .await;

        let quote = fetch_from(&server, 1000).await.unwrap();
        assert_eq!(quote.bid, 5.4321);
    }

    #[tokio::test]
    async fn slow_server_is_a_timeout() {
        let server = create_mock_server(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"bid":5.4321}"#)
                .set_delay(Duration::from_millis(1000)),
        )
        .await;

        let started = Instant::now();
        let err = fetch_from(&server, 300).await.unwrap_err();

        assert!(matches!(err, QuoteError::Timeout { stage: Stage::Request, .. }), "{err}");
        assert!(started.elapsed() < Duration::from_millis(800));
    }

    #[tokio::test]
    async fn refused_connection_is_a_request_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}{}", listener.local_addr().unwrap(), QUOTE_PATH);
        drop(listener);

        let deadline = Deadline::after(Duration::from_millis(1000));
        let err = fetch_quote(&reqwest::Client::new(), &url, &deadline)
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Transport { stage: Stage::Request, .. }), "{err}");
    }

    #[tokio::test]
    async fn server_error_carries_its_message() {
        let server = create_mock_server(
            ResponseTemplate::new(500).set_body_string("fetch timeout: no answer within 200ms"),
        )
        .await;

        let err = fetch_from(&server, 1000).await.unwrap_err();
        assert!(matches!(err, QuoteError::Decode(_)), "{err}");
        assert!(err.to_string().contains("500"), "{err}");
        assert!(err.to_string().contains("fetch timeout"), "{err}");
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        for body in ["not json", r#"{"price":5.4}"#, r#"{"bid":"5.4"}"#] {
            let server = create_mock_server(ResponseTemplate::new(200).set_body_string(body)).await;

            let err = fetch_from(&server, 1000).await.unwrap_err();
            assert!(matches!(err, QuoteError::Decode(_)), "{body}: {err}");
        }
    }
}
