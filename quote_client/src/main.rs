//! Quote Client: asks the quote server for the latest USD/BRL bid once and saves it to
//! a text file.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client
//! quote_client --url http://192.168.0.10:8080/cotacao --output ./cotacao.txt
//! ```
//!
//! The request is bounded by a 300 ms deadline, looser than the server's own 200 ms
//! upstream deadline. Every outcome prints exactly one line: success with the file path,
//! or one of the timeout / request / decode / file messages. Nothing is retried and the
//! file is only written after a fully decoded response.
#![warn(missing_docs)]
mod args;
mod fetcher;
mod writer;

use crate::args::Args;
use crate::fetcher::fetch_quote;
use crate::writer::save_quote;
use clap::Parser;
use log::{debug, warn};
use quote_common::net::{FETCH_TIMEOUT_MS, millis};
use quote_common::{Deadline, QuoteError, Result};
use std::path::{Path, PathBuf};

/// Fetch the quote and write it to `args.output`, returning the written path.
async fn run(args: &Args) -> Result<PathBuf> {
    if args.timeout_ms <= FETCH_TIMEOUT_MS {
        warn!(
            "--timeout-ms={} does not cover the server's {}ms upstream budget; expect timeouts",
            args.timeout_ms, FETCH_TIMEOUT_MS
        );
    }

    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| QuoteError::Config(format!("cannot build HTTP client: {e}")))?;
    let deadline = Deadline::after(millis(args.timeout_ms));

    let quote = fetch_quote(&client, &args.url, &deadline).await?;
    save_quote(&args.output, &quote)?;
    Ok(args.output.clone())
}

/// Line printed when the run succeeded.
fn success_message(path: &Path) -> String {
    format!("Quote saved successfully to '{}'", path.display())
}

/// Line printed for a failed run, one per failure category.
fn failure_message(err: &QuoteError, output: &Path) -> String {
    match err {
        QuoteError::Timeout { .. } => {
            "Error: insufficient time to complete the request (timeout).".to_string()
        }
        QuoteError::Transport { message, .. } => format!("Error performing request: {message}"),
        QuoteError::Decode(e) | QuoteError::Conversion(e) => {
            format!("Error decoding response: {e}")
        }
        QuoteError::Io(e) => format!("Error writing file '{}': {e}", output.display()),
        QuoteError::Config(e) => format!("Error preparing request: {e}"),
    }
}

/// The one line shown for a run. Error internals only reach the debug log.
fn outcome_line(outcome: &Result<PathBuf>, output: &Path) -> String {
    match outcome {
        Ok(path) => success_message(path),
        Err(e) => {
            debug!("Quote client failed: {:?}", e);
            failure_message(e, output)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logger();
    let args = Args::parse();

    let outcome = run(&args).await;
    println!("{}", outcome_line(&outcome, &args.output));
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::Stage;
    use quote_common::net::QUOTE_PATH;
    use std::fs;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_answering(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(response)
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn args_for(server: &MockServer, output: &Path) -> Args {
        Args {
            url: format!("{}{}", server.uri(), QUOTE_PATH),
            output: output.to_path_buf(),
            timeout_ms: 300,
        }
    }

    #[tokio::test]
    async fn success_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cotacao.txt");
        let server =
            server_answering(ResponseTemplate::new(200).set_body_string(r#"{"bid":5.4321}"#))
                .await;

        let written = run(&args_for(&server, &output)).await.unwrap();

        assert_eq!(written, output);
        assert_eq!(fs::read_to_string(&output).unwrap(), "Dólar: 5.432100\n");
        assert!(success_message(&written).contains("cotacao.txt"));
    }

    #[tokio::test]
    async fn running_twice_keeps_only_the_latest_value() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cotacao.txt");

        for body in [r#"{"bid":5.1}"#, r#"{"bid":5.2}"#] {
            let server = server_answering(ResponseTemplate::new(200).set_body_string(body)).await;
            run(&args_for(&server, &output)).await.unwrap();
        }

        assert_eq!(fs::read_to_string(&output).unwrap(), "Dólar: 5.200000\n");
    }

    #[tokio::test]
    async fn timeout_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cotacao.txt");
        let server = server_answering(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"bid":5.4321}"#)
                .set_delay(Duration::from_millis(1000)),
        )
        .await;

        let err = run(&args_for(&server, &output)).await.unwrap_err();

        assert!(err.is_timeout());
        assert!(failure_message(&err, &output).contains("(timeout)"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn undecodable_body_leaves_previous_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cotacao.txt");
        fs::write(&output, "Dólar: 1.000000\n").unwrap();
        let server =
            server_answering(ResponseTemplate::new(200).set_body_string("{\"bid\":")).await;

        let err = run(&args_for(&server, &output)).await.unwrap_err();

        assert!(failure_message(&err, &output).starts_with("Error decoding response"));
        assert_eq!(fs::read_to_string(&output).unwrap(), "Dólar: 1.000000\n");
    }

    #[tokio::test]
    async fn server_error_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cotacao.txt");
        let server = server_answering(
            ResponseTemplate::new(500).set_body_string("fetch timeout: no answer within 200ms"),
        )
        .await;

        let err = run(&args_for(&server, &output)).await.unwrap_err();
        let message = failure_message(&err, &output);

        assert!(message.starts_with("Error decoding response"), "{message}");
        assert!(message.contains("fetch timeout"), "{message}");
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn unwritable_output_reports_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("cotacao.txt");
        let server =
            server_answering(ResponseTemplate::new(200).set_body_string(r#"{"bid":5.4321}"#))
                .await;

        let err = run(&args_for(&server, &output)).await.unwrap_err();

        assert!(failure_message(&err, &output).starts_with("Error writing file"));
    }

    #[tokio::test]
    async fn every_outcome_is_a_single_line() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cotacao.txt");
        let templates = [
            ResponseTemplate::new(200).set_body_string(r#"{"bid":5.4321}"#),
            ResponseTemplate::new(500).set_body_string("fetch error: upstream said\nno"),
            ResponseTemplate::new(200).set_body_string("{\"bid\":"),
        ];

        for template in templates {
            let server = server_answering(template).await;
            let outcome = run(&args_for(&server, &output)).await;
            let line = outcome_line(&outcome, &output);
            assert!(!line.is_empty());
            assert!(!line.contains('\n'), "{line:?}");
        }
    }

    #[test]
    fn every_category_has_a_distinct_message() {
        let output = Path::new("cotacao.txt");
        let messages = [
            QuoteError::timeout(Stage::Request, Duration::from_millis(300)),
            QuoteError::transport(Stage::Request, "connection refused"),
            QuoteError::Decode("eof".into()),
            QuoteError::Io(std::io::Error::other("disk full")),
        ]
        .iter()
        .map(|e| failure_message(e, output))
        .collect::<Vec<_>>();

        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a.split(':').next(), b.split(':').next());
            }
        }
    }
}
