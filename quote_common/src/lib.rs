//!
//! Common types and utilities shared by the quote server and client.
//!
//! This crate aggregates:
//! - `error`: unified error type `QuoteError` used across the workspace.
//! - `result`: handy `Result<T, QuoteError>` alias.
//! - `quote`: the `{"bid": ...}` payload served by the server and saved by the client.
//! - `deadline`: the deadline token every bounded call receives.
//! - `net`: networking constants, default budgets and file names.
#![warn(missing_docs)]
pub mod deadline;
pub mod error;
pub mod net;
pub mod quote;
pub mod result;

pub use deadline::{Deadline, DeadlineExceeded};
pub use error::{QuoteError, Stage};
pub use quote::Quote;
pub use result::Result;
