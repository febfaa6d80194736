//! Domain models for the quote server.
//!
//! - `upstream`: the currency API's response shape, parsed only as far as the bid.
pub mod upstream;
