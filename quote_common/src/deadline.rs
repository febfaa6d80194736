//! Deadline token passed into every bounded call.
//!
//! A `Deadline` is fixed when it is created and carries an absolute instant, so the
//! same token can be handed to async code (via [`Deadline::run`]) and to blocking
//! code (via [`Deadline::remaining`] / [`Deadline::is_expired`]) and both agree on
//! when time is up.
//!
//! Time is measured with the monotonic `std::time::Instant`.
use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Returned by [`Deadline::run`] when the wrapped future did not finish in time.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("deadline of {}ms exceeded", .budget.as_millis())]
pub struct DeadlineExceeded {
    /// Budget the deadline was created with.
    pub budget: Duration,
}

/// Absolute point in time after which an in-flight operation is abandoned.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Creates a deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    /// Budget this deadline was created with.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Instant at which the deadline expires.
    pub fn instant(&self) -> Instant {
        self.at
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// Check if the deadline has passed
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Drive `fut` to completion unless the deadline passes first, in which case the
    /// future is dropped and `DeadlineExceeded` is returned.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, DeadlineExceeded> {
        tokio::time::timeout_at(tokio::time::Instant::from_std(self.at), fut)
            .await
            .map_err(|_| DeadlineExceeded {
                budget: self.budget,
            })
    }
}
