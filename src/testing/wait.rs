//! Bounded polling for chain state to settle
//!
//! Transfers are relayed out of band, so scenarios cannot know when a
//! balance has moved. Instead of sleeping a fixed time they probe with
//! exponential backoff until a predicate holds or a deadline passes.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::common::config::PollingConfig;
use crate::common::{Error, Result};

/// Delay sequence between probes
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    max: Duration,
    factor: u32,
}

impl Backoff {
    pub fn new(polling: &PollingConfig) -> Self {
        Self {
            next: polling.initial_interval(),
            max: polling.max_interval(),
            factor: polling.backoff_factor.max(1),
        }
    }

    /// Delay before the next probe
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next.min(self.max);
        self.next = self.next.saturating_mul(self.factor).min(self.max);
        delay
    }
}

/// Result of polling: the last observed value, and whether it satisfied
/// the predicate before the deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T> {
    Reached(T),
    TimedOut(T),
}

impl<T> Settled<T> {
    pub fn is_reached(&self) -> bool {
        matches!(self, Settled::Reached(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Settled::Reached(v) | Settled::TimedOut(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Settled::Reached(v) | Settled::TimedOut(v) => v,
        }
    }
}

/// Probe until `settled` holds or `deadline` elapses.
///
/// The probe runs at least once. Probe errors abort polling immediately.
pub async fn poll_until<T, F, Fut, P>(
    what: &str,
    polling: &PollingConfig,
    deadline: Duration,
    mut probe: F,
    mut settled: P,
) -> Result<Settled<T>>
where
    T: std::fmt::Debug,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: FnMut(&T) -> bool,
{
    let start = Instant::now();
    let mut backoff = Backoff::new(polling);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let value = probe().await?;
        if settled(&value) {
            debug!(what, attempt, ?value, "Settled");
            return Ok(Settled::Reached(value));
        }

        let elapsed = start.elapsed();
        if elapsed >= deadline {
            debug!(what, attempt, ?value, "Gave up waiting");
            return Ok(Settled::TimedOut(value));
        }

        let delay = backoff.next_delay().min(deadline - elapsed);
        debug!(what, attempt, ?value, ?delay, "Not settled yet");
        tokio::time::sleep(delay).await;
    }
}

/// Like [`poll_until`], but a missed deadline is an error
pub async fn wait_for<T, F, Fut, P>(
    what: &str,
    polling: &PollingConfig,
    probe: F,
    settled: P,
) -> Result<T>
where
    T: std::fmt::Debug,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: FnMut(&T) -> bool,
{
    let deadline = polling.deadline();
    match poll_until(what, polling, deadline, probe, settled).await? {
        Settled::Reached(value) => Ok(value),
        Settled::TimedOut(_) => Err(Error::wait_timeout(what, deadline)),
    }
}
