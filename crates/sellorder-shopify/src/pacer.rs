//! Fixed-delay scheduling.
//!
//! Throttling is cooperative: callers pace themselves with a constant delay
//! between dequeues instead of reacting to backpressure. Everything sleeps
//! through `tokio::time`, so tests can run it on a paused clock.

use std::collections::VecDeque;
use std::time::Duration;

/// A constant delay applied between consecutive remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps for the configured delay. A zero delay returns immediately.
    pub async fn pace(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// A sequential work queue that waits one [`Pacer`] delay between items.
///
/// The first item is handed out immediately; every later one only after the
/// delay, so the delay always separates the end of one unit of work from the
/// start of the next.
#[derive(Debug)]
pub struct PacedQueue<T> {
    items: VecDeque<T>,
    pacer: Pacer,
    dequeued: usize,
}

impl<T> PacedQueue<T> {
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = T>, pacer: Pacer) -> Self {
        Self {
            items: items.into_iter().collect(),
            pacer,
            dequeued: 0,
        }
    }

    /// Next item, after pacing if this is not the first.
    pub async fn next(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        if self.dequeued > 0 {
            self.pacer.pace().await;
        }
        self.dequeued += 1;
        self.items.pop_front()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn dequeued(&self) -> usize {
        self.dequeued
    }
}
