//! # Scheduler
//!
//! Paces validation cycles. Every cycle, including the first, starts only
//! after a full interval has elapsed; the wait can be cut short by a
//! shutdown signal.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Interval used when none (or zero) is configured: one day.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Interval the validator actually waits for a configured value.
pub fn effective_interval(configured: Duration) -> Duration {
    if configured.is_zero() {
        DEFAULT_INTERVAL
    } else {
        configured
    }
}

/// Requests a running validator to stop.
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Signal shutdown. The validator stops before its next cycle; a cycle
    /// already in progress runs to completion.
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    /// Whether shutdown was signalled.
    pub fn is_shutdown(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Waits out the interval between cycles.
#[derive(Debug)]
pub struct Scheduler {
    interval: Duration,
    shutdown: watch::Receiver<bool>,
    detached: bool,
}

impl Scheduler {
    /// Scheduler plus the handle that stops it.
    pub fn new(interval: Duration) -> (Self, ShutdownHandle) {
        let (tx, rx) = watch::channel(false);
        (
            Self::with_shutdown(interval, rx),
            ShutdownHandle { tx: Arc::new(tx) },
        )
    }

    /// Scheduler listening on an existing shutdown channel.
    pub fn with_shutdown(interval: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            interval: effective_interval(interval),
            shutdown,
            detached: false,
        }
    }

    /// Effective interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next cycle.
    ///
    /// Returns `true` once the interval has elapsed, `false` if shutdown
    /// was signalled first. If every shutdown sender is dropped the
    /// scheduler keeps ticking forever.
    pub async fn next_cycle(&mut self) -> bool {
        let sleep = tokio::time::sleep(self.interval);
        tokio::pin!(sleep);

        loop {
            if *self.shutdown.borrow() {
                return false;
            }
            if self.detached {
                (&mut sleep).await;
                return true;
            }

            let sender_alive = tokio::select! {
                biased;
                changed = self.shutdown.changed() => changed.is_ok(),
                _ = &mut sleep => return true,
            };
            if !sender_alive {
                self.detached = true;
            }
        }
    }
}
