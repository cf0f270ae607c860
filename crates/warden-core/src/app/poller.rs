//! ConfirmationPoller - receipt を待つ状態機械
//!
//! ```text
//! Unconfirmed ──receipt(status=1)──▶ Confirmed-Success
//!      │  ▲
//!      │  └── no receipt: sleep(interval)
//!      └─────receipt(status=0 / none)──▶ Confirmed-Failed
//! ```
//!
//! 待機は tokio の timer のみ（busy-spin しない）。receipt query も sleep も
//! shutdown と deadline に対して `tokio::select!` で競合させるので、
//! 応答の遅い ledger でも cancel と `max_wait` は即座に効く。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, sleep, sleep_until};

use crate::domain::{ConfirmationResult, Terminal, TransactionHandle};
use crate::error::WardenError;
use crate::ports::Ledger;

/// How often to ask for a receipt and how long to keep asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,

    /// `None` waits forever.
    pub max_wait: Option<Duration>,
}

impl PollPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_wait: None,
        }
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

pub struct ConfirmationPoller {
    ledger: Arc<dyn Ledger>,
    policy: PollPolicy,
}

impl ConfirmationPoller {
    pub fn new(ledger: Arc<dyn Ledger>, policy: PollPolicy) -> Self {
        Self { ledger, policy }
    }

    /// One receipt query. A query failure is fatal, not `Pending`.
    pub async fn poll_once(&self, handle: &TransactionHandle) -> Result<ConfirmationResult, WardenError> {
        match self.ledger.transaction_receipt(handle).await {
            Ok(None) => Ok(ConfirmationResult::Pending),
            Ok(Some(receipt)) => Ok(ConfirmationResult::from_receipt(receipt)),
            Err(source) => Err(WardenError::Ledger {
                handle: *handle,
                source,
            }),
        }
    }

    /// Polls until the transaction is mined.
    ///
    /// A `true` on `shutdown` stops the wait with [`WardenError::Cancelled`]
    /// and takes precedence over the deadline; the broadcast stands. With
    /// `max_wait` set, [`WardenError::Timeout`] fires at the deadline even
    /// while a receipt query is still in flight.
    pub async fn wait_for_terminal(
        &self,
        handle: &TransactionHandle,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<Terminal, WardenError> {
        let started = Instant::now();
        let deadline = self.policy.max_wait.map(|max_wait| started + max_wait);
        let cancelled = |attempt: u32| {
            tracing::info!(tx = %handle, attempt, "stopped waiting for receipt");
            WardenError::Cancelled(*handle)
        };
        let timed_out = |attempt: u32| {
            tracing::warn!(tx = %handle, attempt, "no receipt before the deadline");
            WardenError::Timeout {
                handle: *handle,
                waited: started.elapsed(),
            }
        };
        let mut attempt: u32 = 0;

        loop {
            if *shutdown.borrow() {
                return Err(cancelled(attempt));
            }

            attempt += 1;
            let result = tokio::select! {
                biased;
                _ = shutdown_requested(shutdown) => return Err(cancelled(attempt)),
                result = self.poll_once(handle) => result?,
                _ = expired(deadline) => return Err(timed_out(attempt)),
            };
            if let Some(terminal) = result.into_terminal() {
                tracing::debug!(tx = %handle, attempt, "receipt observed");
                return Ok(terminal);
            }
            tracing::debug!(tx = %handle, attempt, "waiting for receipt");

            tokio::select! {
                biased;
                _ = shutdown_requested(shutdown) => return Err(cancelled(attempt)),
                _ = expired(deadline) => return Err(timed_out(attempt)),
                _ = sleep(self.policy.interval) => {}
            }
        }
    }
}

/// Resolves once `true` is observed. A dropped sender can never cancel.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Resolves at `deadline`; never without one.
async fn expired(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
