//! Cancellation and deadline propagation.
//!
//! A [`RequestContext`] travels with every call into a provider, store or
//! notifier. [`RequestContext::run`] races a future against the context's
//! cancellation signal and deadline; when the context wins the future is
//! dropped, which aborts any in-flight HTTP request it owned.
//!
//! ```ignore
//! let source = CancellationSource::new();
//! let ctx = source.context().with_timeout(Duration::from_secs(5));
//!
//! let rate = ctx.run(provider.get_rate(&ctx, "BTC", "USD")).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::errors::MarketDataError;

/// Why [`RequestContext::run`] gave up on a future.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    #[error("cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl From<Interrupted> for MarketDataError {
    fn from(value: Interrupted) -> Self {
        match value {
            Interrupted::Cancelled => MarketDataError::Cancelled,
            Interrupted::DeadlineExceeded => MarketDataError::DeadlineExceeded,
        }
    }
}

/// Owner side of a cancellation signal.
///
/// Contexts created from a source observe [`cancel`](Self::cancel). Dropping
/// the source without cancelling leaves its contexts running.
#[derive(Debug)]
pub struct CancellationSource {
    tx: watch::Sender<bool>,
}

impl CancellationSource {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// A context bound to this source, with no deadline.
    pub fn context(&self) -> RequestContext {
        RequestContext {
            cancel: Some(self.tx.subscribe()),
            deadline: None,
        }
    }

    /// Cancel every context created from this source.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellation signal plus optional deadline for one logical request.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context whose deadline is at most `timeout` from now.
    ///
    /// An earlier deadline already on `self` is kept.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context with the earlier of `deadline` and the current one.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        Self {
            cancel: self.cancel.clone(),
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Returns the interruption that already applies, if any.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupted::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Resolves once the context is cancelled; never resolves otherwise.
    pub async fn cancelled(&self) {
        let Some(rx) = self.cancel.as_ref() else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // Source dropped without cancelling
                return std::future::pending().await;
            }
        }
    }

    async fn expired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }

    /// Drive `fut` until it completes, the context is cancelled, or the
    /// deadline passes.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        self.check()?;
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Interrupted::Cancelled),
            _ = self.expired() => Err(Interrupted::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}
