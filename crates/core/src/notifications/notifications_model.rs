use serde::Serialize;

use crate::errors::{Error, Result};

/// One outbound notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Message {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// How a broadcast went, derived from a [`FanoutResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanoutOutcome {
    /// No delivery failed. Includes the empty broadcast.
    Delivered,
    /// At least one delivery failed and at least one succeeded.
    PartiallyDelivered,
    /// Every delivery of a non-empty broadcast failed.
    Failed,
}

/// Result of sending one message to every subscriber.
///
/// `failed_recipients` keeps subscriber order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FanoutResult {
    pub subscribers: usize,
    pub failed_recipients: Vec<String>,
}

impl FanoutResult {
    pub fn outcome(&self) -> FanoutOutcome {
        let failed = self.failed_recipients.len();
        if failed == 0 {
            FanoutOutcome::Delivered
        } else if failed == self.subscribers {
            FanoutOutcome::Failed
        } else {
            FanoutOutcome::PartiallyDelivered
        }
    }

    pub fn delivered(&self) -> usize {
        self.subscribers - self.failed_recipients.len()
    }

    /// `Ok` for delivered and partially delivered broadcasts,
    /// [`Error::AllDeliveriesFailed`] otherwise.
    pub fn into_result(self) -> Result<Self> {
        match self.outcome() {
            FanoutOutcome::Failed => Err(Error::AllDeliveriesFailed {
                failed_recipients: self.failed_recipients,
            }),
            _ => Ok(self),
        }
    }
}
