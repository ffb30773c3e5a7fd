use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use ratecast_market_data::{RateQuery, RequestContext};
use std::sync::Arc;

use super::{
    rate_info_body, FanoutResult, Message, NotificationServiceTrait, NotifierTrait,
    DEFAULT_BROADCAST_CONCURRENCY, RATE_INFO_SUBJECT,
};
use crate::errors::{Error, Result};
use crate::rates::RateServiceTrait;
use crate::subscribers::SubscriberRepositoryTrait;

/// Broadcasts the current rate to all subscribers.
pub struct NotificationService {
    subscriber_repository: Arc<dyn SubscriberRepositoryTrait>,
    rate_service: Arc<dyn RateServiceTrait>,
    notifier: Arc<dyn NotifierTrait>,
    concurrency: usize,
}

impl NotificationService {
    pub fn new(
        subscriber_repository: Arc<dyn SubscriberRepositoryTrait>,
        rate_service: Arc<dyn RateServiceTrait>,
        notifier: Arc<dyn NotifierTrait>,
    ) -> Self {
        Self {
            subscriber_repository,
            rate_service,
            notifier,
            concurrency: DEFAULT_BROADCAST_CONCURRENCY,
        }
    }

    /// Number of deliveries in flight at once. Values below 1 mean 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn broadcast(&self, ctx: &RequestContext) -> Result<FanoutResult> {
        let emails = ctx
            .run(self.subscriber_repository.list(ctx))
            .await?
            .inspect_err(|e| error!("Failed to get emails from storage: {}", e))?;

        let query = RateQuery::default();
        let rate = ctx
            .run(
                self.rate_service
                    .get_rate(ctx, query.crypto.as_str(), query.fiat.as_str()),
            )
            .await?
            .inspect_err(|e| error!("Failed to get {} rate: {}", query, e))?;

        let body = rate_info_body(rate);
        debug!(
            "Broadcasting '{}' to {} subscribers, concurrency {}",
            body,
            emails.len(),
            self.concurrency
        );

        // `buffered` yields in input order regardless of completion order
        let mut deliveries = stream::iter(emails.iter().cloned())
            .map(|email| {
                let message = Message::new(email, RATE_INFO_SUBJECT, body.as_str());
                async move {
                    let sent = ctx
                        .run(self.notifier.send(ctx, &message))
                        .await
                        .map_err(Error::from)
                        .and_then(|result| result);
                    (message.to, sent)
                }
            })
            .buffered(self.concurrency);

        let mut failed_recipients = Vec::new();
        while let Some((recipient, sent)) = deliveries.next().await {
            match sent {
                Ok(()) => debug!("Sent rate info to {}", recipient),
                Err(e) if e.is_interrupted() => {
                    warn!("Broadcast interrupted while sending to {}: {}", recipient, e);
                    return Err(e);
                }
                Err(e) => {
                    error!("Failed to send email to {}: {}", recipient, e);
                    failed_recipients.push(recipient);
                }
            }
        }

        let result = FanoutResult {
            subscribers: emails.len(),
            failed_recipients,
        };
        info!(
            "Broadcast finished: {} of {} delivered",
            result.delivered(),
            result.subscribers
        );
        result.into_result()
    }
}
