//! Sequential fallback over an ordered provider chain.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use super::ProviderRegistry;
use crate::context::{Interrupted, RequestContext};
use crate::errors::{MarketDataError, RetryClass};
use crate::models::RateQuery;
use crate::provider::{coinapi, coinbase, coingecko, RateProvider};

/// Provider order used when none is configured.
pub const DEFAULT_PROVIDER_ORDER: [&str; 3] =
    [coinapi::PROVIDER_ID, coingecko::PROVIDER_ID, coinbase::PROVIDER_ID];

/// Time one provider gets before the resolver moves on.
///
/// Three attempts fit inside the default 30 s request budget.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(8);

/// Resolves a [`RateQuery`] by asking providers one at a time.
///
/// The chain is fixed at construction. `resolve` tries each provider at most
/// once, in order, and returns the first rate obtained. Provider failures
/// fall through to the next provider; cancellation and deadline expiry stop
/// the walk immediately.
///
/// Each attempt runs under a deadline of at most `attempt_timeout`, so a hung
/// provider counts as a `Timeout` and the next provider still gets asked
/// while the caller's deadline has time left.
#[derive(Clone)]
pub struct RateResolver {
    chain: Vec<Arc<dyn RateProvider>>,
    attempt_timeout: Duration,
}

impl RateResolver {
    /// Build a resolver over `order`, looking each id up in `registry`.
    ///
    /// An empty `order` selects [`DEFAULT_PROVIDER_ORDER`].
    pub fn build<S: AsRef<str>>(
        registry: &ProviderRegistry,
        order: &[S],
    ) -> Result<Self, MarketDataError> {
        if registry.is_empty() {
            return Err(MarketDataError::NoProvidersAvailable);
        }

        let ids: Vec<&str> = if order.is_empty() {
            DEFAULT_PROVIDER_ORDER.to_vec()
        } else {
            order.iter().map(|id| id.as_ref()).collect()
        };

        let chain = ids
            .into_iter()
            .map(|id| {
                registry
                    .get(id)
                    .ok_or_else(|| MarketDataError::UnknownProvider(id.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if chain.is_empty() {
            return Err(MarketDataError::NoProvidersAvailable);
        }

        Ok(Self {
            chain,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        })
    }

    /// Override the per-provider time budget.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    pub fn with_default_order(registry: &ProviderRegistry) -> Result<Self, MarketDataError> {
        Self::build::<&str>(registry, &[])
    }

    /// Provider ids in the order they are tried.
    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.chain.iter().map(|provider| provider.id()).collect()
    }

    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        query: &RateQuery,
    ) -> Result<f64, MarketDataError> {
        let (from, to) = (query.crypto.as_str(), query.fiat.as_str());
        let mut last_error: Option<MarketDataError> = None;

        for provider in &self.chain {
            let provider_id = provider.id();
            debug!("Requesting {} from '{}'", query, provider_id);

            // The provider future is dropped if the context wins the race.
            let attempt = ctx.with_timeout(self.attempt_timeout);
            let outcome = match attempt.run(provider.get_rate(&attempt, from, to)).await {
                Ok(result) => result,
                // Only this attempt ran out of time; the caller is still waiting
                Err(Interrupted::DeadlineExceeded) if ctx.check().is_ok() => {
                    Err(MarketDataError::Timeout {
                        provider: provider_id.to_string(),
                    })
                }
                Err(interrupted) => Err(interrupted.into()),
            };

            match outcome {
                Ok(rate) => {
                    info!("Resolved {} = {} via '{}'", query, rate, provider_id);
                    return Ok(rate);
                }
                Err(e) => match e.retry_class() {
                    RetryClass::Never => {
                        info!(
                            "Terminal error from '{}': {}, not trying further providers",
                            provider_id, e
                        );
                        return Err(e);
                    }
                    RetryClass::NextProvider => {
                        warn!(
                            "Provider '{}' failed for {}: {}, trying next provider",
                            provider_id, query, e
                        );
                        last_error = Some(e);
                    }
                },
            }
        }

        match last_error {
            Some(last) => Err(MarketDataError::AllProvidersFailed {
                attempts: self.chain.len(),
                last: Box::new(last),
            }),
            None => Err(MarketDataError::NoProvidersAvailable),
        }
    }
}

impl std::fmt::Debug for RateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateResolver")
            .field("chain", &self.provider_ids())
            .field("attempt_timeout", &self.attempt_timeout)
            .finish()
    }
}
