use async_trait::async_trait;
use log::debug;
use ratecast_market_data::{RateQuery, RateResolver, RequestContext};
use std::sync::Arc;

use super::RateServiceTrait;
use crate::errors::Result;

/// Validates the pair and hands it to the provider fallback chain.
pub struct RateService {
    resolver: Arc<RateResolver>,
}

impl RateService {
    pub fn new(resolver: Arc<RateResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl RateServiceTrait for RateService {
    async fn get_rate(&self, ctx: &RequestContext, crypto: &str, fiat: &str) -> Result<f64> {
        let query = RateQuery::parse(crypto, fiat)?;
        debug!("Resolving {} via {:?}", query, self.resolver.provider_ids());
        Ok(self.resolver.resolve(ctx, &query).await?)
    }
}
