use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use ratecast_core::{
    notifications::{NotificationService, NotificationServiceTrait, NotifierTrait},
    rates::{RateService, RateServiceTrait},
    subscribers::{SubscriberRepositoryTrait, SubscriberService, SubscriberServiceTrait},
    CancellationSource, RequestContext,
};
use ratecast_market_data::{
    CoinApiProvider, CoinGeckoProvider, CoinbaseProvider, ProviderRegistry, RateResolver,
};
use ratecast_notifier::{LogNotifier, MailgunNotifier};
use ratecast_storage_file::{FileDb, SubscriberRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};

pub struct AppState {
    pub rate_service: Arc<dyn RateServiceTrait>,
    pub subscriber_service: Arc<dyn SubscriberServiceTrait>,
    pub notification_service: Arc<dyn NotificationServiceTrait>,
    /// Cancelled on shutdown; every request context derives from it.
    pub shutdown: Arc<CancellationSource>,
    pub request_timeout: Duration,
}

impl AppState {
    /// Context for one inbound request, bounded by the request timeout.
    pub fn request_context(&self) -> RequestContext {
        self.shutdown.context().with_timeout(self.request_timeout)
    }
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

/// Providers available to the resolver. CoinAPI needs a key and is only
/// registered when one is configured.
pub fn build_registry(config: &Config) -> anyhow::Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    match &config.coinapi_key {
        Some(key) => registry.register(Arc::new(CoinApiProvider::new(key.clone())))?,
        None => tracing::warn!("RC_COINAPI_KEY not set, CoinAPI provider disabled"),
    }
    registry.register(Arc::new(CoinGeckoProvider::new()))?;
    registry.register(Arc::new(CoinbaseProvider::new()))?;
    Ok(registry)
}

/// Resolver over the configured order. Without an explicit order the
/// default order is used, minus providers that could not be registered.
pub fn build_resolver(config: &Config, registry: &ProviderRegistry) -> anyhow::Result<RateResolver> {
    let resolved = if config.provider_order.is_empty() {
        let order: Vec<&str> = ratecast_market_data::DEFAULT_PROVIDER_ORDER
            .into_iter()
            .filter(|id| registry.get(id).is_some())
            .collect();
        RateResolver::build(registry, &order)
    } else {
        RateResolver::build(registry, &config.provider_order)
    };
    let resolver = resolved.context("Invalid provider configuration")?;
    Ok(resolver.with_attempt_timeout(config.provider_timeout))
}

/// Notifier for the configured delivery channel.
pub fn build_notifier(config: &Config) -> Arc<dyn NotifierTrait> {
    match &config.mailgun {
        Some(mailgun) => {
            tracing::info!("Sending email through Mailgun domain {}", mailgun.domain);
            Arc::new(MailgunNotifier::new(mailgun.clone()))
        }
        None => {
            tracing::warn!("Mailgun not configured, emails will only be logged");
            Arc::new(LogNotifier::new())
        }
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let registry = build_registry(config)?;
    build_state_with(config, &registry, build_notifier(config)).await
}

/// Wire the services over an already populated registry and notifier.
pub async fn build_state_with(
    config: &Config,
    registry: &ProviderRegistry,
    notifier: Arc<dyn NotifierTrait>,
) -> anyhow::Result<Arc<AppState>> {
    let db = Arc::new(FileDb::new(&config.data_dir));
    db.init()
        .await
        .with_context(|| format!("Cannot prepare data dir {}", config.data_dir.display()))?;
    tracing::info!("Data directory in use: {}", config.data_dir.display());

    let subscriber_repository: Arc<dyn SubscriberRepositoryTrait> = Arc::new(
        SubscriberRepository::new(db.clone(), config.subscribers_file.clone()),
    );

    let resolver = Arc::new(build_resolver(config, registry)?);
    tracing::info!("Rate providers in order: {:?}", resolver.provider_ids());

    let rate_service: Arc<dyn RateServiceTrait> = Arc::new(RateService::new(resolver));

    let subscriber_service: Arc<dyn SubscriberServiceTrait> =
        Arc::new(SubscriberService::new(subscriber_repository.clone()));
    let notification_service: Arc<dyn NotificationServiceTrait> = Arc::new(
        NotificationService::new(subscriber_repository, rate_service.clone(), notifier)
            .with_concurrency(config.broadcast_concurrency),
    );

    Ok(Arc::new(AppState {
        rate_service,
        subscriber_service,
        notification_service,
        shutdown: Arc::new(CancellationSource::new()),
        request_timeout: config.request_timeout,
    }))
}
